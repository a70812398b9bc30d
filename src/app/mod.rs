//! Terminal plumbing shared by command handlers.

pub(crate) mod progress_manager;
