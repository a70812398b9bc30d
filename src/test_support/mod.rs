//! Helpers shared by unit tests.

pub(crate) mod archive;
#[path = "../../tests/support/socket_guard.rs"]
pub(crate) mod socket_guard;
