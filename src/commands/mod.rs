//! CLI command handlers.

mod download;
mod lookup;
mod render;
mod search;
mod tags;

pub use download::run_download_command;
pub use lookup::{run_hash_command, run_map_command, run_user_command};
pub use search::{run_latest_command, run_search_command};
pub use tags::run_tags_command;
