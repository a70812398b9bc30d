//! Typed records for the service's JSON payloads.
//!
//! Every type here is declared with [`record!`](crate::record) and decodes
//! through [`Record`](crate::mapping::Record).

mod beatmap;
#[cfg(test)]
pub(crate) mod fixtures;
mod page;
mod playlist;
mod user;

pub use beatmap::{
    Beatmap, BeatmapDifficulty, BeatmapParitySummary, BeatmapVersion, Metadata, Stats,
};
pub use page::{Page, SearchPage};
pub use playlist::{
    BeatmapWithOrder, Playlist, PlaylistPage, PlaylistSearchPage, PlaylistStats, VoteSummary,
};
pub use user::{UserDetail, UserDiffStats, UserStats};
