//! Service REST API: client, query options, tag lists, and callback variants.
//!
//! # Error Handling
//!
//! Fallible calls return [`ApiError`], which wraps the transport layer's
//! [`DownloadError`](crate::download::DownloadError) and the mapping layer's
//! [`DecodeError`](crate::mapping::DecodeError). Note: we do NOT define
//! module-local Result aliases.

mod callback;
mod client;
mod error;
mod query;
mod tags;

pub use callback::spawn_with_callback;
pub use client::BeatSaverClient;
pub use error::ApiError;
pub use query::{
    CollaborationQueryOptions, Filter, LatestPlaylistSortOrder, LatestPlaylistsQueryOptions,
    LatestQueryOptions, LatestSortOrder, SearchPlaylistsQueryOptions, SearchQueryOptions,
    SearchSortOrder, Timestamp, VoteQueryOptions,
};
pub use tags::{GENRE_TAGS, MAP_FEEL_TAGS, genre_tags, map_feel_tags};
