//! Callback-style variants of the client operations.
//!
//! Each `*_async` method starts the operation on a tokio worker and hands the
//! outcome to `on_finished` exactly once. Failures are logged and reported as
//! `None`. Passing `None` for the callback starts nothing and returns `None`.
//!
//! These methods must be called from within a tokio runtime.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;

use tokio::task::JoinHandle;
use tracing::warn;

use super::client::BeatSaverClient;
use super::error::ApiError;
use super::query::{
    CollaborationQueryOptions, LatestPlaylistsQueryOptions, LatestQueryOptions,
    SearchPlaylistsQueryOptions, SearchQueryOptions, VoteQueryOptions,
};
use crate::download::{ProgressFn, TransferProgressFn};
use crate::models::{
    Beatmap, BeatmapVersion, Page, PlaylistPage, PlaylistSearchPage, SearchPage, UserDetail,
    VoteSummary,
};

/// Runs `future` on a tokio worker and passes its output to `on_finished`.
///
/// Returns `None` without polling `future` when no callback is supplied.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn spawn_with_callback<T, Fut, F>(future: Fut, on_finished: Option<F>) -> Option<JoinHandle<()>>
where
    T: Send + 'static,
    Fut: Future<Output = Option<T>> + Send + 'static,
    F: FnOnce(Option<T>) + Send + 'static,
{
    let on_finished = on_finished?;
    Some(tokio::spawn(async move {
        let outcome = future.await;
        on_finished(outcome);
    }))
}

fn logged<T>(operation: &'static str, result: Result<T, ApiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(operation, error = %error, "request failed");
            None
        }
    }
}

impl BeatSaverClient {
    /// Callback form of [`beatmap_by_key`](Self::beatmap_by_key).
    pub fn beatmap_by_key_async<F>(
        &self,
        key: impl Into<String>,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<Beatmap>) + Send + 'static,
    {
        let client = self.clone();
        let key = key.into();
        spawn_with_callback(
            async move { logged("beatmap_by_key", client.beatmap_by_key(&key).await) },
            on_finished,
        )
    }

    /// Callback form of [`beatmaps_by_keys`](Self::beatmaps_by_keys).
    pub fn beatmaps_by_keys_async<F>(
        &self,
        keys: Vec<String>,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<HashMap<String, Beatmap>>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move { logged("beatmaps_by_keys", client.beatmaps_by_keys(keys.as_slice()).await) },
            on_finished,
        )
    }

    /// Callback form of [`beatmap_by_hash`](Self::beatmap_by_hash).
    pub fn beatmap_by_hash_async<F>(
        &self,
        hash: impl Into<String>,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<Beatmap>) + Send + 'static,
    {
        let client = self.clone();
        let hash = hash.into();
        spawn_with_callback(
            async move { logged("beatmap_by_hash", client.beatmap_by_hash(&hash).await) },
            on_finished,
        )
    }

    /// Callback form of [`beatmaps_by_user`](Self::beatmaps_by_user).
    pub fn beatmaps_by_user_async<F>(
        &self,
        user_id: i32,
        page: u32,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<Page>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move {
                logged(
                    "beatmaps_by_user",
                    client.beatmaps_by_user(user_id, page).await,
                )
            },
            on_finished,
        )
    }

    /// Callback form of [`collaborations_by_user`](Self::collaborations_by_user).
    pub fn collaborations_by_user_async<F>(
        &self,
        user_id: i32,
        options: CollaborationQueryOptions,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<Page>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move {
                logged(
                    "collaborations_by_user",
                    client.collaborations_by_user(user_id, &options).await,
                )
            },
            on_finished,
        )
    }

    /// Callback form of [`latest`](Self::latest).
    pub fn latest_async<F>(
        &self,
        options: LatestQueryOptions,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<Page>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move { logged("latest", client.latest(&options).await) },
            on_finished,
        )
    }

    /// Callback form of [`user_by_id`](Self::user_by_id).
    pub fn user_by_id_async<F>(&self, user_id: i32, on_finished: Option<F>) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<UserDetail>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move { logged("user_by_id", client.user_by_id(user_id).await) },
            on_finished,
        )
    }

    /// Callback form of [`users_by_ids`](Self::users_by_ids).
    pub fn users_by_ids_async<F>(&self, ids: Vec<i32>, on_finished: Option<F>) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<HashMap<i32, UserDetail>>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move { logged("users_by_ids", client.users_by_ids(&ids).await) },
            on_finished,
        )
    }

    /// Callback form of [`user_by_name`](Self::user_by_name).
    pub fn user_by_name_async<F>(
        &self,
        name: impl Into<String>,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<UserDetail>) + Send + 'static,
    {
        let client = self.clone();
        let name = name.into();
        spawn_with_callback(
            async move { logged("user_by_name", client.user_by_name(&name).await) },
            on_finished,
        )
    }

    /// Callback form of [`search`](Self::search).
    pub fn search_async<F>(
        &self,
        page: u32,
        options: SearchQueryOptions,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<SearchPage>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move { logged("search", client.search(page, &options).await) },
            on_finished,
        )
    }

    /// Callback form of [`playlist`](Self::playlist).
    pub fn playlist_async<F>(
        &self,
        playlist_id: i32,
        page: u32,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<PlaylistPage>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move { logged("playlist", client.playlist(playlist_id, page).await) },
            on_finished,
        )
    }

    /// Callback form of [`latest_playlists`](Self::latest_playlists).
    pub fn latest_playlists_async<F>(
        &self,
        options: LatestPlaylistsQueryOptions,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<PlaylistSearchPage>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move { logged("latest_playlists", client.latest_playlists(&options).await) },
            on_finished,
        )
    }

    /// Callback form of [`search_playlists`](Self::search_playlists).
    pub fn search_playlists_async<F>(
        &self,
        page: u32,
        options: SearchPlaylistsQueryOptions,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<PlaylistSearchPage>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move {
                logged(
                    "search_playlists",
                    client.search_playlists(page, &options).await,
                )
            },
            on_finished,
        )
    }

    /// Callback form of [`votes`](Self::votes).
    pub fn votes_async<F>(
        &self,
        options: VoteQueryOptions,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<Vec<VoteSummary>>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move { logged("votes", client.votes(&options).await) },
            on_finished,
        )
    }

    /// Callback form of [`download_beatmap`](Self::download_beatmap).
    pub fn download_beatmap_async<F>(
        &self,
        beatmap: Beatmap,
        version: BeatmapVersion,
        progress: Option<TransferProgressFn>,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<PathBuf>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move { client.download_beatmap(&beatmap, &version, progress).await },
            on_finished,
        )
    }

    /// Callback form of [`download_latest`](Self::download_latest).
    pub fn download_latest_async<F>(
        &self,
        beatmap: Beatmap,
        progress: Option<TransferProgressFn>,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<PathBuf>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move { client.download_latest(&beatmap, progress).await },
            on_finished,
        )
    }

    /// Callback form of [`download_beatmap_from_url`](Self::download_beatmap_from_url).
    pub fn download_beatmap_from_url_async<F>(
        &self,
        url: impl Into<String>,
        folder_name: impl Into<String>,
        progress: Option<TransferProgressFn>,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<PathBuf>) + Send + 'static,
    {
        let client = self.clone();
        let url = url.into();
        let folder_name = folder_name.into();
        spawn_with_callback(
            async move {
                client
                    .download_beatmap_from_url(&url, &folder_name, progress)
                    .await
            },
            on_finished,
        )
    }

    /// Callback form of [`download_beatmaps`](Self::download_beatmaps).
    ///
    /// The batch itself never fails, so the callback always receives `Some`.
    pub fn download_beatmaps_async<F>(
        &self,
        beatmaps: Vec<Beatmap>,
        concurrency_limit: usize,
        progress: Option<ProgressFn>,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<HashMap<String, Option<PathBuf>>>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move {
                Some(
                    client
                        .download_beatmaps(&beatmaps, concurrency_limit, progress)
                        .await,
                )
            },
            on_finished,
        )
    }

    /// Callback form of [`cover_image`](Self::cover_image).
    pub fn cover_image_async<F>(
        &self,
        version: BeatmapVersion,
        progress: Option<TransferProgressFn>,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<Vec<u8>>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move { logged("cover_image", client.cover_image(&version, progress).await) },
            on_finished,
        )
    }

    /// Callback form of [`preview`](Self::preview).
    pub fn preview_async<F>(
        &self,
        version: BeatmapVersion,
        progress: Option<TransferProgressFn>,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<Vec<u8>>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move { logged("preview", client.preview(&version, progress).await) },
            on_finished,
        )
    }

    /// Callback form of [`avatar_image`](Self::avatar_image).
    pub fn avatar_image_async<F>(
        &self,
        user: UserDetail,
        progress: Option<TransferProgressFn>,
        on_finished: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Option<Vec<u8>>) + Send + 'static,
    {
        let client = self.clone();
        spawn_with_callback(
            async move { logged("avatar_image", client.avatar_image(&user, progress).await) },
            on_finished,
        )
    }
}
