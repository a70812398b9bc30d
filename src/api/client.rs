//! Typed client for the map-sharing service's REST API.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::ApiError;
use super::query::{
    CollaborationQueryOptions, LatestPlaylistsQueryOptions, LatestQueryOptions,
    SearchPlaylistsQueryOptions, SearchQueryOptions, VoteQueryOptions,
};
use crate::config::ClientConfig;
use crate::download::{
    DownloadEngine, DownloadError, DownloadItem, HttpClient, ProgressFn, RetryPolicy,
    TransferProgressFn, Transport,
};
use crate::mapping::{
    DecodeError, OBJECT_KIND, ROOT_KEY, Record, ValueCodec, check_remote_error, decode_nested,
};
use crate::models::{
    Beatmap, BeatmapVersion, Page, PlaylistPage, PlaylistSearchPage, SearchPage, UserDetail,
    VoteSummary,
};

/// Client for the service's REST API and CDN.
///
/// Cheap to clone; clones share the transport and output root.
///
/// # Example
///
/// ```no_run
/// use beatsaver_core::{BeatSaverClient, ClientConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = BeatSaverClient::new(ClientConfig::default().with_output_root("./CustomLevels"))?;
/// let map = client.beatmap_by_key("1a2b").await?;
/// if let Some(path) = client.download_latest(&map, None).await {
///     println!("extracted to {}", path.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BeatSaverClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    api_url: Url,
    cdn_url: Url,
    output_root: RwLock<PathBuf>,
    retry_policy: RetryPolicy,
}

impl fmt::Debug for BeatSaverClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeatSaverClient")
            .field("api_url", &self.inner.api_url.as_str())
            .field("cdn_url", &self.inner.cdn_url.as_str())
            .field("output_root", &self.output_root())
            .finish_non_exhaustive()
    }
}

impl BeatSaverClient {
    /// Creates a client backed by a reqwest [`HttpClient`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] if the HTTP client cannot be built and
    /// [`ApiError::InvalidBaseUrl`] if a configured base URL is unusable.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = HttpClient::build(
            config.user_agent(),
            config.connect_timeout_secs(),
            config.read_timeout_secs(),
        )
        .map_err(|source| ApiError::Client { source })?;
        Self::with_transport(config, Arc::new(http))
    }

    /// Creates a client that sends every request through `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if a configured base URL does not
    /// parse or cannot carry a path.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ApiError> {
        let api_url = parse_base(config.api_url())?;
        let cdn_url = parse_base(config.cdn_url())?;
        debug!(api_url = %api_url, cdn_url = %cdn_url, "creating API client");

        Ok(Self {
            inner: Arc::new(ClientInner {
                transport,
                api_url,
                cdn_url,
                output_root: RwLock::new(config.output_root().to_path_buf()),
                retry_policy: config.retry_policy().clone(),
            }),
        })
    }

    /// Returns the folder maps are currently extracted under.
    #[must_use]
    pub fn output_root(&self) -> PathBuf {
        self.inner
            .output_root
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the folder maps are extracted under.
    ///
    /// Downloads already in flight keep the root they started with.
    pub fn set_output_root(&self, output_root: impl Into<PathBuf>) {
        let output_root = output_root.into();
        info!(output_root = %output_root.display(), "output root changed");
        *self
            .inner
            .output_root
            .write()
            .unwrap_or_else(PoisonError::into_inner) = output_root;
    }

    // ==================== Maps ====================

    /// `GET /maps/id/{key}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn beatmap_by_key(&self, key: &str) -> Result<Beatmap, ApiError> {
        let url = self.endpoint(&["maps", "id", key], &[])?;
        self.get_record(&url).await
    }

    /// `GET /maps/ids/{k1,k2,...}`, keyed by map id.
    ///
    /// The service answers with an object keyed by id; an array of maps is
    /// accepted too. Unknown keys are simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body does not decode.
    #[instrument(skip(self, keys), fields(count = keys.len()))]
    pub async fn beatmaps_by_keys<S: AsRef<str>>(
        &self,
        keys: &[S],
    ) -> Result<HashMap<String, Beatmap>, ApiError> {
        let joined = join_ids(keys.iter().map(AsRef::as_ref));
        let url = self.endpoint(&["maps", "ids", &joined], &[])?;
        let value = self.get_json(&url).await?;
        Ok(decode_keyed(&value, |map: &Beatmap| map.id().clone())?)
    }

    /// `GET /maps/hash/{hash}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn beatmap_by_hash(&self, hash: &str) -> Result<Beatmap, ApiError> {
        let url = self.endpoint(&["maps", "hash", hash], &[])?;
        self.get_record(&url).await
    }

    /// `GET /maps/uploader/{id}/{page}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn beatmaps_by_user(&self, user_id: i32, page: u32) -> Result<Page, ApiError> {
        let url = self.endpoint(
            &["maps", "uploader", &user_id.to_string(), &page.to_string()],
            &[],
        )?;
        self.get_record(&url).await
    }

    /// `GET /maps/collaborations/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body does not decode.
    #[instrument(skip(self, options))]
    pub async fn collaborations_by_user(
        &self,
        user_id: i32,
        options: &CollaborationQueryOptions,
    ) -> Result<Page, ApiError> {
        let url = self.endpoint(
            &["maps", "collaborations", &user_id.to_string()],
            &options.queries(),
        )?;
        self.get_record(&url).await
    }

    /// `GET /maps/latest`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body does not decode.
    #[instrument(skip(self, options))]
    pub async fn latest(&self, options: &LatestQueryOptions) -> Result<Page, ApiError> {
        let url = self.endpoint(&["maps", "latest"], &options.queries())?;
        self.get_record(&url).await
    }

    // ==================== Users ====================

    /// `GET /users/id/{id}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn user_by_id(&self, user_id: i32) -> Result<UserDetail, ApiError> {
        let url = self.endpoint(&["users", "id", &user_id.to_string()], &[])?;
        self.get_record(&url).await
    }

    /// `GET /users/ids/{a,b,...}`, keyed by user id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body does not decode.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn users_by_ids(&self, ids: &[i32]) -> Result<HashMap<i32, UserDetail>, ApiError> {
        let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
        let joined = join_ids(ids.iter().map(String::as_str));
        let url = self.endpoint(&["users", "ids", &joined], &[])?;
        let value = self.get_json(&url).await?;
        Ok(decode_keyed(&value, |user: &UserDetail| *user.id())?)
    }

    /// `GET /users/name/{name}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn user_by_name(&self, name: &str) -> Result<UserDetail, ApiError> {
        let url = self.endpoint(&["users", "name", name], &[])?;
        self.get_record(&url).await
    }

    // ==================== Search ====================

    /// `GET /search/text/{page}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body does not decode.
    #[instrument(skip(self, options), fields(query = ?options.query))]
    pub async fn search(
        &self,
        page: u32,
        options: &SearchQueryOptions,
    ) -> Result<SearchPage, ApiError> {
        let url = self.endpoint(&["search", "text", &page.to_string()], &options.queries())?;
        self.get_record(&url).await
    }

    // ==================== Playlists ====================

    /// `GET /playlists/id/{id}/{page}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn playlist(&self, playlist_id: i32, page: u32) -> Result<PlaylistPage, ApiError> {
        let url = self.endpoint(
            &["playlists", "id", &playlist_id.to_string(), &page.to_string()],
            &[],
        )?;
        self.get_record(&url).await
    }

    /// `GET /playlists/latest`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body does not decode.
    #[instrument(skip(self, options))]
    pub async fn latest_playlists(
        &self,
        options: &LatestPlaylistsQueryOptions,
    ) -> Result<PlaylistSearchPage, ApiError> {
        let url = self.endpoint(&["playlists", "latest"], &options.queries())?;
        self.get_record(&url).await
    }

    /// `GET /playlists/search/{page}`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body does not decode.
    #[instrument(skip(self, options), fields(query = ?options.query))]
    pub async fn search_playlists(
        &self,
        page: u32,
        options: &SearchPlaylistsQueryOptions,
    ) -> Result<PlaylistSearchPage, ApiError> {
        let url = self.endpoint(
            &["playlists", "search", &page.to_string()],
            &options.queries(),
        )?;
        self.get_record(&url).await
    }

    // ==================== Votes ====================

    /// `GET /vote`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body does not decode.
    #[instrument(skip(self, options))]
    pub async fn votes(&self, options: &VoteQueryOptions) -> Result<Vec<VoteSummary>, ApiError> {
        let url = self.endpoint(&["vote"], &options.queries())?;
        let value = self.get_json(&url).await?;
        Ok(<Vec<VoteSummary> as ValueCodec>::decode(ROOT_KEY, &value)?)
    }

    // ==================== Downloads ====================

    /// Downloads `version` of `beatmap` and extracts it under the output root.
    ///
    /// `progress` receives the fraction of the archive received.
    ///
    /// Returns the extraction folder, or `None` on any failure.
    #[instrument(skip(self, beatmap, version, progress), fields(id = %beatmap.id(), hash = %version.hash()))]
    pub async fn download_beatmap(
        &self,
        beatmap: &Beatmap,
        version: &BeatmapVersion,
        progress: Option<TransferProgressFn>,
    ) -> Option<PathBuf> {
        let folder_name = beatmap.create_folder_name(version);
        self.engine()
            .download_one(version.download_url(), &folder_name, progress)
            .await
    }

    /// Downloads the newest version of `beatmap`.
    ///
    /// Returns `None` for maps without versions.
    pub async fn download_latest(
        &self,
        beatmap: &Beatmap,
        progress: Option<TransferProgressFn>,
    ) -> Option<PathBuf> {
        let Some(version) = beatmap.latest_version() else {
            warn!(id = %beatmap.id(), "map has no versions to download");
            return None;
        };
        self.download_beatmap(beatmap, version, progress).await
    }

    /// Downloads the archive at `url` into `output_root/sanitized(folder_name)`.
    pub async fn download_beatmap_from_url(
        &self,
        url: &str,
        folder_name: &str,
        progress: Option<TransferProgressFn>,
    ) -> Option<PathBuf> {
        self.engine().download_one(url, folder_name, progress).await
    }

    /// Downloads the newest version of every map, keyed by map id.
    ///
    /// Maps without versions appear as `None` but do not count toward
    /// `progress` totals.
    #[instrument(skip(self, beatmaps, progress), fields(count = beatmaps.len()))]
    pub async fn download_beatmaps(
        &self,
        beatmaps: &[Beatmap],
        concurrency_limit: usize,
        progress: Option<ProgressFn>,
    ) -> HashMap<String, Option<PathBuf>> {
        let mut without_versions = Vec::new();
        let items: Vec<DownloadItem<String>> = beatmaps
            .iter()
            .filter_map(|beatmap| {
                if let Some(version) = beatmap.latest_version() {
                    Some(DownloadItem::new(
                        beatmap.id().clone(),
                        version.download_url().clone(),
                        beatmap.create_folder_name(version),
                    ))
                } else {
                    without_versions.push(beatmap.id().clone());
                    None
                }
            })
            .collect();

        let mut results = self
            .engine()
            .download_many(items, concurrency_limit, progress)
            .await;
        for id in without_versions {
            results.entry(id).or_insert(None);
        }
        results
    }

    /// Fetches the cover image of `version`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Download`] if the image cannot be fetched.
    #[instrument(skip(self, version, progress), fields(hash = %version.hash()))]
    pub async fn cover_image(
        &self,
        version: &BeatmapVersion,
        progress: Option<TransferProgressFn>,
    ) -> Result<Vec<u8>, ApiError> {
        self.get_media(version.cover_url(), progress).await
    }

    /// Fetches the audio preview of `version`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Download`] if the preview cannot be fetched.
    #[instrument(skip(self, version, progress), fields(hash = %version.hash()))]
    pub async fn preview(
        &self,
        version: &BeatmapVersion,
        progress: Option<TransferProgressFn>,
    ) -> Result<Vec<u8>, ApiError> {
        self.get_media(version.preview_url(), progress).await
    }

    /// Fetches the avatar image of `user`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Download`] if the image cannot be fetched.
    #[instrument(skip(self, user, progress), fields(user_id = *user.id()))]
    pub async fn avatar_image(
        &self,
        user: &UserDetail,
        progress: Option<TransferProgressFn>,
    ) -> Result<Vec<u8>, ApiError> {
        self.get_media(user.avatar(), progress).await
    }

    /// Fetches `{cdn}/{hash}.jpg` for a version known only by hash.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the URL cannot be built or the image cannot be
    /// fetched.
    #[instrument(skip(self, progress))]
    pub async fn cover_image_by_hash(
        &self,
        hash: &str,
        progress: Option<TransferProgressFn>,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.cdn_asset(hash, "jpg")?;
        self.get_media(url.as_str(), progress).await
    }

    /// Fetches `{cdn}/{hash}.mp3` for a version known only by hash.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the URL cannot be built or the preview cannot
    /// be fetched.
    #[instrument(skip(self, progress))]
    pub async fn preview_by_hash(
        &self,
        hash: &str,
        progress: Option<TransferProgressFn>,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.cdn_asset(hash, "mp3")?;
        self.get_media(url.as_str(), progress).await
    }

    // ==================== Plumbing ====================

    fn engine(&self) -> DownloadEngine {
        DownloadEngine::new(
            Arc::clone(&self.inner.transport),
            self.inner.retry_policy.clone(),
            self.output_root(),
        )
    }

    fn endpoint(&self, segments: &[&str], queries: &[(String, String)]) -> Result<Url, ApiError> {
        append_path(&self.inner.api_url, segments, queries)
    }

    fn cdn_asset(&self, hash: &str, extension: &str) -> Result<Url, ApiError> {
        let file = format!("{}.{extension}", hash.to_ascii_lowercase());
        append_path(&self.inner.cdn_url, &[&file], &[])
    }

    async fn get_media(
        &self,
        url: &str,
        progress: Option<TransferProgressFn>,
    ) -> Result<Vec<u8>, ApiError> {
        Ok(self
            .inner
            .transport
            .fetch_with_progress(url, progress.as_ref())
            .await?)
    }

    /// Error statuses carrying a service error document report that message
    /// instead of the bare status.
    async fn get_json(&self, url: &Url) -> Result<Value, ApiError> {
        debug!(url = %url, "requesting");
        let bytes = match self.inner.transport.fetch(url.as_str()).await {
            Ok(bytes) => bytes,
            Err(error) => {
                if let Some(remote) = remote_error_in(&error) {
                    debug!(url = %url, status = ?error.status(), "service reported an error");
                    return Err(remote.into());
                }
                return Err(error.into());
            }
        };
        let value: Value = serde_json::from_slice(&bytes).map_err(DecodeError::malformed)?;
        check_remote_error(&value)?;
        Ok(value)
    }

    async fn get_record<R: Record>(&self, url: &Url) -> Result<R, ApiError> {
        let value = self.get_json(url).await?;
        Ok(R::from_value(&value)?)
    }
}

/// Reads the service error document from an error status body, if there is one.
fn remote_error_in(error: &DownloadError) -> Option<DecodeError> {
    let body = error.error_body()?;
    let value: Value = serde_json::from_slice(body).ok()?;
    check_remote_error(&value).err()
}

fn parse_base(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw).map_err(|_| ApiError::invalid_base_url(raw))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::invalid_base_url(raw));
    }
    Ok(url)
}

fn append_path(
    base: &Url,
    segments: &[&str],
    queries: &[(String, String)],
) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ApiError::invalid_base_url(base.as_str()))?
        .pop_if_empty()
        .extend(segments);
    if !queries.is_empty() {
        url.query_pairs_mut().extend_pairs(queries);
    }
    Ok(url)
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    ids.collect::<Vec<_>>().join(",")
}

/// Decodes an id-keyed object or an array of records into a map.
///
/// `null` members of an object are skipped.
fn decode_keyed<K, R>(value: &Value, key_of: impl Fn(&R) -> K) -> Result<HashMap<K, R>, DecodeError>
where
    K: Eq + Hash,
    R: Record + ValueCodec,
{
    match value {
        Value::Object(members) => members
            .iter()
            .filter(|(_, member)| !member.is_null())
            .map(|(key, member)| decode_nested::<R>(key, member).map(|record| (key_of(&record), record)))
            .collect(),
        Value::Array(_) => Ok(<Vec<R> as ValueCodec>::decode(ROOT_KEY, value)?
            .into_iter()
            .map(|record| (key_of(&record), record))
            .collect()),
        _ => Err(DecodeError::type_mismatch(ROOT_KEY, OBJECT_KIND)),
    }
}
