//! Query options for the listing and search endpoints.
//!
//! Each options struct turns itself into ordered `(name, value)` pairs with
//! `queries()`. Unset options emit nothing, so `Default` options produce
//! only the pairs the service needs to reproduce its own defaults.

use chrono::{DateTime, Utc};

/// Wire format for timestamps sent to the service.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Largest page size the service accepts.
const MAX_PAGE_SIZE: i32 = 100;

/// Tri-state filter for boolean map properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    /// Do not filter on this property.
    #[default]
    Ignore,
    /// Only maps with this property.
    Include,
    /// Only maps without this property.
    Exclude,
}

impl Filter {
    /// Value for an ordinary boolean filter.
    fn as_query(self) -> Option<&'static str> {
        match self {
            Self::Ignore => None,
            Self::Include => Some("true"),
            Self::Exclude => Some("false"),
        }
    }

    /// Value for the `automapper` parameter, whose meaning is inverted on
    /// the service: `true` means both, `false` means only automapped, and
    /// omitting it hides automapped maps.
    fn as_automapper_query(self) -> Option<&'static str> {
        match self {
            Self::Ignore => Some("true"),
            Self::Include => Some("false"),
            Self::Exclude => None,
        }
    }
}

/// A point in time, either preformatted or as a UTC instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    /// Sent verbatim.
    Text(String),
    /// Formatted as `YYYY-MM-DDTHH:MM:SSZ`.
    Time(DateTime<Utc>),
}

impl Timestamp {
    /// Returns the wire representation.
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Time(time) => time.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

impl From<String> for Timestamp {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Timestamp {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(time: DateTime<Utc>) -> Self {
        Self::Time(time)
    }
}

/// Sort order for the latest-maps listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatestSortOrder {
    FirstPublished,
    Updated,
    LastPublished,
    Created,
    Curated,
}

impl LatestSortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstPublished => "FIRST_PUBLISHED",
            Self::Updated => "UPDATED",
            Self::LastPublished => "LAST_PUBLISHED",
            Self::Created => "CREATED",
            Self::Curated => "CURATED",
        }
    }
}

/// Sort order for map and playlist search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchSortOrder {
    #[default]
    Latest,
    Relevance,
    Rating,
    Curated,
}

impl SearchSortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "Latest",
            Self::Relevance => "Relevance",
            Self::Rating => "Rating",
            Self::Curated => "Curated",
        }
    }
}

/// Sort order for the latest-playlists listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatestPlaylistSortOrder {
    Updated,
    SongsUpdated,
    Created,
    Curated,
}

impl LatestPlaylistSortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Updated => "UPDATED",
            Self::SongsUpdated => "SONGS_UPDATED",
            Self::Created => "CREATED",
            Self::Curated => "CURATED",
        }
    }
}

/// Ordered query pairs under construction.
#[derive(Debug, Default)]
struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    fn push(&mut self, name: &str, value: impl Into<String>) {
        self.0.push((name.to_string(), value.into()));
    }

    fn push_opt(&mut self, name: &str, value: Option<&'static str>) {
        if let Some(value) = value {
            self.push(name, value);
        }
    }

    fn push_display<T: ToString>(&mut self, name: &str, value: Option<T>) {
        if let Some(value) = value {
            self.push(name, value.to_string());
        }
    }

    fn push_time(&mut self, name: &str, value: Option<&Timestamp>) {
        if let Some(value) = value {
            self.push(name, value.to_query());
        }
    }

    fn into_inner(self) -> Vec<(String, String)> {
        self.0
    }
}

/// Options for `GET /maps/latest`.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestQueryOptions {
    pub sort_order: Option<LatestSortOrder>,
    /// Clamped to `1..=100` on the wire.
    pub page_size: Option<i32>,
    pub verified: Filter,
    pub automapper: Filter,
    pub before: Option<Timestamp>,
    pub after: Option<Timestamp>,
}

impl Default for LatestQueryOptions {
    fn default() -> Self {
        Self {
            sort_order: None,
            page_size: None,
            verified: Filter::Ignore,
            automapper: Filter::Exclude,
            before: None,
            after: None,
        }
    }
}

impl LatestQueryOptions {
    #[must_use]
    pub fn queries(&self) -> Vec<(String, String)> {
        let mut pairs = QueryPairs::default();
        pairs.push_opt("automapper", self.automapper.as_automapper_query());
        pairs.push_opt("sortOrder", self.sort_order.map(LatestSortOrder::as_str));
        pairs.push_display("pageSize", self.page_size.map(clamp_page_size));
        pairs.push_opt("verified", self.verified.as_query());
        pairs.push_time("before", self.before.as_ref());
        pairs.push_time("after", self.after.as_ref());
        pairs.into_inner()
    }
}

/// Options for `GET /maps/collaborations/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollaborationQueryOptions {
    pub before: Option<Timestamp>,
    /// Clamped to `1..=100` on the wire.
    pub page_size: Option<i32>,
}

impl CollaborationQueryOptions {
    #[must_use]
    pub fn queries(&self) -> Vec<(String, String)> {
        let mut pairs = QueryPairs::default();
        pairs.push_time("before", self.before.as_ref());
        pairs.push_display("pageSize", self.page_size.map(clamp_page_size));
        pairs.into_inner()
    }
}

/// Options for `GET /search/text/{page}`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQueryOptions {
    pub query: Option<String>,
    pub sort_order: SearchSortOrder,
    pub automapper: Filter,
    pub chroma: Filter,
    pub noodle: Filter,
    /// Mapping extensions.
    pub me: Filter,
    pub cinema: Filter,
    pub ranked: Filter,
    pub verified: Filter,
    pub fullspread: Filter,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub include_tags: Vec<String>,
    pub exclude_tags: Vec<String>,
    pub max_bpm: Option<f32>,
    pub min_bpm: Option<f32>,
    pub max_duration: Option<i32>,
    pub min_duration: Option<i32>,
    pub max_nps: Option<f32>,
    pub min_nps: Option<f32>,
    pub max_rating: Option<f32>,
    pub min_rating: Option<f32>,
}

impl Default for SearchQueryOptions {
    fn default() -> Self {
        Self {
            query: None,
            sort_order: SearchSortOrder::Latest,
            automapper: Filter::Exclude,
            chroma: Filter::Ignore,
            noodle: Filter::Ignore,
            me: Filter::Ignore,
            cinema: Filter::Ignore,
            ranked: Filter::Ignore,
            verified: Filter::Ignore,
            fullspread: Filter::Ignore,
            from: None,
            to: None,
            include_tags: Vec::new(),
            exclude_tags: Vec::new(),
            max_bpm: None,
            min_bpm: None,
            max_duration: None,
            min_duration: None,
            max_nps: None,
            min_nps: None,
            max_rating: None,
            min_rating: None,
        }
    }
}

impl SearchQueryOptions {
    #[must_use]
    pub fn queries(&self) -> Vec<(String, String)> {
        let mut pairs = QueryPairs::default();
        pairs.push_opt("automapper", self.automapper.as_automapper_query());
        if let Some(query) = &self.query {
            pairs.push("q", query.as_str());
        }
        pairs.push("sortOrder", self.sort_order.as_str());

        for (name, filter) in [
            ("chroma", self.chroma),
            ("noodle", self.noodle),
            ("me", self.me),
            ("cinema", self.cinema),
            ("ranked", self.ranked),
            ("verified", self.verified),
            ("fullspread", self.fullspread),
        ] {
            pairs.push_opt(name, filter.as_query());
        }

        pairs.push_time("from", self.from.as_ref());
        pairs.push_time("to", self.to.as_ref());

        let tags: Vec<String> = self
            .include_tags
            .iter()
            .cloned()
            .chain(self.exclude_tags.iter().map(|tag| format!("!{tag}")))
            .collect();
        if !tags.is_empty() {
            pairs.push("tags", tags.join(","));
        }

        pairs.push_display("maxBpm", self.max_bpm);
        pairs.push_display("minBpm", self.min_bpm);
        pairs.push_display("maxDuration", self.max_duration);
        pairs.push_display("minDuration", self.min_duration);
        pairs.push_display("maxNps", self.max_nps);
        pairs.push_display("minNps", self.min_nps);
        pairs.push_display("maxRating", self.max_rating);
        pairs.push_display("minRating", self.min_rating);
        pairs.into_inner()
    }
}

/// Options for `GET /playlists/latest`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatestPlaylistsQueryOptions {
    pub after: Option<Timestamp>,
    pub before: Option<Timestamp>,
    pub page_size: Option<i32>,
    pub sort: Option<LatestPlaylistSortOrder>,
}

impl LatestPlaylistsQueryOptions {
    #[must_use]
    pub fn queries(&self) -> Vec<(String, String)> {
        let mut pairs = QueryPairs::default();
        pairs.push_time("after", self.after.as_ref());
        pairs.push_time("before", self.before.as_ref());
        pairs.push_display("pageSize", self.page_size);
        pairs.push_opt("sort", self.sort.map(LatestPlaylistSortOrder::as_str));
        pairs.into_inner()
    }
}

/// Options for `GET /playlists/search/{page}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPlaylistsQueryOptions {
    pub query: Option<String>,
    pub sort_order: SearchSortOrder,
    pub curated: Filter,
    pub verified: Filter,
    pub include_empty: Option<bool>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub max_nps: Option<f32>,
    pub min_nps: Option<f32>,
}

impl SearchPlaylistsQueryOptions {
    #[must_use]
    pub fn queries(&self) -> Vec<(String, String)> {
        let mut pairs = QueryPairs::default();
        if let Some(query) = &self.query {
            pairs.push("q", query.as_str());
        }
        pairs.push("sortOrder", self.sort_order.as_str());
        pairs.push_opt("curated", self.curated.as_query());
        pairs.push_opt("verified", self.verified.as_query());
        pairs.push_display("includeEmpty", self.include_empty);
        pairs.push_time("from", self.from.as_ref());
        pairs.push_time("to", self.to.as_ref());
        pairs.push_display("maxNps", self.max_nps);
        pairs.push_display("minNps", self.min_nps);
        pairs.into_inner()
    }
}

/// Options for `GET /vote`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteQueryOptions {
    /// Only votes cast after this point.
    pub since: Option<Timestamp>,
}

impl VoteQueryOptions {
    #[must_use]
    pub fn queries(&self) -> Vec<(String, String)> {
        let mut pairs = QueryPairs::default();
        pairs.push_time("since", self.since.as_ref());
        pairs.into_inner()
    }
}

fn clamp_page_size(size: i32) -> i32 {
    size.clamp(1, MAX_PAGE_SIZE)
}
