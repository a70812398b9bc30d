//! Map records: beatmaps, their versions and per-difficulty details.

use super::user::UserDetail;

crate::record! {
    /// Parity-check summary for one difficulty.
    pub struct BeatmapParitySummary {
        errors: i32 = required("errors"),
        warns: i32 = required("warns"),
        resets: i32 = required("resets"),
    }
}

crate::record! {
    /// One playable difficulty of a map version.
    pub struct BeatmapDifficulty {
        /// Note jump speed.
        njs: f32 = required("njs"),
        offset: f32 = required("offset"),
        notes: i32 = required("notes"),
        bombs: i32 = required("bombs"),
        obstacles: i32 = required("obstacles"),
        /// Notes per second.
        nps: f64 = required("nps"),
        length: f64 = required("length"),
        /// Characteristic such as `Standard` or `OneSaber`.
        characteristic: String = required("characteristic"),
        /// Difficulty name such as `Expert` or `ExpertPlus`.
        difficulty: String = required("difficulty"),
        events: i32 = required("events"),
        chroma: bool = required("chroma"),
        /// Uses mapping extensions.
        me: bool = required("me"),
        /// Uses noodle extensions.
        ne: bool = required("ne"),
        cinema: bool = required("cinema"),
        seconds: f64 = required("seconds"),
        parity_summary: BeatmapParitySummary = required("paritySummary"),
        /// Star rating, present on ranked maps only.
        stars: f32 = optional("stars"),
    }
}

crate::record! {
    /// One uploaded revision of a map.
    pub struct BeatmapVersion {
        created_at: String = required("createdAt"),
        sage_score: i32 = optional("sageScore"),
        diffs: Vec<BeatmapDifficulty> = required("diffs"),
        feedback: String = optional("feedback"),
        /// Content hash identifying this revision.
        hash: String = required("hash"),
        /// Short map key, absent on unpublished versions.
        key: String = optional("key"),
        /// One of `Uploaded`, `Testplay`, `Published` or `Feedback`.
        state: String = required("state"),
        download_url: String = required("downloadURL"),
        cover_url: String = required("coverURL"),
        preview_url: String = required("previewURL"),
    }
}

crate::record! {
    /// Song metadata shared by all versions of a map.
    pub struct Metadata {
        bpm: f32 = required("bpm"),
        /// Song length in seconds.
        duration: i32 = required("duration"),
        song_name: String = required("songName"),
        song_sub_name: String = required("songSubName"),
        song_author_name: String = required("songAuthorName"),
        level_author_name: String = required("levelAuthorName"),
    }
}

crate::record! {
    /// Popularity counters for a map.
    pub struct Stats {
        /// `-1` when the service omits the counter.
        plays: i32 = defaulted("plays", -1),
        /// `-1` when the service omits the counter.
        downloads: i32 = defaulted("downloads", -1),
        upvotes: i32 = required("upvotes"),
        downvotes: i32 = required("downvotes"),
        score: f32 = required("score"),
    }
}

crate::record! {
    /// A published map with all of its versions.
    pub struct Beatmap {
        /// Map id (the short key).
        id: String = required("id"),
        name: String = required("name"),
        description: String = required("description"),
        uploader: UserDetail = required("uploader"),
        metadata: Metadata = required("metadata"),
        stats: Stats = required("stats"),
        uploaded: String = required("uploaded"),
        automapper: bool = required("automapper"),
        ranked: bool = required("ranked"),
        qualified: bool = required("qualified"),
        /// Versions, newest first.
        versions: Vec<BeatmapVersion> = required("versions"),
    }
}

impl Beatmap {
    /// Returns the newest version, if the map has any.
    #[must_use]
    pub fn latest_version(&self) -> Option<&BeatmapVersion> {
        self.versions.first()
    }

    /// Builds the folder name a version of this map is extracted into.
    ///
    /// Format: `"{key} ({song name} - {level author})"`, where the key falls
    /// back to the map id for versions without one. The result is not yet
    /// safe for use as a path component.
    #[must_use]
    pub fn create_folder_name(&self, version: &BeatmapVersion) -> String {
        let key = version.key().unwrap_or(&self.id);
        format!(
            "{key} ({} - {})",
            self.metadata.song_name(),
            self.metadata.level_author_name()
        )
    }
}
