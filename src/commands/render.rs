//! Plain-text rendering of records for terminal output.

use std::fmt::Write as _;

use beatsaver_core::{Beatmap, UserDetail};

/// One line per map: key, song, mapper, votes.
pub(crate) fn map_row(map: &Beatmap) -> String {
    let metadata = map.metadata();
    let stats = map.stats();
    format!(
        "{:<8} {} - {} [{}]  +{} -{}",
        map.id(),
        metadata.song_author_name(),
        metadata.song_name(),
        metadata.level_author_name(),
        stats.upvotes(),
        stats.downvotes()
    )
}

/// Multi-line view of a map and its newest version.
pub(crate) fn map_detail(map: &Beatmap) -> String {
    let metadata = map.metadata();
    let mut out = String::new();
    let _ = writeln!(out, "{}", map_row(map));
    let _ = writeln!(out, "  name:      {}", map.name());
    let _ = writeln!(out, "  uploader:  {} ({})", map.uploader().name(), map.uploader().id());
    let _ = writeln!(out, "  uploaded:  {}", map.uploaded());
    let _ = writeln!(
        out,
        "  bpm:       {}  duration: {}s",
        metadata.bpm(),
        metadata.duration()
    );
    if let Some(version) = map.latest_version() {
        let difficulties: Vec<String> = version
            .diffs()
            .iter()
            .map(|diff| format!("{} {}", diff.characteristic(), diff.difficulty()))
            .collect();
        let _ = writeln!(out, "  hash:      {}", version.hash());
        let _ = writeln!(out, "  diffs:     {}", difficulties.join(", "));
        let _ = writeln!(out, "  download:  {}", version.download_url());
    }
    out
}

/// Multi-line view of a user.
pub(crate) fn user_detail(user: &UserDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", user.name(), user.id());
    let _ = writeln!(out, "  avatar:    {}", user.avatar());
    if let Some(stats) = user.stats() {
        let _ = writeln!(
            out,
            "  maps:      {} ({} ranked)  +{} -{}",
            stats.total_maps(),
            stats.ranked_maps(),
            stats.total_upvotes(),
            stats.total_downvotes()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use beatsaver_core::Record;

    use super::*;

    const MAP: &str = r#"{
        "id": "1a2b", "name": "Test Map", "description": "",
        "uploader": {"id": 4, "name": "mapper", "avatar": "https://cdn.example/a.png"},
        "metadata": {"bpm": 120.0, "duration": 180, "songName": "Song", "songSubName": "",
                     "songAuthorName": "Artist", "levelAuthorName": "mapper"},
        "stats": {"upvotes": 5, "downvotes": 1, "score": 0.75},
        "uploaded": "2024-01-01T00:00:00Z", "automapper": false, "ranked": false,
        "qualified": false, "versions": []
    }"#;

    #[test]
    fn map_row_shows_key_song_and_votes() {
        let map = Beatmap::from_json_str(MAP).unwrap();
        let row = map_row(&map);
        assert!(row.starts_with("1a2b"));
        assert!(row.contains("Artist - Song [mapper]"));
        assert!(row.ends_with("+5 -1"));
    }

    #[test]
    fn map_detail_without_versions_omits_download() {
        let map = Beatmap::from_json_str(MAP).unwrap();
        let detail = map_detail(&map);
        assert!(detail.contains("uploader:  mapper (4)"));
        assert!(!detail.contains("download:"));
    }

    #[test]
    fn user_detail_without_stats() {
        let user = UserDetail::from_json_str(
            r#"{"id": 7, "name": "someone", "avatar": "https://cdn.example/7.png"}"#,
        )
        .unwrap();
        let detail = user_detail(&user);
        assert!(detail.starts_with("someone (7)"));
        assert!(!detail.contains("maps:"));
    }
}
