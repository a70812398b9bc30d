//! Playlist and vote records.

use super::beatmap::Beatmap;
use super::user::UserDetail;

crate::record! {
    /// Aggregates over the maps in a playlist.
    pub struct PlaylistStats {
        avg_score: f32 = required("avgScore"),
        down_votes: i32 = required("downVotes"),
        mapper_count: i64 = required("mapperCount"),
        max_nps: f64 = required("maxNpns"),
        max_nps_two_dp: f64 = required("maxNpnsTwoDP"),
        min_nps: f64 = required("minNpns"),
        min_nps_two_dp: f64 = required("minNpnsTwoDP"),
        score_one_dp: f32 = required("scoreOneDP"),
        total_duration: i32 = required("totalDuration"),
        total_maps: i32 = required("totalMaps"),
        up_votes: i32 = required("upVotes"),
    }
}

crate::record! {
    /// A curated or user-made list of maps.
    pub struct Playlist {
        created_at: String = required("createdAt"),
        curated_at: String = optional("curatedAt"),
        curator: UserDetail = optional("curator"),
        deleted_at: String = optional("deletedAt"),
        description: String = required("description"),
        download_url: String = required("downloadURL"),
        name: String = required("name"),
        owner: UserDetail = required("owner"),
        playlist_id: i32 = required("playlistId"),
        /// Cover image URL.
        playlist_image: String = required("playlistImage"),
        playlist_image_512: String = required("playlistImage512"),
        songs_changed_at: String = required("songsChangedAt"),
        stats: PlaylistStats = required("stats"),
        /// One of `Private`, `Public`, `System` or `Search`.
        kind: String = required("type"),
        updated_at: String = required("updatedAt"),
    }
}

crate::record! {
    /// A map together with its position in a playlist.
    pub struct BeatmapWithOrder {
        map: Beatmap = required("map"),
        order: f32 = required("order"),
    }
}

crate::record! {
    /// One page of a playlist's contents.
    pub struct PlaylistPage {
        maps: Vec<BeatmapWithOrder> = required("maps"),
        playlist: Playlist = required("playlist"),
    }
}

crate::record! {
    /// One page of playlist search results.
    pub struct PlaylistSearchPage {
        docs: Vec<Playlist> = required("docs"),
    }
}

crate::record! {
    /// Vote totals for one map.
    pub struct VoteSummary {
        down_votes: i32 = required("downVotes"),
        up_votes: i32 = required("upVotes"),
        hash: String = required("hash"),
        /// Base64 form of the map key.
        key64: String = required("key64"),
        map_id: i32 = required("mapId"),
        score: f64 = required("score"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::mapping::Record;
    use crate::models::fixtures;

    #[test]
    fn test_playlist_page_decodes() {
        let page = PlaylistPage::from_value(&json!({
            "maps": [{"map": fixtures::beatmap_json("1", "h1"), "order": 1.0}],
            "playlist": fixtures::playlist_json(7)
        }))
        .unwrap();
        assert_eq!(*page.playlist().playlist_id(), 7);
        assert_eq!(page.playlist().kind(), "Public");
        assert!(page.playlist().curator().is_none());
        assert_eq!(page.maps()[0].map().id(), "1");
    }

    #[test]
    fn test_vote_summary_decodes() {
        let vote = VoteSummary::from_value(&json!({
            "downVotes": 1, "upVotes": 5, "hash": "h", "key64": "AQ==", "mapId": 1, "score": 0.8
        }))
        .unwrap();
        assert_eq!(*vote.up_votes(), 5);
        assert_eq!(vote.key64(), "AQ==");
    }
}
