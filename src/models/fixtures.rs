//! JSON payloads shared by model and API unit tests.

use serde_json::{Value, json};

pub(crate) fn user_json(id: i32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "avatar": format!("https://cdn.example/avatar/{id}.png"),
        "hash": "userhash"
    })
}

pub(crate) fn beatmap_json(id: &str, hash: &str) -> Value {
    json!({
        "id": id,
        "name": "Test Map",
        "description": "",
        "uploader": user_json(4, "mapper"),
        "metadata": {
            "bpm": 120.0,
            "duration": 180,
            "songName": "Song: Name?",
            "songSubName": "",
            "songAuthorName": "Artist",
            "levelAuthorName": "mapper"
        },
        "stats": {"plays": 0, "downloads": 10, "upvotes": 5, "downvotes": 1, "score": 0.75},
        "uploaded": "2024-01-01T00:00:00Z",
        "automapper": false,
        "ranked": false,
        "qualified": false,
        "versions": [{
            "hash": hash,
            "key": id,
            "state": "Published",
            "createdAt": "2024-01-01T00:00:00Z",
            "sageScore": 2,
            "diffs": [{
                "njs": 16.0, "offset": 0.0, "notes": 500, "bombs": 0, "obstacles": 3,
                "nps": 4.5, "length": 360.0, "characteristic": "Standard",
                "difficulty": "Expert", "events": 1000, "chroma": false, "me": false,
                "ne": false, "cinema": false, "seconds": 180.0,
                "paritySummary": {"errors": 0, "warns": 2, "resets": 0}
            }],
            "downloadURL": format!("https://r2cdn.example/{hash}.zip"),
            "coverURL": format!("https://cdn.example/{hash}.jpg"),
            "previewURL": format!("https://cdn.example/{hash}.mp3")
        }]
    })
}

pub(crate) fn playlist_json(id: i32) -> Value {
    json!({
        "createdAt": "2024-01-01T00:00:00Z",
        "description": "",
        "downloadURL": format!("https://api.example/playlists/id/{id}/download"),
        "name": "Playlist",
        "owner": user_json(4, "mapper"),
        "playlistId": id,
        "playlistImage": "https://cdn.example/p.jpg",
        "playlistImage512": "https://cdn.example/p512.jpg",
        "songsChangedAt": "2024-01-01T00:00:00Z",
        "stats": {
            "avgScore": 0.5, "downVotes": 0, "mapperCount": 1, "maxNpns": 4.5,
            "maxNpnsTwoDP": 4.5, "minNpns": 1.0, "minNpnsTwoDP": 1.0, "scoreOneDP": 0.5,
            "totalDuration": 180, "totalMaps": 1, "upVotes": 3
        },
        "type": "Public",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}
