//! Payload and archive builders shared by integration tests.

use std::io::{Cursor, Write};

use serde_json::{Value, json};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub fn user_json(id: i32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "avatar": format!("https://cdn.example/avatar/{id}.png")
    })
}

/// A published map with one version whose archive is served at `download_url`.
pub fn beatmap_json(id: &str, song_name: &str, download_url: &str) -> Value {
    json!({
        "id": id,
        "name": song_name,
        "description": "",
        "uploader": user_json(4, "mapper"),
        "metadata": {
            "bpm": 128.0,
            "duration": 150,
            "songName": song_name,
            "songSubName": "",
            "songAuthorName": "Artist",
            "levelAuthorName": "mapper"
        },
        "stats": {"plays": 0, "downloads": 1, "upvotes": 1, "downvotes": 0, "score": 0.5},
        "uploaded": "2024-01-01T00:00:00Z",
        "automapper": false,
        "ranked": false,
        "qualified": false,
        "versions": [{
            "hash": format!("hash{id}"),
            "key": id,
            "state": "Published",
            "createdAt": "2024-01-01T00:00:00Z",
            "diffs": [],
            "downloadURL": download_url,
            "coverURL": format!("https://cdn.example/hash{id}.jpg"),
            "previewURL": format!("https://cdn.example/hash{id}.mp3")
        }]
    })
}

/// Builds an in-memory zip archive from `(name, contents)` pairs.
/// Names ending in `/` become directory entries.
pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, contents) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// A minimal map archive.
pub fn map_archive() -> Vec<u8> {
    zip_archive(&[("Info.dat", b"{\"_version\":\"2.0.0\"}"), ("ExpertStandard.dat", b"{}")])
}
