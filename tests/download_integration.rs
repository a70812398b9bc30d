//! Integration tests for batch and single map downloads.
//!
//! These tests serve real zip archives from a mock server and verify
//! extraction layout, failure isolation, retry behavior, and progress
//! reporting through the public client and engine APIs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use beatsaver_core::mapping::Record;
use beatsaver_core::{
    BeatSaverClient, Beatmap, ClientConfig, DownloadEngine, DownloadItem, HttpClient,
    ProgressFn, RetryPolicy, TransferProgressFn,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::fixtures::{beatmap_json, map_archive, zip_archive};
use support::socket_guard::start_mock_server_or_skip;

fn client_for(mock_server: &MockServer, output_root: &std::path::Path) -> BeatSaverClient {
    let config = ClientConfig::default()
        .with_api_url(mock_server.uri())
        .with_output_root(output_root)
        .with_retry_policy(RetryPolicy::new(3, Duration::from_millis(1)));
    BeatSaverClient::new(config).unwrap()
}

fn beatmap(id: &str, song_name: &str, download_url: &str) -> Beatmap {
    Beatmap::from_value(&beatmap_json(id, song_name, download_url)).unwrap()
}

async fn serve_archive(mock_server: &MockServer, route: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(mock_server)
        .await;
}

fn recording_progress() -> (ProgressFn, Arc<Mutex<Vec<(usize, usize)>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let progress: ProgressFn = Arc::new(move |completed, total| {
        sink.lock().unwrap().push((completed, total));
    });
    (progress, calls)
}

// ==================== Single Map Tests ====================

#[tokio::test]
async fn test_download_latest_extracts_into_sanitized_folder() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    serve_archive(&mock_server, "/a1.zip", map_archive()).await;
    let temp_dir = TempDir::new().unwrap();
    let client = client_for(&mock_server, temp_dir.path());

    let map = beatmap("a1", "Song: Remix?", &format!("{}/a1.zip", mock_server.uri()));
    let folder = client.download_latest(&map, None).await.unwrap();

    assert_eq!(folder, temp_dir.path().join("a1 (Song_ Remix_ - mapper)"));
    assert!(folder.join("Info.dat").is_file());
    assert!(folder.join("ExpertStandard.dat").is_file());
}

#[tokio::test]
async fn test_download_from_url_skips_escaping_entries() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let archive = zip_archive(&[
        ("Info.dat", b"{}"),
        ("../escape.dat", b"nope"),
        ("sub/", b""),
        ("sub/cover.jpg", b"\xFF\xD8"),
    ]);
    serve_archive(&mock_server, "/evil.zip", archive).await;
    let temp_dir = TempDir::new().unwrap();
    let output_root = temp_dir.path().join("levels");
    let client = client_for(&mock_server, &output_root);

    let folder = client
        .download_beatmap_from_url(&format!("{}/evil.zip", mock_server.uri()), "evil", None)
        .await
        .unwrap();

    assert_eq!(folder, output_root.join("evil"));
    assert!(folder.join("Info.dat").is_file());
    assert!(folder.join("sub").join("cover.jpg").is_file());
    assert!(!output_root.join("escape.dat").exists());
}

#[tokio::test]
async fn test_download_of_non_archive_returns_none() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    serve_archive(&mock_server, "/junk.zip", b"definitely not a zip".to_vec()).await;
    let temp_dir = TempDir::new().unwrap();
    let client = client_for(&mock_server, temp_dir.path());

    let folder = client
        .download_beatmap_from_url(&format!("{}/junk.zip", mock_server.uri()), "junk", None)
        .await;

    assert!(folder.is_none());
    assert!(!temp_dir.path().join("junk").exists());
}

#[tokio::test]
async fn test_download_beatmap_from_url_reports_transfer_progress() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let padding = vec![0_u8; 128 * 1024];
    let archive = zip_archive(&[("Info.dat", b"{}"), ("song.egg", padding.as_slice())]);
    serve_archive(&mock_server, "/big.zip", archive).await;
    let temp_dir = TempDir::new().unwrap();
    let client = client_for(&mock_server, temp_dir.path());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let progress: TransferProgressFn = Arc::new(move |fraction| {
        sink.lock().unwrap().push(fraction);
    });

    let folder = client
        .download_beatmap_from_url(
            &format!("{}/big.zip", mock_server.uri()),
            "big",
            Some(progress),
        )
        .await
        .unwrap();

    assert!(folder.join("song.egg").is_file());
    let seen = seen.lock().unwrap();
    assert!(
        seen.windows(2).all(|pair| pair[0] <= pair[1]),
        "fractions went backwards: {seen:?}"
    );
    assert_eq!(seen.last().copied(), Some(1.0));
}

// ==================== Batch Tests ====================

#[tokio::test]
async fn test_download_beatmaps_isolates_failures_and_reports_progress() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let uri = mock_server.uri();
    for id in ["m1", "m2", "m3"] {
        serve_archive(&mock_server, &format!("/{id}.zip"), map_archive()).await;
    }
    Mock::given(method("GET"))
        .and(path("/gone.zip"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let client = client_for(&mock_server, temp_dir.path());
    let maps = vec![
        beatmap("m1", "One", &format!("{uri}/m1.zip")),
        beatmap("m2", "Two", &format!("{uri}/m2.zip")),
        beatmap("gone", "Gone", &format!("{uri}/gone.zip")),
        beatmap("m3", "Three", &format!("{uri}/m3.zip")),
    ];
    let (progress, calls) = recording_progress();

    let results = client.download_beatmaps(&maps, 2, Some(progress)).await;

    assert_eq!(results.len(), 4);
    for id in ["m1", "m2", "m3"] {
        let folder = results[id].as_ref().unwrap();
        assert!(folder.join("Info.dat").is_file(), "{id} not extracted");
    }
    assert_eq!(results["gone"], None);

    let calls = calls.lock().unwrap();
    assert_eq!(calls.last(), Some(&(4, 4)));
    assert!(
        calls.windows(2).all(|pair| pair[0].0 <= pair[1].0),
        "progress went backwards: {calls:?}"
    );
    assert!(calls.iter().all(|&(_, total)| total == 4));
}

#[tokio::test]
async fn test_empty_body_is_retried_up_to_policy_ceiling() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/empty.zip"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let engine = DownloadEngine::new(
        Arc::new(HttpClient::new()),
        RetryPolicy::new(3, Duration::from_millis(1)),
        temp_dir.path(),
    );
    let items = vec![DownloadItem::new(
        7_u32,
        format!("{}/empty.zip", mock_server.uri()),
        "empty",
    )];

    let results = engine.download_many(items, 4, None).await;

    assert_eq!(results, HashMap::from([(7_u32, None)]));
}

#[tokio::test]
async fn test_empty_batch_reports_zero_progress_once() {
    let temp_dir = TempDir::new().unwrap();
    let engine = DownloadEngine::new(
        Arc::new(HttpClient::new()),
        RetryPolicy::default(),
        temp_dir.path(),
    );
    let (progress, calls) = recording_progress();

    let results = engine
        .download_many(Vec::<DownloadItem<String>>::new(), 3, Some(progress))
        .await;

    assert!(results.is_empty());
    assert_eq!(*calls.lock().unwrap(), vec![(0, 0)]);
}
