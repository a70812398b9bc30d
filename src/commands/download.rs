//! Batch download of maps by key.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Result, bail};
use beatsaver_core::{BeatSaverClient, Beatmap};
use serde::Serialize;
use tracing::{info, warn};

use crate::app::progress_manager;

/// Outcome of one requested key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum DownloadStatus {
    Downloaded,
    Failed,
    NotFound,
}

/// One row of the download report, in request order.
#[derive(Debug, Serialize)]
struct DownloadReport {
    key: String,
    status: DownloadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
}

/// Resolves `keys`, downloads every map found, and prints where each landed.
///
/// Fails when any key is unknown or any download fails, after printing the
/// full report.
pub async fn run_download_command(
    client: &BeatSaverClient,
    keys: &[String],
    concurrency: usize,
    show_progress: bool,
    json: bool,
) -> Result<()> {
    let keys: Vec<String> = keys.iter().map(|key| key.to_ascii_lowercase()).collect();
    let maps = client.beatmaps_by_keys(keys.as_slice()).await?;
    for key in keys.iter().filter(|key| !maps.contains_key(*key)) {
        warn!(key = %key, "map not found");
    }
    let beatmaps: Vec<Beatmap> = maps.into_values().collect();

    info!(
        found = beatmaps.len(),
        requested = keys.len(),
        output_root = %client.output_root().display(),
        "downloading maps"
    );

    let (bar, progress) = progress_manager::download_progress(show_progress);
    let results = client
        .download_beatmaps(&beatmaps, concurrency, progress)
        .await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let reports = build_reports(&keys, results);
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{}", render_report(report));
        }
    }

    let failed = reports
        .iter()
        .filter(|report| report.status != DownloadStatus::Downloaded)
        .count();
    if failed > 0 {
        bail!("{failed} of {} maps were not downloaded", reports.len());
    }
    Ok(())
}

fn build_reports(
    keys: &[String],
    mut results: HashMap<String, Option<PathBuf>>,
) -> Vec<DownloadReport> {
    keys.iter()
        .map(|key| {
            let (status, path) = match results.remove(key) {
                Some(Some(path)) => (DownloadStatus::Downloaded, Some(path)),
                Some(None) => (DownloadStatus::Failed, None),
                None => (DownloadStatus::NotFound, None),
            };
            DownloadReport {
                key: key.clone(),
                status,
                path,
            }
        })
        .collect()
}

fn render_report(report: &DownloadReport) -> String {
    match (&report.status, &report.path) {
        (DownloadStatus::Downloaded, Some(path)) => {
            format!("{:<8} {}", report.key, path.display())
        }
        (DownloadStatus::NotFound, _) => format!("{:<8} NOT FOUND", report.key),
        _ => format!("{:<8} FAILED", report.key),
    }
}
