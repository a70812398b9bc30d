//! Progress UI (bar) for batch download runs.

use std::sync::Arc;

use beatsaver_core::ProgressFn;
use indicatif::{ProgressBar, ProgressStyle};

/// Builds the progress bar and the engine callback that drives it.
/// When `show_bar` is false, returns (None, None) and the batch runs silently.
pub(crate) fn download_progress(show_bar: bool) -> (Option<ProgressBar>, Option<ProgressFn>) {
    if !show_bar {
        return (None, None);
    }
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} maps")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let handle = bar.clone();
    let progress: ProgressFn = Arc::new(move |completed, total| {
        handle.set_length(total as u64);
        handle.set_position(completed as u64);
    });
    (Some(bar), Some(progress))
}
