//! Destination naming and zip extraction for downloaded maps.
//!
//! Folder names come from map metadata and can hold anything, so they are
//! reduced to a fixed allow-list before they touch the filesystem.

use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};
use zip::ZipArchive;

use super::error::ExtractError;

/// Returns true when `c` may appear in a folder name unchanged.
fn is_allowed_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '(' | ')' | '[' | ']' | '{' | '}' | '%' | '&' | '.' | ',' | ';' | '=' | '!' | '-'
                | '_'
                | ' '
        )
}

/// Replaces every character outside the allow-list with `_`.
///
/// The allow-list is ASCII letters, digits, space and `()[]{}%&.,;=!-_`.
/// A multi-byte character becomes a single `_`.
///
/// # Example
///
/// ```
/// use beatsaver_core::download::replace_illegal_chars_in_path;
///
/// assert_eq!(replace_illegal_chars_in_path("Song: Name?.zip"), "Song_ Name_.zip");
/// ```
#[must_use]
pub fn replace_illegal_chars_in_path(raw: &str) -> String {
    raw.chars()
        .map(|c| if is_allowed_path_char(c) { c } else { '_' })
        .collect()
}

/// Joins the sanitized `raw_folder_name` under `output_root`.
///
/// Names that sanitize to nothing or to only dots would resolve to the root
/// itself or its parent, so they become `_`.
#[must_use]
pub fn compute_destination(output_root: &Path, raw_folder_name: &str) -> PathBuf {
    let mut name = replace_illegal_chars_in_path(raw_folder_name);
    if name.chars().all(|c| c == '.') {
        name = "_".to_string();
    }
    output_root.join(name)
}

/// Writes every file entry of the zip in `archive_bytes` under `destination`.
///
/// Creates `destination` and its parents once the archive opens. Entries
/// whose names would land outside `destination` are skipped. Extraction is
/// not atomic: entries written before an IO failure stay on disk.
///
/// Returns the number of files written.
///
/// # Errors
///
/// Returns [`ExtractError::Archive`] if the bytes are not a readable zip and
/// [`ExtractError::Io`] if a directory or file cannot be written.
#[instrument(skip(archive_bytes), fields(bytes = archive_bytes.len(), destination = %destination.display()))]
pub fn extract_all(archive_bytes: &[u8], destination: &Path) -> Result<usize, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(archive_bytes)).map_err(ExtractError::archive)?;

    fs::create_dir_all(destination).map_err(|e| ExtractError::io(destination, e))?;

    let mut written = 0;
    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(error) => {
                warn!(index, error = %error, "skipping unreadable archive entry");
                continue;
            }
        };
        let Some(relative) = entry.enclosed_name() else {
            warn!(name = entry.name(), "skipping archive entry outside destination");
            continue;
        };
        let target = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| ExtractError::io(&target, e))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| ExtractError::io(parent, e))?;
        }
        let mut file = fs::File::create(&target).map_err(|e| ExtractError::io(&target, e))?;
        io::copy(&mut entry, &mut file).map_err(|e| ExtractError::io(&target, e))?;
        written += 1;
    }

    debug!(files = written, "archive extracted");
    Ok(written)
}
