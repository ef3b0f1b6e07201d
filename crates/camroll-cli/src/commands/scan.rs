//! Implementation of the `camroll scan` command.
//!
//! This command walks directories for image and video files, derives a
//! capture time for each from its filename (falling back to the file
//! mtime), and indexes them into the catalog.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone, Utc};
use glob::glob;
use rayon::prelude::*;
use regex::Regex;

use camroll_db::{Library, PhotoRecord, deterministic_photo_uuid};

/// File extensions indexed as photos or clips.
const PHOTO_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "heic", "dng", "raw", "tiff", "gif", "mp4", "mov",
];

/// Compact timestamp embedded in camera filenames, e.g. `IMG_20240115_103000`
/// or `PXL_20240115_093000123.jpg`.
static COMPACT_TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{8})[_-]?(\d{6})").unwrap());

/// Spelled-out timestamp, e.g. `2024-01-15 10.30.00.jpg`.
static SPELLED_TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2} \d{2}\.\d{2}\.\d{2}").unwrap());

/// Runs the scan command and reports scanned/indexed counts.
pub fn run<W: Write>(writer: &mut W, library: &mut Library, paths: &[PathBuf]) -> Result<()> {
    let mut files = Vec::new();
    for root in paths {
        files.extend(collect_photo_files(root)?);
    }
    files.sort();
    files.dedup();

    let mut photos: Vec<PhotoRecord> = files
        .par_iter()
        .filter_map(|path| match index_photo(path) {
            Ok(photo) => Some(photo),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                None
            }
        })
        .collect();
    photos.sort_by(|a, b| a.uuid.cmp(&b.uuid));

    let inserted = library.insert_photos(&photos)?;
    writeln!(
        writer,
        "Scanned {} files, indexed {} new photos",
        files.len(),
        inserted
    )?;

    Ok(())
}

/// Recursively collects files under `root` with a known photo extension.
fn collect_photo_files(root: &Path) -> Result<Vec<PathBuf>> {
    let pattern = root.join("**/*");
    let pattern_str = pattern.to_string_lossy();

    let mut files = Vec::new();
    for entry in glob(&pattern_str).context("invalid glob pattern")? {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(error = %e, "error accessing file during scan");
                continue;
            }
        };
        if path.is_file() && has_photo_extension(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

fn has_photo_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PHOTO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Builds a catalog record for a single file on disk.
fn index_photo(path: &Path) -> Result<PhotoRecord> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("failed to stat {}", path.display()))?;
    let modified = metadata.modified().ok();

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();
    let source_path = path.to_string_lossy().into_owned();

    Ok(PhotoRecord {
        uuid: deterministic_photo_uuid(&source_path),
        filename: filename.clone(),
        source_path,
        taken_at: resolve_taken_at(&filename, modified),
        filesize: i64::try_from(metadata.len()).unwrap_or(i64::MAX),
    })
}

/// Determines when a photo was taken: a timestamp embedded in the filename
/// wins, otherwise the file mtime is used.
fn resolve_taken_at(filename: &str, modified: Option<SystemTime>) -> Option<DateTime<Utc>> {
    capture_time_from_filename(filename)
        .and_then(local_naive_to_utc)
        .or_else(|| modified.map(DateTime::<Utc>::from))
}

/// Extracts a naive capture time from a camera-style filename, if present.
fn capture_time_from_filename(filename: &str) -> Option<NaiveDateTime> {
    for caps in COMPACT_TIMESTAMP_RE.captures_iter(filename) {
        let compact = format!("{}{}", &caps[1], &caps[2]);
        if let Ok(naive) = NaiveDateTime::parse_from_str(&compact, "%Y%m%d%H%M%S") {
            return Some(naive);
        }
    }

    if let Some(found) = SPELLED_TIMESTAMP_RE.find(filename) {
        if let Ok(naive) = NaiveDateTime::parse_from_str(found.as_str(), "%Y-%m-%d %H.%M.%S") {
            return Some(naive);
        }
    }

    None
}

/// Converts a filename timestamp, which has no zone, to UTC assuming the
/// camera clock was on local time. Handles DST ambiguity by picking the
/// earlier instant.
fn local_naive_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        // DST spring-forward gap: no such local time, let the mtime win
        LocalResult::None => None,
    }
}
