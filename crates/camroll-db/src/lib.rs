//! Photo catalog for camroll.
//!
//! Persists photo metadata and album membership using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Library`] type wraps a `rusqlite::Connection`, which is `Send` but
//! not `Sync`. A `Library` can be moved between threads but not shared
//! without external synchronization.
//!
//! # Schema
//!
//! ## Capture Time Format
//!
//! Capture times are stored as TEXT in RFC 3339 UTC with millisecond
//! precision (e.g., `2024-01-15T10:30:00.000Z`), or NULL when unknown. The
//! fixed precision keeps lexicographic ordering identical to chronological
//! ordering, so `ORDER BY taken_at` needs no parsing.
//!
//! ## Album Nesting
//!
//! Albums form a tree through `parent_id`, with `0` meaning top level. The
//! sentinel (rather than NULL) exists because SQLite treats NULLs as
//! distinct under UNIQUE, which would allow duplicate top-level names.
//! Album paths use `/` between levels.

use std::collections::HashMap;
use std::path::Path;

use camroll_core::{AlbumSink, ClusterablePhoto};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Catalog errors.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored capture time failed to parse.
    #[error("invalid capture time for photo {uuid}: {value}")]
    TimestampParse {
        uuid: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Catalog connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Library {
    conn: Connection,
}

/// A photo row as stored in the catalog.
///
/// Also the JSONL exchange format for `camroll import` / `camroll export`:
/// `uuid` may be omitted on import (derived from `source_path`), and
/// `taken_at` is RFC 3339 or null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    #[serde(default)]
    pub uuid: String,
    pub filename: String,
    pub source_path: String,
    #[serde(default)]
    pub taken_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub filesize: i64,
}

/// An album with its full path and membership count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRecord {
    pub path: String,
    pub photo_count: i64,
}

/// Catalog totals for `camroll status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryStats {
    pub photo_count: i64,
    pub with_capture_time: i64,
    pub album_count: i64,
}

impl Library {
    /// Opens a catalog at the given path, creating it if necessary.
    ///
    /// The schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, LibraryError> {
        let conn = Connection::open(path)?;
        let library = Self { conn };
        library.init()?;
        Ok(library)
    }

    /// Opens an in-memory catalog.
    ///
    /// Useful for testing. The catalog is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, LibraryError> {
        let conn = Connection::open_in_memory()?;
        let library = Self { conn };
        library.init()?;
        Ok(library)
    }

    /// Initializes the schema.
    ///
    /// This is idempotent - safe to call on an already-initialized catalog.
    fn init(&self) -> Result<(), LibraryError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            -- Photos table: one row per cataloged file
            -- taken_at: RFC 3339 UTC millis (e.g., '2024-01-15T10:30:00.000Z'), NULL if unknown
            CREATE TABLE IF NOT EXISTS photos (
                uuid TEXT PRIMARY KEY,
                filename TEXT NOT NULL,
                source_path TEXT NOT NULL,
                taken_at TEXT,
                filesize INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_photos_taken_at ON photos(taken_at);

            -- Albums nest through parent_id; 0 means top level
            CREATE TABLE IF NOT EXISTS albums (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                parent_id INTEGER NOT NULL DEFAULT 0,
                UNIQUE (name, parent_id)
            );

            CREATE TABLE IF NOT EXISTS album_photos (
                album_id INTEGER NOT NULL,
                photo_uuid TEXT NOT NULL,
                PRIMARY KEY (album_id, photo_uuid),
                FOREIGN KEY (album_id) REFERENCES albums(id) ON DELETE CASCADE,
                FOREIGN KEY (photo_uuid) REFERENCES photos(uuid) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_album_photos_uuid ON album_photos(photo_uuid);
            ",
        )?;
        Ok(())
    }

    /// Inserts a batch of photos, ignoring duplicates by uuid.
    ///
    /// Returns the number of rows actually inserted, so re-scanning a tree
    /// reports only what was new.
    pub fn insert_photos(&mut self, photos: &[PhotoRecord]) -> Result<usize, LibraryError> {
        if photos.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT OR IGNORE INTO photos (uuid, filename, source_path, taken_at, filesize)
                VALUES (?, ?, ?, ?, ?)
                ",
            )?;
            for photo in photos {
                let taken_at = photo.taken_at.map(format_timestamp);
                inserted += stmt.execute(params![
                    photo.uuid,
                    photo.filename,
                    photo.source_path,
                    taken_at,
                    photo.filesize,
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(total = photos.len(), inserted, "inserted photos");
        Ok(inserted)
    }

    /// Lists all photos ordered by capture time then uuid.
    ///
    /// Photos without a capture time sort first (SQLite puts NULLs ahead
    /// under ASC); clustering skips them anyway.
    pub fn list_photos(&self) -> Result<Vec<PhotoRecord>, LibraryError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT uuid, filename, source_path, taken_at, filesize
            FROM photos
            ORDER BY taken_at ASC, uuid ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut photos = Vec::new();
        for row in rows {
            let (uuid, filename, source_path, taken_at, filesize) = row?;
            let taken_at = taken_at
                .map(|value| parse_timestamp(&value, &uuid))
                .transpose()?;
            photos.push(PhotoRecord {
                uuid,
                filename,
                source_path,
                taken_at,
                filesize,
            });
        }
        Ok(photos)
    }

    /// Creates every missing level of a `/`-separated album path.
    ///
    /// Idempotent; returns the id of the leaf album.
    pub fn ensure_album_path(&self, path: &str) -> Result<i64, LibraryError> {
        let mut parent_id = 0;
        for segment in path.split('/') {
            parent_id = self.ensure_album_segment(segment, parent_id)?;
        }
        Ok(parent_id)
    }

    fn ensure_album_segment(&self, name: &str, parent_id: i64) -> Result<i64, LibraryError> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM albums WHERE name = ? AND parent_id = ?",
                params![name, parent_id],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }
        self.conn.execute(
            "INSERT INTO albums (name, parent_id) VALUES (?, ?)",
            params![name, parent_id],
        )?;
        tracing::debug!(album = name, parent_id, "created album");
        Ok(self.conn.last_insert_rowid())
    }

    /// Adds photos to the album at `path`, creating it if needed.
    ///
    /// Membership inserts are `INSERT OR IGNORE`; re-running a clustering
    /// pass does not duplicate rows. Returns the number of new memberships.
    pub fn add_photos_to_album(&mut self, path: &str, uuids: &[&str]) -> Result<usize, LibraryError> {
        let album_id = self.ensure_album_path(path)?;
        let tx = self.conn.transaction()?;
        let mut added = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO album_photos (album_id, photo_uuid) VALUES (?, ?)",
            )?;
            for uuid in uuids {
                added += stmt.execute(params![album_id, uuid])?;
            }
        }
        tx.commit()?;
        Ok(added)
    }

    /// Lists all albums with their full paths and photo counts, sorted by
    /// path.
    pub fn list_albums(&self) -> Result<Vec<AlbumRecord>, LibraryError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, parent_id FROM albums ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;
        let mut nodes: HashMap<i64, (String, i64)> = HashMap::new();
        let mut ids = Vec::new();
        for row in rows {
            let (id, name, parent_id) = row?;
            ids.push(id);
            nodes.insert(id, (name, parent_id));
        }

        let mut stmt = self
            .conn
            .prepare("SELECT album_id, COUNT(*) FROM album_photos GROUP BY album_id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?;
        let mut counts: HashMap<i64, i64> = HashMap::new();
        for row in rows {
            let (album_id, count) = row?;
            counts.insert(album_id, count);
        }

        let mut albums: Vec<AlbumRecord> = ids
            .into_iter()
            .map(|id| AlbumRecord {
                path: full_album_path(id, &nodes),
                photo_count: counts.get(&id).copied().unwrap_or(0),
            })
            .collect();
        albums.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(albums)
    }

    /// Catalog totals for status output.
    pub fn stats(&self) -> Result<LibraryStats, LibraryError> {
        let photo_count =
            self.conn
                .query_row("SELECT COUNT(*) FROM photos", [], |row| row.get(0))?;
        let with_capture_time = self.conn.query_row(
            "SELECT COUNT(*) FROM photos WHERE taken_at IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        let album_count =
            self.conn
                .query_row("SELECT COUNT(*) FROM albums", [], |row| row.get(0))?;
        Ok(LibraryStats {
            photo_count,
            with_capture_time,
            album_count,
        })
    }
}

impl ClusterablePhoto for PhotoRecord {
    fn photo_uuid(&self) -> &str {
        &self.uuid
    }

    fn taken_at(&self) -> Option<DateTime<Utc>> {
        self.taken_at
    }
}

impl AlbumSink for Library {
    type Error = LibraryError;

    fn ensure_album(&mut self, path: &str) -> Result<(), LibraryError> {
        self.ensure_album_path(path).map(|_| ())
    }

    fn add_photos(&mut self, path: &str, uuids: &[&str]) -> Result<(), LibraryError> {
        self.add_photos_to_album(path, uuids).map(|_| ())
    }
}

/// Walks the parent chain to build a `/`-separated path. The chain
/// terminates at parent 0, which is not a row.
fn full_album_path(id: i64, nodes: &HashMap<i64, (String, i64)>) -> String {
    let mut segments = Vec::new();
    let mut cursor = id;
    while let Some((name, parent_id)) = nodes.get(&cursor) {
        segments.push(name.as_str());
        cursor = *parent_id;
    }
    segments.reverse();
    segments.join("/")
}

/// Derives a stable photo uuid from the source path, so re-scanning the
/// same tree yields the same identities.
pub fn deterministic_photo_uuid(source_path: &str) -> String {
    let content = format!("photo|{source_path}");
    Uuid::new_v5(&Uuid::NAMESPACE_OID, content.as_bytes()).to_string()
}

fn parse_timestamp(value: &str, uuid: &str) -> Result<DateTime<Utc>, LibraryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| LibraryError::TimestampParse {
            uuid: uuid.to_string(),
            value: value.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
