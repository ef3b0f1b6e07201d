//! Import command for loading photo records into the local catalog.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use camroll_db::{Library, PhotoRecord, deterministic_photo_uuid};

pub fn run<W: Write, R: BufRead>(writer: &mut W, reader: R, library: &mut Library) -> Result<()> {
    let photos = parse_photos(reader)?;
    let inserted = library.insert_photos(&photos)?;
    writeln!(writer, "Imported {} photos ({inserted} new)", photos.len())?;
    Ok(())
}

fn parse_photos<R: BufRead>(reader: R) -> Result<Vec<PhotoRecord>> {
    let mut photos = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let parsed: ImportPhoto = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid JSON on line {}", idx + 1))?;
        let record = parsed
            .into_record()
            .with_context(|| format!("invalid photo on line {}", idx + 1))?;
        photos.push(record);
    }
    Ok(photos)
}

#[derive(Debug, Deserialize)]
struct ImportPhoto {
    #[serde(default)]
    uuid: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    source_path: String,
    #[serde(default)]
    taken_at: Option<DateTime<Utc>>,
    #[serde(default)]
    filesize: i64,
}

impl ImportPhoto {
    fn into_record(self) -> Result<PhotoRecord> {
        if self.source_path.trim().is_empty() {
            return Err(anyhow::anyhow!("missing source_path"));
        }
        let uuid = match self.uuid {
            Some(uuid) if !uuid.trim().is_empty() => uuid,
            _ => deterministic_photo_uuid(&self.source_path),
        };
        let filename = match self.filename {
            Some(name) if !name.trim().is_empty() => name,
            _ => Path::new(&self.source_path)
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("missing filename"))?,
        };
        Ok(PhotoRecord {
            uuid,
            filename,
            source_path: self.source_path,
            taken_at: self.taken_at,
            filesize: self.filesize,
        })
    }
}
