//! Implementation of the `camroll export` command.
//!
//! Writes the catalog as JSONL, one photo per line, ordered by capture
//! time so exports can be diffed and piped into `camroll import`.

use std::io::Write;

use anyhow::{Context, Result};

use camroll_db::Library;

pub fn run<W: Write>(writer: &mut W, library: &Library) -> Result<()> {
    let photos = library.list_photos()?;
    for photo in photos {
        serde_json::to_writer(&mut *writer, &photo).context("failed to serialize photo")?;
        // Handle broken pipe gracefully (e.g., when piped to `head`)
        if writeln!(writer).is_err() {
            break;
        }
    }
    Ok(())
}
