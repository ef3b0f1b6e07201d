//! Status command for showing the catalog location and counts.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use camroll_db::Library;

pub fn run<W: Write>(writer: &mut W, library: &Library, library_path: &Path) -> Result<()> {
    let stats = library.stats()?;

    writeln!(writer, "Photo catalog status")?;
    writeln!(writer, "Catalog: {}", library_path.display())?;

    if stats.photo_count == 0 {
        writeln!(writer, "No photos indexed.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "Photos: {} ({} with capture time)",
        stats.photo_count, stats.with_capture_time
    )?;
    writeln!(writer, "Albums: {}", stats.album_count)?;

    let time_zone = iana_time_zone::get_timezone().unwrap_or_else(|_| "unknown".to_string());
    writeln!(writer, "Time zone: {time_zone}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use camroll_db::PhotoRecord;
    use chrono::{TimeZone, Utc};

    #[test]
    fn status_reports_counts() {
        let temp = tempfile::tempdir().unwrap();
        let library_path = temp.path().join("library.db");
        let mut library = Library::open(&library_path).unwrap();

        library
            .insert_photos(&[
                PhotoRecord {
                    uuid: "p1".to_string(),
                    filename: "p1.jpg".to_string(),
                    source_path: "/photos/p1.jpg".to_string(),
                    taken_at: Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()),
                    filesize: 100,
                },
                PhotoRecord {
                    uuid: "p2".to_string(),
                    filename: "p2.jpg".to_string(),
                    source_path: "/photos/p2.jpg".to_string(),
                    taken_at: None,
                    filesize: 200,
                },
            ])
            .unwrap();
        library.add_photos_to_album("Favorites", &["p1"]).unwrap();

        let mut output = Vec::new();
        run(&mut output, &library, &library_path).unwrap();

        let output = String::from_utf8(output).unwrap();
        let output = output.replace(&library_path.display().to_string(), "[TEMP]/library.db");
        assert!(output.starts_with("Photo catalog status\nCatalog: [TEMP]/library.db\n"));
        assert!(output.contains("Photos: 2 (1 with capture time)"));
        assert!(output.contains("Albums: 1"));
        assert!(output.contains("Time zone: "));
    }

    #[test]
    fn status_notes_empty_catalog() {
        let library = Library::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &library, Path::new("library.db")).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.ends_with("No photos indexed.\n"));
        assert!(!output.contains("Time zone"));
    }
}
