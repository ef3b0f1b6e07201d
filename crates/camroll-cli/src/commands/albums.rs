//! Albums command for listing albums with their photo counts.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;

use camroll_db::{AlbumRecord, Library};

/// Format albums for human-readable output.
fn format_albums(albums: &[AlbumRecord]) -> String {
    let mut output = String::new();

    writeln!(output, "ALBUMS").unwrap();
    writeln!(output).unwrap();

    if albums.is_empty() {
        writeln!(output, "No albums yet.").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "Hint: Run 'camroll cluster' to group photos into albums."
        )
        .unwrap();
        return output;
    }

    writeln!(output, "{:<50}  {:>7}", "Album", "Photos").unwrap();
    writeln!(
        output,
        "──────────────────────────────────────────────────  ───────"
    )
    .unwrap();

    for album in albums {
        // Truncate by characters, not bytes, to avoid panics on multi-byte UTF-8
        let path_display = if album.path.chars().count() > 50 {
            format!("{}...", album.path.chars().take(47).collect::<String>())
        } else {
            album.path.clone()
        };
        writeln!(output, "{:<50}  {:>7}", path_display, album.photo_count).unwrap();
    }

    output
}

/// Runs the albums command.
pub fn run<W: Write>(writer: &mut W, library: &Library) -> Result<()> {
    let albums = library.list_albums()?;
    write!(writer, "{}", format_albums(&albums))?;
    Ok(())
}
