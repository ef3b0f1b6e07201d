//! Implementation of the `camroll cluster` command.
//!
//! Groups photos taken close together into clusters and adds them to an
//! album, one sub-album per cluster by default. Options come from flags
//! or, with `--interactive`, from prompts with the same defaults.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use chrono::{Duration, Local};

use camroll_core::{
    AlbumMode, filter_min_size, find_clusters, format_window, parse_window, route_clusters,
    sub_album_name,
};
use camroll_db::Library;

use super::util::{parse_yes, prompt_line};
use crate::ClusterArgs;

/// Options resolved from flags or interactive answers.
#[derive(Debug)]
struct ClusterOptions {
    window: Duration,
    album: String,
    min_size: usize,
    mode: AlbumMode,
}

pub fn run<W: Write, R: BufRead>(
    writer: &mut W,
    mut input: R,
    library: &mut Library,
    args: &ClusterArgs,
) -> Result<()> {
    let options = resolve_options(writer, &mut input, args)?;
    cluster_photos(writer, library, &options)
}

fn resolve_options<W: Write, R: BufRead>(
    writer: &mut W,
    input: &mut R,
    args: &ClusterArgs,
) -> Result<ClusterOptions> {
    if !args.interactive {
        let window = parse_window(&args.window)
            .with_context(|| format!("invalid time window {:?}", args.window))?;
        return Ok(ClusterOptions {
            window,
            album: args.album.clone(),
            min_size: args.min_size,
            mode: album_mode(!args.single_album),
        });
    }

    let window_text = prompt_line(writer, input, "Time window for grouping photos", &args.window)?;
    let window = parse_window(&window_text)
        .with_context(|| format!("invalid time window {window_text:?}"))?;

    let album = prompt_line(writer, input, "Album name", &args.album)?;

    let min_text = prompt_line(
        writer,
        input,
        "Minimum photos per cluster",
        &args.min_size.to_string(),
    )?;
    let min_size = min_text
        .parse()
        .with_context(|| format!("invalid minimum size {min_text:?}"))?;

    let answer = prompt_line(
        writer,
        input,
        "Create a sub-album per cluster?",
        if args.single_album { "no" } else { "yes" },
    )?;

    Ok(ClusterOptions {
        window,
        album,
        min_size,
        mode: album_mode(parse_yes(&answer)),
    })
}

const fn album_mode(sub_albums: bool) -> AlbumMode {
    if sub_albums {
        AlbumMode::PerCluster
    } else {
        AlbumMode::Single
    }
}

fn cluster_photos<W: Write>(
    writer: &mut W,
    library: &mut Library,
    options: &ClusterOptions,
) -> Result<()> {
    let photos = library.list_photos()?;
    tracing::debug!(
        photos = photos.len(),
        window = %format_window(options.window),
        min_size = options.min_size,
        "clustering photos"
    );

    let clusters = filter_min_size(find_clusters(&photos, options.window), options.min_size);
    if clusters.is_empty() {
        writeln!(writer, "No photo clusters found.")?;
        return Ok(());
    }

    let report = route_clusters(&clusters, &options.album, options.mode, &Local, library)?;

    for (index, cluster) in clusters.iter().enumerate() {
        writeln!(
            writer,
            "  {}: {} photos",
            sub_album_name(index + 1, cluster.started_at(), &Local),
            cluster.len()
        )?;
    }
    writeln!(
        writer,
        "Found {} clusters with a total of {} photos",
        clusters.len(),
        report.total_photos()
    )?;
    writeln!(writer, "Added photos to album '{}'", options.album)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use camroll_db::PhotoRecord;
    use chrono::{DateTime, TimeZone, Utc};

    fn photo(uuid: &str, taken_at: DateTime<Utc>) -> PhotoRecord {
        PhotoRecord {
            uuid: uuid.to_string(),
            filename: format!("{uuid}.jpg"),
            source_path: format!("/photos/{uuid}.jpg"),
            taken_at: Some(taken_at),
            filesize: 0,
        }
    }

    fn burst_library() -> Library {
        let base = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let mut library = Library::open_in_memory().unwrap();
        library
            .insert_photos(&[
                photo("p1", base),
                photo("p2", base + Duration::seconds(10)),
                photo("p3", base + Duration::seconds(20)),
                photo("lone", base + Duration::hours(5)),
            ])
            .unwrap();
        library
    }

    fn args(window: &str, album: &str, min_size: usize) -> ClusterArgs {
        ClusterArgs {
            window: window.to_string(),
            album: album.to_string(),
            min_size,
            single_album: false,
            interactive: false,
        }
    }

    #[test]
    fn reports_when_nothing_clusters() {
        let mut library = burst_library();
        let mut output = Vec::new();
        run(
            &mut output,
            Cursor::new(""),
            &mut library,
            &args("1 min", "Trips", 10),
        )
        .unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "No photo clusters found.\n");
        assert!(library.list_albums().unwrap().is_empty());
    }

    #[test]
    fn creates_one_sub_album_per_cluster() {
        let mut library = burst_library();
        let mut output = Vec::new();
        run(
            &mut output,
            Cursor::new(""),
            &mut library,
            &args("1 min", "Trips", 2),
        )
        .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Found 1 clusters with a total of 3 photos"));
        assert!(text.contains("Added photos to album 'Trips'"));

        let albums = library.list_albums().unwrap();
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[0].path, "Trips");
        assert!(albums[1].path.starts_with("Trips/Cluster 1 ("));
        assert_eq!(albums[1].photo_count, 3);
    }

    #[test]
    fn summary_lines_follow_cluster_detail() {
        let mut library = burst_library();
        let mut output = Vec::new();
        run(
            &mut output,
            Cursor::new(""),
            &mut library,
            &args("1 min", "Trips", 2),
        )
        .unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("  Cluster 1 ("));
        assert_eq!(lines[1], "Found 1 clusters with a total of 3 photos");
        assert_eq!(lines[2], "Added photos to album 'Trips'");
    }

    #[test]
    fn single_album_flag_skips_sub_albums() {
        let mut library = burst_library();
        let mut output = Vec::new();
        let mut single = args("1 min", "Trips", 2);
        single.single_album = true;
        run(&mut output, Cursor::new(""), &mut library, &single).unwrap();

        let albums = library.list_albums().unwrap();
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].path, "Trips");
        assert_eq!(albums[0].photo_count, 3);
    }

    #[test]
    fn interactive_answers_override_defaults() {
        let mut library = burst_library();
        let mut output = Vec::new();
        let mut interactive = args("1 min", "Photo Clusters", 10);
        interactive.interactive = true;
        run(
            &mut output,
            Cursor::new("30 sec\nBursts\n2\nno\n"),
            &mut library,
            &interactive,
        )
        .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Time window for grouping photos [1 min]: "));
        assert!(text.contains("Create a sub-album per cluster? [yes]: "));
        assert!(text.contains("Added photos to album 'Bursts'"));

        let albums = library.list_albums().unwrap();
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].path, "Bursts");
    }

    #[test]
    fn interactive_empty_answers_keep_defaults() {
        let mut library = burst_library();
        let mut output = Vec::new();
        let mut interactive = args("1 min", "Trips", 2);
        interactive.interactive = true;
        run(
            &mut output,
            Cursor::new("\n\n\n\n"),
            &mut library,
            &interactive,
        )
        .unwrap();

        let albums = library.list_albums().unwrap();
        assert_eq!(albums.len(), 2);
        assert!(albums[1].path.starts_with("Trips/Cluster 1 ("));
    }

    #[test]
    fn rejects_unparseable_window() {
        let mut library = burst_library();
        let mut output = Vec::new();
        let err = run(
            &mut output,
            Cursor::new(""),
            &mut library,
            &args("abc min", "Trips", 2),
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid time window"));
        assert!(library.list_albums().unwrap().is_empty());
    }
}
