//! Album routing for surviving clusters.
//!
//! The host supplies an [`AlbumSink`] (camroll-db's `Library`, or a test
//! fixture); routing decides which albums exist and which photos land in
//! them. Progress is emitted as tracing events and never affects results.

use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

use crate::cluster::{Cluster, ClusterablePhoto};

/// Destination for cluster membership writes.
///
/// Album paths nest with `/`: ensuring `"Photo Clusters/Cluster 1"` creates
/// the parent first if needed. Implementations are free to treat repeated
/// calls as no-ops.
pub trait AlbumSink {
    type Error;

    /// Creates the album at `path` unless it already exists.
    fn ensure_album(&mut self, path: &str) -> Result<(), Self::Error>;

    /// Adds photos by uuid to the album at `path`.
    fn add_photos(&mut self, path: &str, uuids: &[&str]) -> Result<(), Self::Error>;
}

/// How surviving clusters map onto albums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumMode {
    /// One sub-album per cluster, nested under the root album.
    PerCluster,
    /// Every cluster's photos directly into the root album.
    Single,
}

/// One album written during routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedAlbum {
    /// Full `/`-separated album path.
    pub path: String,

    /// Number of photos added.
    pub photo_count: usize,

    /// Capture time of the earliest photo routed here.
    pub started_at: DateTime<Utc>,
}

/// Outcome of [`route_clusters`], for the caller's reporting.
#[derive(Debug, Default)]
pub struct RoutingReport {
    /// Albums written, in routing order.
    pub albums: Vec<RoutedAlbum>,
}

impl RoutingReport {
    /// Total photos across all written albums.
    pub fn total_photos(&self) -> usize {
        self.albums.iter().map(|album| album.photo_count).sum()
    }
}

/// Name for a cluster's sub-album: `"Cluster {index} ({start})"` with a
/// 1-based index and the start time formatted `%Y-%m-%d %H:%M:%S` in `tz`.
pub fn sub_album_name<Tz: TimeZone>(index: usize, started_at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    format!(
        "Cluster {} ({})",
        index,
        started_at.with_timezone(tz).format("%Y-%m-%d %H:%M:%S")
    )
}

/// Writes surviving clusters into `sink` under `root_album`.
///
/// In [`AlbumMode::PerCluster`] each cluster gets its own
/// `"{root}/Cluster {i} ({start})"` sub-album, indexed in discovery order.
/// In [`AlbumMode::Single`] every cluster's photos go into the root album
/// itself, concatenated in cluster order. Nothing is touched when
/// `clusters` is empty.
///
/// `tz` is the display time zone for sub-album names; storage timestamps
/// stay UTC throughout.
///
/// # Errors
///
/// Returns the sink's own error unchanged on the first failed write.
pub fn route_clusters<P, S, Tz>(
    clusters: &[Cluster<'_, P>],
    root_album: &str,
    mode: AlbumMode,
    tz: &Tz,
    sink: &mut S,
) -> Result<RoutingReport, S::Error>
where
    P: ClusterablePhoto,
    S: AlbumSink,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut report = RoutingReport::default();
    if clusters.is_empty() {
        return Ok(report);
    }

    sink.ensure_album(root_album)?;

    match mode {
        AlbumMode::PerCluster => {
            for (index, cluster) in clusters.iter().enumerate() {
                let name = sub_album_name(index + 1, cluster.started_at(), tz);
                let path = format!("{root_album}/{name}");
                let uuids: Vec<&str> = cluster
                    .members()
                    .iter()
                    .map(|photo| photo.photo_uuid())
                    .collect();

                tracing::debug!(album = %path, photos = uuids.len(), "routing cluster");
                sink.ensure_album(&path)?;
                sink.add_photos(&path, &uuids)?;

                report.albums.push(RoutedAlbum {
                    path,
                    photo_count: uuids.len(),
                    started_at: cluster.started_at(),
                });
            }
        }
        AlbumMode::Single => {
            let uuids: Vec<&str> = clusters
                .iter()
                .flat_map(|cluster| cluster.members().iter().map(|photo| photo.photo_uuid()))
                .collect();

            tracing::debug!(album = %root_album, photos = uuids.len(), "routing all clusters");
            sink.add_photos(root_album, &uuids)?;

            report.albums.push(RoutedAlbum {
                path: root_album.to_string(),
                photo_count: uuids.len(),
                started_at: clusters[0].started_at(),
            });
        }
    }

    Ok(report)
}
