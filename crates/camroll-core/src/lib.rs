//! Core domain logic for camroll.
//!
//! This crate contains the fundamental types and logic for:
//! - Window parsing: human duration text like `"1 min"` into a time window
//! - Clustering: chaining photos into bursts by capture-time proximity
//! - Album routing: writing surviving clusters into an album sink

pub mod album;
pub mod cluster;
pub mod window;

pub use album::{AlbumMode, AlbumSink, RoutedAlbum, RoutingReport, route_clusters, sub_album_name};
pub use cluster::{Cluster, ClusterablePhoto, filter_min_size, find_clusters};
pub use window::{WindowParseError, format_window, parse_window};
