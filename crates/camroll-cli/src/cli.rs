//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Photo library organizer.
///
/// Indexes photos into a local catalog and groups shots taken in quick
/// succession into albums, one sub-album per burst.
#[derive(Debug, Parser)]
#[command(name = "camroll", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the catalog database (overrides config).
    #[arg(short, long, global = true)]
    pub library: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan directories for photos and index them into the catalog.
    Scan {
        /// Directories to scan recursively.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Import photo records as JSONL from stdin.
    Import,

    /// Export the catalog as JSONL to stdout.
    Export,

    /// Group photos taken close together into albums.
    Cluster(ClusterArgs),

    /// List albums and their photo counts.
    Albums,

    /// Show catalog location and counts.
    Status,
}

/// Options for the `cluster` command.
#[derive(Debug, Args)]
pub struct ClusterArgs {
    /// Time window for grouping photos (e.g. "30 sec", "1 min", "2 hours").
    #[arg(short, long, default_value = "1 min")]
    pub window: String,

    /// Name of the album to add clusters to.
    #[arg(short, long, default_value = "Photo Clusters")]
    pub album: String,

    /// Minimum number of photos for a cluster to be kept.
    #[arg(short, long, default_value_t = 10)]
    pub min_size: usize,

    /// Put all photos directly into the album instead of one sub-album
    /// per cluster.
    #[arg(long)]
    pub single_album: bool,

    /// Prompt for each option, with defaults shown.
    #[arg(short, long)]
    pub interactive: bool,
}
