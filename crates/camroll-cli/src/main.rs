use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use camroll_cli::commands::{albums, cluster, export, import, scan, status};
use camroll_cli::{Cli, Commands, Config};

/// Load config and open the catalog, ensuring the parent directory exists.
fn open_library(
    config_path: Option<&Path>,
    library_override: Option<&Path>,
) -> Result<(camroll_db::Library, PathBuf)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let library_path = library_override.map_or(config.library_path, Path::to_path_buf);

    if let Some(parent) = library_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create catalog directory")?;
    }

    let library =
        camroll_db::Library::open(&library_path).context("failed to open catalog")?;
    Ok((library, library_path))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    // Events go to stderr so stdout stays machine-readable for `export`
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Scan { paths }) => {
            let (mut library, _) = open_library(cli.config.as_deref(), cli.library.as_deref())?;
            scan::run(&mut out, &mut library, paths)?;
        }
        Some(Commands::Import) => {
            let (mut library, _) = open_library(cli.config.as_deref(), cli.library.as_deref())?;
            let stdin = io::stdin();
            import::run(&mut out, stdin.lock(), &mut library)?;
        }
        Some(Commands::Export) => {
            let (library, _) = open_library(cli.config.as_deref(), cli.library.as_deref())?;
            export::run(&mut out, &library)?;
        }
        Some(Commands::Cluster(args)) => {
            let (mut library, _) = open_library(cli.config.as_deref(), cli.library.as_deref())?;
            let stdin = io::stdin();
            cluster::run(&mut out, stdin.lock(), &mut library, args)?;
        }
        Some(Commands::Albums) => {
            let (library, _) = open_library(cli.config.as_deref(), cli.library.as_deref())?;
            albums::run(&mut out, &library)?;
        }
        Some(Commands::Status) => {
            let (library, library_path) =
                open_library(cli.config.as_deref(), cli.library.as_deref())?;
            status::run(&mut out, &library, &library_path)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    out.flush()?;
    Ok(())
}
