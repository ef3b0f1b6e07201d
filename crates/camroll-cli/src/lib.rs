//! Camroll CLI library.
//!
//! This crate provides the CLI interface for the photo catalog.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, ClusterArgs, Commands};
pub use config::Config;
