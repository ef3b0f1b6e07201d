//! CLI subcommand implementations.

pub mod albums;
pub mod cluster;
pub mod export;
pub mod import;
pub mod scan;
pub mod status;
pub mod util;
