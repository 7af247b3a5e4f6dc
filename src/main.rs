//! Album Minder - a one-way mirror for remote photo albums.
//!
//! This application downloads the images of one named remote album into a
//! local directory and deletes local files that are no longer present
//! remotely. It also provides read-only listing commands for a user's albums
//! and images.

pub mod cli;
pub mod config;
pub mod error;
pub mod gallery;
pub mod mirror;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("album_minder=info".parse().unwrap()))
        .init();

    cli::run_command(&args)
}
