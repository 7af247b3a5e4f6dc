//! Command-line interface for album-minder.
//!
//! This module provides CLI commands for mirroring a remote album into a
//! local directory and for listing remote albums and images.

mod commands;

pub use commands::{Cli, Commands, run_command};
