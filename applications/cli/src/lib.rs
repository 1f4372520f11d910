//! Conty CLI
//!
//! Library half of the `conty` binary: configuration loading, the silent
//! player used to walk packs, and the subcommand implementations.

pub mod commands;
pub mod config;
pub mod dry_run;
pub mod error;

pub use config::ContyConfig;
pub use error::{CliError, Result};
