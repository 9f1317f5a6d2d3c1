//! CLI, configuration file, report rendering
//!
//! This crate provides the `rosterview` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod secret;

pub use cli::Cli;
pub use config::RosterConfig;
pub use error::{CliError, CliResult};
