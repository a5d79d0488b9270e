//! Lamden CLI Library
//!
//! Command-line front end over the Lamden crates: argument parsing, config
//! overrides and the command implementations used by the `lamden-cli` binary.

pub mod args;
pub mod commands;
pub mod config;
pub mod logging;

pub use args::CliArgs;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
