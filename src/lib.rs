//! Core library entry for `netcassette`.
//!
//! Records the HTTP interactions observed during a test run into a YAML
//! cassette. [`cassette::StreamingCassetteWriter`] writes the document
//! incrementally as interactions arrive; [`cassette::BufferedCassetteWriter`]
//! keeps it in memory and writes it once at the end. Both plug into the
//! runner through [`handlers::EventHandler`].

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod ports;
pub mod runner;

pub use error::{CassetteError, Result};

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> std::result::Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}
