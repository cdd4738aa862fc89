//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI parser for `netcassette`.
#[derive(Debug, Parser)]
#[command(
    name = "netcassette",
    version,
    about = "Record test-run HTTP interactions as YAML cassettes"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write a cassette from a newline-delimited JSON stream of runner events.
    Record {
        /// Event stream to read; `-` reads stdin.
        #[arg(long, env = "NETCASSETTE_EVENTS", default_value = "-", value_name = "PATH")]
        events: String,
        /// Where to write the cassette; `-` writes to stdout.
        #[arg(long, env = "NETCASSETTE_STORE_NETWORK_LOG", value_name = "PATH")]
        store_network_log: PathBuf,
        /// Write incrementally as events arrive, or all at once at the end.
        #[arg(
            long,
            env = "NETCASSETTE_CASSETTE_MODE",
            value_enum,
            default_value_t = CassetteMode::Streaming
        )]
        cassette_mode: CassetteMode,
    },
}

/// How the cassette is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CassetteMode {
    /// Emit each interaction as it arrives.
    Streaming,
    /// Hold the cassette in memory and write it at the end.
    Buffered,
}
