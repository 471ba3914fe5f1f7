//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "d1-console",
    version,
    about = "Operator console for a single relay output (D1) exposed over HTTP"
)]
pub struct Cli {
    /// Device origin, e.g. http://192.168.4.20
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Console config file
    #[arg(long, global = true, default_value = d1_console::config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<ConsoleCommand>,
}

#[derive(Debug, Subcommand)]
pub enum ConsoleCommand {
    /// Interactive console (the default when no subcommand is given)
    Console {
        /// Default value for the latch-seconds field
        #[arg(long)]
        latch_seconds: Option<u64>,
        /// Render without accepting control keys
        #[arg(long)]
        no_input: bool,
    },
    /// Print the current pin state and exit
    Status,
    /// Switch the output on
    On {
        /// Revert to off after this many seconds
        #[arg(long)]
        latch_seconds: Option<u64>,
    },
    /// Switch the output off
    Off {
        /// Revert to on after this many seconds
        #[arg(long)]
        latch_seconds: Option<u64>,
    },
    /// Toggle the output
    Toggle {
        /// Revert after this many seconds
        #[arg(long)]
        latch_seconds: Option<u64>,
    },
}
