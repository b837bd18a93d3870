use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sitewatch")]
#[command(about = "Site reachability and host hardware monitor")]
#[command(version)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the monitoring loops and scheduled jobs until interrupted
    Run,
    /// Create result folders and seed empty alert state files
    Init,
    /// Run a single reachability cycle
    PingOnce,
    /// Run a single hardware cycle
    HardwareOnce,
    /// Send a report now
    Report {
        /// Only the last N samples, mailed to the ad-hoc list
        #[arg(long)]
        last: Option<usize>,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Run)
    }
}
