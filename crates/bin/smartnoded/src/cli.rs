//! Command-line flags. They take precedence over the config file and the
//! environment.

use std::path::PathBuf;

use clap::Parser;

use crate::profile::Profile;

/// Serve one observable OCF resource over HTTP.
#[derive(Debug, Default, Parser)]
#[command(name = "smartnoded")]
#[command(version)]
pub struct Cli {
    /// Synthesize values instead of reading hardware or talking to the hub
    #[arg(short, long)]
    pub simulation: bool,

    /// Resource profile to serve
    #[arg(long, value_enum)]
    pub profile: Option<Profile>,

    /// Configuration file (defaults to `smartnode.toml` when present)
    #[arg(long, env = "SMARTNODE_CONFIG")]
    pub config: Option<PathBuf>,
}
