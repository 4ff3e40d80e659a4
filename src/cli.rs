//! Command-line interface of the `lxd2etcd` binary.
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

/// Mirrors LXD container and network state into etcd.
#[derive(Debug, Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "/etc/lxd2etcd.toml")]
    pub config: PathBuf,

    /// Start with debug logging
    #[arg(short, long, conflicts_with = "trace")]
    pub debug: bool,

    /// Start with trace logging
    #[arg(short, long)]
    pub trace: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Log level requested on the command line, if any.
    pub fn log_level(&self) -> Option<LevelFilter> {
        if self.trace {
            Some(LevelFilter::Trace)
        } else if self.debug {
            Some(LevelFilter::Debug)
        } else {
            None
        }
    }
}
