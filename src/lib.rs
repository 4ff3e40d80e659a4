//! lxd2etcd: mirrors the container and network state of an LXD host into etcd.
//!
//! The host state is captured on startup, periodically and after bursts of LXD lifecycle events,
//! and written as JSON to `/lxd/<hostname>/networks` and `/lxd/<hostname>/containers`.
use std::sync::Arc;

use log::LevelFilter;

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod service;
pub mod signals;
pub mod snapshot;
pub mod store;
#[cfg(test)]
mod testing;

use cli::Cli;
use host::LxdConnector;
use service::{Scheduler, ServiceControl, Shutdown};
use store::EtcdConnector;

/// Runs the service until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the signal handlers cannot be
/// installed, or if the service stopped before it recovered from a fatal error.
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load(&cli.config)?;
    if cli.log_level().is_none() && config.debug {
        log::set_max_level(LevelFilter::Debug);
    }
    log::info!(
        "starting {} {} for host <{}> with {} configured container(s)",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.hostname,
        config.containers.len()
    );
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("configuration:\n{}", config.to_redacted_toml()?);
    }

    let (shutdown, signal) = Shutdown::new();
    let _signals = signals::spawn_handler(shutdown)?;

    let scheduler = Scheduler::new(
        LxdConnector::new(config.lxd.socket.clone()),
        EtcdConnector::new(&config.etcd),
        &config,
        Arc::new(ServiceControl::default()),
    );
    scheduler.run(signal).await?;
    Ok(())
}
