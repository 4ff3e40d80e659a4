use clap::Parser;
use log::LevelFilter;
use lxd2etcd::cli::Cli;

/// Entry point of the lxd2etcd service.
///
/// Exits with status 1 if the configuration is invalid or the service stopped on an error.
///
/// # Examples
///
/// ```bash
/// lxd2etcd --config /etc/lxd2etcd.toml --debug
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    lxd2etcd::logging::init(cli.log_level().unwrap_or(LevelFilter::Info), !cli.no_color);
    lxd2etcd::run(cli).await
}
