use std::path::Path;

use super::{Config, Error, Result};

/// Reads, parses and validates the configuration file at `path`.
///
/// A missing `hostname` falls back to the system hostname.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if a required value is missing.
pub fn load(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = toml::from_str(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("config file `{}` parsed successfully", path.display());
    finish(config)
}

impl Config {
    /// Parses and validates a configuration from its TOML representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be parsed or a required value is missing.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(Error::ParseStr)?;
        finish(config)
    }

    /// Renders the configuration back to TOML with the etcd password masked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if serialization fails.
    pub fn to_redacted_toml(&self) -> Result<String> {
        let mut redacted = self.clone();
        if !redacted.etcd.password.is_empty() {
            redacted.etcd.password = "********".to_owned();
        }
        toml::to_string_pretty(&redacted).map_err(Error::Render)
    }
}

fn finish(mut config: Config) -> Result<Config> {
    if config.hostname.trim().is_empty() {
        config.hostname = system_hostname()?;
    }
    validate(&config)?;
    Ok(config)
}

fn system_hostname() -> Result<String> {
    let hostname = std::fs::read_to_string("/etc/hostname")
        .or_else(|_| std::fs::read_to_string("/proc/sys/kernel/hostname"))
        .map_err(Error::Hostname)?;
    Ok(hostname.trim().to_owned())
}

fn validate(config: &Config) -> Result<()> {
    if config.hostname.trim().is_empty() {
        return Err(Error::Invalid {
            field: "hostname",
            reason: "must not be empty",
        });
    }
    if config.hostname.contains('/') {
        return Err(Error::Invalid {
            field: "hostname",
            reason: "must not contain `/`",
        });
    }
    if config.lxd.socket.as_os_str().is_empty() {
        return Err(Error::Invalid {
            field: "lxd.socket",
            reason: "must not be empty",
        });
    }
    if config.lxd.refresh_interval.is_zero() {
        return Err(Error::Invalid {
            field: "lxd.refresh_interval",
            reason: "must be at least one second",
        });
    }
    if config.etcd.endpoints.iter().all(|e| e.trim().is_empty()) {
        return Err(Error::Invalid {
            field: "etcd.endpoints",
            reason: "at least one endpoint is required",
        });
    }
    Ok(())
}
