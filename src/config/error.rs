use std::path::PathBuf;

/// Errors that may occur while loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read config file `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to parse config: {0}")]
    ParseStr(#[source] toml::de::Error),
    #[error("hostname is not configured and could not be read from the system: {0}")]
    Hostname(#[source] std::io::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error("failed to render config: {0}")]
    Render(#[source] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
