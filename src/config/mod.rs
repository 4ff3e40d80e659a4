//! Service configuration.
//!
//! The configuration is read once at startup from a TOML file and then handed to the
//! components as an immutable value.
mod error;
mod loader;
mod types;

pub use error::{Error, Result};
pub use loader::load;
pub use types::{Config, ContainerData, ContainersConfig, EtcdConfig, LxdConfig};
