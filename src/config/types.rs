use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_SOCKET: &str = "/var/lib/lxd/unix.socket";
const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_WAIT_FOR_DHCP: Duration = Duration::from_secs(5);
const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(5);

/// Top level structure of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Starts the service with debug logging unless a level was given on the command line.
    #[serde(default)]
    pub debug: bool,
    /// Name under which the host state is published, i.e. `/lxd/<hostname>/...`.
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub lxd: LxdConfig,
    pub etcd: EtcdConfig,
    #[serde(default)]
    pub containers: ContainersConfig,
}

/// Connection to the local LXD daemon and refresh timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LxdConfig {
    #[serde(default = "default_socket")]
    pub socket: PathBuf,
    /// Period of the safety-net refresh, in seconds.
    #[serde(default = "default_refresh_interval", with = "seconds")]
    pub refresh_interval: Duration,
    /// Delay of the additional refresh that follows an event burst, in seconds.
    ///
    /// Gives DHCP leases and similar asynchronous changes the time to show up.
    #[serde(default = "default_wait_for_dhcp", with = "seconds")]
    pub wait_for_dhcp: Duration,
}

impl Default for LxdConfig {
    fn default() -> Self {
        Self {
            socket: default_socket(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            wait_for_dhcp: DEFAULT_WAIT_FOR_DHCP,
        }
    }
}

/// Connection parameters of the etcd cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtcdConfig {
    pub endpoints: Vec<String>,
    #[serde(default = "default_dial_timeout", with = "seconds")]
    pub dial_timeout: Duration,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl EtcdConfig {
    /// Returns the credentials to authenticate with, if a username is set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.username.is_empty() {
            None
        } else {
            Some((self.username.as_str(), self.password.as_str()))
        }
    }
}

/// Extra data attached to a container that LXD does not know about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerData {
    #[serde(default)]
    pub node_ip: String,
    #[serde(default)]
    pub default_interface: String,
}

/// Per-container extra data, keyed by container name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainersConfig(BTreeMap<String, ContainerData>);

impl ContainersConfig {
    /// Returns the data configured for `name`, or empty data for unknown containers.
    pub fn get(&self, name: &str) -> ContainerData {
        self.0.get(name).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ContainerData)> for ContainersConfig {
    fn from_iter<I: IntoIterator<Item = (String, ContainerData)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn default_socket() -> PathBuf {
    PathBuf::from(DEFAULT_SOCKET)
}

fn default_refresh_interval() -> Duration {
    DEFAULT_REFRESH_INTERVAL
}

fn default_wait_for_dhcp() -> Duration {
    DEFAULT_WAIT_FOR_DHCP
}

fn default_dial_timeout() -> Duration {
    DEFAULT_DIAL_TIMEOUT
}

/// (De)serializes a [`Duration`] as whole seconds.
mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
