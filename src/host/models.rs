//! Subset of the LXD REST API objects read by the service.
use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// Envelope wrapping every LXD REST response.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub error_code: u16,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Response {
    pub fn is_error(&self) -> bool {
        self.kind == "error"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Network {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub managed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NetworkState {
    #[serde(default)]
    pub hwaddr: String,
    #[serde(default)]
    pub state: String,
}

/// A container as returned with `recursion=2`, i.e. including its live state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContainerFull {
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expanded_devices: HashMap<String, HashMap<String, String>>,
    #[serde(default)]
    pub state: Option<ContainerState>,
}

impl ContainerFull {
    /// Iterates over the live network devices of the container.
    ///
    /// Stopped containers have no live state and yield nothing.
    pub fn networks(&self) -> impl Iterator<Item = (&String, &ContainerStateNetwork)> {
        self.state.iter().flat_map(|state| state.network.iter())
    }

    /// Returns the value of `key` in the expanded config of device `device`.
    pub fn device_config(&self, device: &str, key: &str) -> Option<&str> {
        self.expanded_devices
            .get(device)
            .and_then(|config| config.get(key))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContainerState {
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub network: HashMap<String, ContainerStateNetwork>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContainerStateNetwork {
    #[serde(default, deserialize_with = "null_as_default")]
    pub addresses: Vec<ContainerStateNetworkAddress>,
    #[serde(default)]
    pub hwaddr: String,
    /// Name of the interface on the host side.
    #[serde(default)]
    pub host_name: String,
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContainerStateNetworkAddress {
    pub family: String,
    pub address: String,
    pub netmask: String,
    #[serde(default)]
    pub scope: String,
}

impl ContainerStateNetworkAddress {
    pub fn is_inet(&self) -> bool {
        self.family == "inet"
    }

    /// Formats the address as `address/netmask`.
    pub fn cidr(&self) -> String {
        format!("{}/{}", self.address, self.netmask)
    }
}

/// A raw message from the LXD event stream.
///
/// The metadata is kept undecoded; its shape depends on the event type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub project: String,
}

/// Metadata of a `lifecycle` event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventLifecycle {
    pub action: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
