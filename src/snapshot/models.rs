use std::collections::BTreeMap;

use serde::Serialize;

use crate::host::models::{ContainerFull, ContainerStateNetwork};

/// Retrieved info about a network of the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    pub mac: String,
}

/// A network device (interface) of a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetDev {
    pub network: String,
    pub port: String,
    pub mac: String,
    pub ipv4: Vec<String>,
    pub ipv6: Vec<String>,
}

impl NetDev {
    /// Builds the device `name` of `container` from its live state.
    pub fn new(container: &ContainerFull, name: &str, state: &ContainerStateNetwork) -> Self {
        let (ipv4, ipv6): (Vec<_>, Vec<_>) = state.addresses.iter().partition(|a| a.is_inet());
        Self {
            network: container
                .device_config(name, "network")
                .unwrap_or_default()
                .to_owned(),
            port: state.host_name.clone(),
            mac: state.hwaddr.clone(),
            ipv4: ipv4.into_iter().map(|a| a.cidr()).collect(),
            ipv6: ipv6.into_iter().map(|a| a.cidr()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    pub status: String,
    pub default_interface: String,
    pub default_ipv4: Vec<String>,
    pub default_ipv6: Vec<String>,
    pub node_ip: String,
    pub netdevs: BTreeMap<String, NetDev>,
}

/// One capture of the networks and containers of the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostSnapshot {
    pub networks: BTreeMap<String, NetworkInfo>,
    pub containers: BTreeMap<String, ContainerInfo>,
}

impl HostSnapshot {
    /// Multiline, indented JSON rendering for logs.
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|err| format!("fail to compute pretty string for {self:?}: {err}"))
    }
}
