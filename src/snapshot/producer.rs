use std::collections::BTreeMap;
use std::sync::Arc;

use super::models::{ContainerInfo, HostSnapshot, NetDev, NetworkInfo};
use super::{Error, Result};
use crate::config::ContainersConfig;
use crate::host::{ContainerFull, HostSession};

/// Builds [`HostSnapshot`]s from the host, enriched with the configured container data.
#[derive(Debug, Clone)]
pub struct Producer {
    containers: Arc<ContainersConfig>,
}

impl Producer {
    pub fn new(containers: Arc<ContainersConfig>) -> Self {
        Self { containers }
    }

    /// Retrieves the current networks and containers of the host.
    ///
    /// # Errors
    ///
    /// Fails on the first failing host query; no partial snapshot is returned.
    pub async fn capture<H: HostSession>(&self, host: &H) -> Result<HostSnapshot> {
        log::debug!("retrieve network infos");
        let mut networks = BTreeMap::new();
        for network in host.list_networks().await.map_err(Error::ListNetworks)? {
            log::trace!("processing network: {network:?}");
            let state =
                host.network_state(&network.name)
                    .await
                    .map_err(|source| Error::NetworkState {
                        name: network.name.clone(),
                        source,
                    })?;
            networks.insert(network.name, NetworkInfo { mac: state.hwaddr });
        }

        log::debug!("retrieve container infos");
        let mut containers = BTreeMap::new();
        for container in host
            .list_containers_full()
            .await
            .map_err(Error::ListContainers)?
        {
            log::trace!("processing container: {}", container.name);
            let info = self.container_info(&container);
            containers.insert(container.name, info);
        }

        Ok(HostSnapshot {
            networks,
            containers,
        })
    }

    fn container_info(&self, container: &ContainerFull) -> ContainerInfo {
        let extra = self.containers.get(&container.name);
        let netdevs: BTreeMap<String, NetDev> = container
            .networks()
            .map(|(name, state)| {
                log::trace!("processing container network <{name}>: {state:?}");
                (name.clone(), NetDev::new(container, name, state))
            })
            .collect();
        let (default_ipv4, default_ipv6) = netdevs
            .get(&extra.default_interface)
            .map(|dev| (dev.ipv4.clone(), dev.ipv6.clone()))
            .unwrap_or_default();

        ContainerInfo {
            status: container.status.clone(),
            default_interface: extra.default_interface,
            default_ipv4,
            default_ipv6,
            node_ip: extra.node_ip,
            netdevs,
        }
    }
}
