use serde::Serialize;

use super::models::HostSnapshot;
use super::{Error, Result};
use crate::store::StoreSession;

/// Key holding the networks of `hostname`.
pub fn networks_key(hostname: &str) -> String {
    format!("/lxd/{hostname}/networks")
}

/// Key holding the containers of `hostname`.
pub fn containers_key(hostname: &str) -> String {
    format!("/lxd/{hostname}/containers")
}

/// Writes snapshots to the store under the keys of one host.
#[derive(Debug, Clone)]
pub struct Publisher {
    hostname: String,
}

impl Publisher {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
        }
    }

    /// Writes the networks, then the containers of `snapshot`.
    ///
    /// The two writes are independent: when the second one fails the keys disagree until the
    /// next successful refresh.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be serialized or written.
    pub async fn write<S: StoreSession>(
        &self,
        store: &mut S,
        snapshot: &HostSnapshot,
    ) -> Result<()> {
        put_json(store, networks_key(&self.hostname), &snapshot.networks).await?;
        put_json(store, containers_key(&self.hostname), &snapshot.containers).await
    }
}

async fn put_json<S: StoreSession, T: Serialize>(
    store: &mut S,
    key: String,
    value: &T,
) -> Result<()> {
    let value = serde_json::to_string(value).map_err(|source| Error::Serialize {
        key: key.clone(),
        source,
    })?;
    log::trace!("put {key} = {value}");
    store.put(&key, value).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::snapshot::{ContainerInfo, NetDev, NetworkInfo};
    use crate::testing::FakeStore;

    fn snapshot() -> HostSnapshot {
        let mut snapshot = HostSnapshot::default();
        snapshot.networks.insert(
            "lxdbr0".to_owned(),
            NetworkInfo {
                mac: "00:16:3e:aa:bb:cc".to_owned(),
            },
        );
        snapshot.containers.insert(
            "web1".to_owned(),
            ContainerInfo {
                status: "Running".to_owned(),
                default_interface: "eth0".to_owned(),
                default_ipv4: vec!["10.0.0.5/24".to_owned()],
                default_ipv6: Vec::new(),
                node_ip: "10.0.0.5".to_owned(),
                netdevs: BTreeMap::from([(
                    "eth0".to_owned(),
                    NetDev {
                        network: "lxdbr0".to_owned(),
                        port: "veth1".to_owned(),
                        mac: "00:16:3e:00:00:01".to_owned(),
                        ipv4: vec!["10.0.0.5/24".to_owned()],
                        ipv6: Vec::new(),
                    },
                )]),
            },
        );
        snapshot
    }

    #[test]
    fn test_keys() {
        assert_eq!(networks_key("host1"), "/lxd/host1/networks");
        assert_eq!(containers_key("host1"), "/lxd/host1/containers");
    }

    #[tokio::test]
    async fn test_write_both_keys() {
        let store = FakeStore::default();
        let mut session = store.session();

        Publisher::new("host1")
            .write(&mut session, &snapshot())
            .await
            .unwrap();

        let values = store.state().values.clone();
        assert_eq!(
            values["/lxd/host1/networks"],
            r#"{"lxdbr0":{"mac":"00:16:3e:aa:bb:cc"}}"#
        );
        assert_eq!(
            values["/lxd/host1/containers"],
            r#"{"web1":{"status":"Running","default_interface":"eth0","default_ipv4":["10.0.0.5/24"],"default_ipv6":[],"node_ip":"10.0.0.5","netdevs":{"eth0":{"network":"lxdbr0","port":"veth1","mac":"00:16:3e:00:00:01","ipv4":["10.0.0.5/24"],"ipv6":[]}}}}"#
        );
    }

    #[tokio::test]
    async fn test_failed_first_write_stops() {
        let store = FakeStore::default();
        store.state().put_failures = 1;
        let mut session = store.session();

        let err = Publisher::new("host1")
            .write(&mut session, &snapshot())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Write(_)));
        assert!(store.state().values.is_empty());
        assert_eq!(store.journal().entries(), vec!["put /lxd/host1/networks"]);
    }
}
