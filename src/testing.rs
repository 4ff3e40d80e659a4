//! In-memory host and store used by the unit tests of the refresh loop.
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::config::Config;
use crate::host::{
    self, ContainerFull, Event, EventListener, EventSink, HostConnector, HostSession, Network,
    NetworkState,
};
use crate::store::{self, StoreConnector, StoreSession};

/// Ordered record of the operations performed on the fakes.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == entry).count()
    }
}

#[derive(Debug, Default)]
pub struct HostState {
    /// `(name, mac)` of the host networks.
    pub networks: Vec<(String, String)>,
    pub containers: Vec<ContainerFull>,
    pub connect_failures: usize,
    /// Connection attempts never complete.
    pub hang_connect: bool,
    pub connect_attempts: Vec<Instant>,
    /// Number of subscriptions whose event stream fails right away.
    pub failing_streams: usize,
    pub capture_times: Vec<Instant>,
    pub fail_network_state: bool,
    pub container_listings: usize,
    /// Time spent by each network listing.
    pub query_delay: Duration,
    pub subscriptions: usize,
    events: Option<mpsc::UnboundedSender<Event>>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    state: Arc<Mutex<HostState>>,
    journal: Journal,
}

impl FakeHost {
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            state: Arc::default(),
            journal,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap()
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn session(&self) -> FakeHostSession {
        FakeHostSession {
            state: Arc::clone(&self.state),
            journal: self.journal.clone(),
        }
    }

    /// Sends `event` to the current subscriber; returns whether one was listening.
    pub fn emit(&self, event: Event) -> bool {
        self.state()
            .events
            .as_ref()
            .is_some_and(|tx| tx.send(event).is_ok())
    }

    /// Ends the event stream of the current subscriber.
    pub fn close_events(&self) {
        self.state().events = None;
    }
}

impl HostConnector for FakeHost {
    type Session = FakeHostSession;

    async fn connect(&self) -> host::Result<Self::Session> {
        let hang = {
            let mut state = self.state();
            state.connect_attempts.push(Instant::now());
            if state.connect_failures > 0 {
                state.connect_failures -= 1;
                return Err(host::Error::SocketConnect {
                    path: PathBuf::from("/fake/lxd.socket"),
                    source: io::Error::from(io::ErrorKind::ConnectionRefused),
                });
            }
            state.hang_connect
        };
        if hang {
            std::future::pending::<()>().await;
        }
        Ok(self.session())
    }
}

#[derive(Debug)]
pub struct FakeHostSession {
    state: Arc<Mutex<HostState>>,
    journal: Journal,
}

impl FakeHostSession {
    fn state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap()
    }
}

impl HostSession for FakeHostSession {
    async fn subscribe(&self, sink: EventSink) -> host::Result<EventListener> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
        {
            let mut state = self.state();
            state.events = Some(tx);
            state.subscriptions += 1;
            if state.failing_streams > 0 {
                state.failing_streams -= 1;
                sink.fail(host::Error::EventStreamClosed);
            }
        }
        Ok(EventListener::spawn(async move {
            while let Some(event) = rx.recv().await {
                sink.deliver(&event);
            }
            sink.fail(host::Error::EventStreamClosed);
        }))
    }

    async fn list_networks(&self) -> host::Result<Vec<Network>> {
        self.journal.push("capture");
        let (delay, networks) = {
            let mut state = self.state();
            state.capture_times.push(Instant::now());
            (state.query_delay, state.networks.clone())
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(networks
            .into_iter()
            .map(|(name, _)| Network {
                name,
                kind: "bridge".to_owned(),
                managed: true,
            })
            .collect())
    }

    async fn network_state(&self, name: &str) -> host::Result<NetworkState> {
        let state = self.state();
        if state.fail_network_state {
            return Err(host::Error::Api {
                path: format!("/1.0/networks/{name}/state"),
                code: 500,
                message: "boom".to_owned(),
            });
        }
        let hwaddr = state
            .networks
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, mac)| mac.clone())
            .unwrap_or_default();
        Ok(NetworkState {
            hwaddr,
            state: "up".to_owned(),
        })
    }

    async fn list_containers_full(&self) -> host::Result<Vec<ContainerFull>> {
        let mut state = self.state();
        state.container_listings += 1;
        Ok(state.containers.clone())
    }
}

#[derive(Debug, Default)]
pub struct StoreState {
    pub values: BTreeMap<String, String>,
    pub put_failures: usize,
    pub connect_failures: usize,
    pub connects: usize,
    pub closes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<StoreState>>,
    journal: Journal,
}

impl FakeStore {
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            state: Arc::default(),
            journal,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap()
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn session(&self) -> FakeStoreSession {
        FakeStoreSession {
            state: Arc::clone(&self.state),
            journal: self.journal.clone(),
        }
    }
}

impl StoreConnector for FakeStore {
    type Session = FakeStoreSession;

    async fn connect(&self) -> store::Result<Self::Session> {
        {
            let mut state = self.state();
            state.connects += 1;
            if state.connect_failures > 0 {
                state.connect_failures -= 1;
                return Err(store::Error::ConnectTimeout {
                    endpoints: vec!["fake:2379".to_owned()],
                    timeout: Duration::from_secs(5),
                });
            }
        }
        Ok(self.session())
    }
}

#[derive(Debug)]
pub struct FakeStoreSession {
    state: Arc<Mutex<StoreState>>,
    journal: Journal,
}

impl StoreSession for FakeStoreSession {
    async fn put(&mut self, key: &str, value: String) -> store::Result<()> {
        self.journal.push(format!("put {key}"));
        let mut state = self.state.lock().unwrap();
        if state.put_failures > 0 {
            state.put_failures -= 1;
            return Err(store::Error::Put {
                key: key.to_owned(),
                source: etcd_client::Error::IoError(io::Error::other("connection reset")),
            });
        }
        state.values.insert(key.to_owned(), value);
        Ok(())
    }

    async fn close(self) -> store::Result<()> {
        self.state.lock().unwrap().closes += 1;
        Ok(())
    }
}

/// A lifecycle event carrying `action`.
pub fn lifecycle(action: &str) -> Event {
    Event {
        kind: "lifecycle".to_owned(),
        timestamp: "2024-05-01T10:00:00Z".to_owned(),
        metadata: json!({"action": action, "source": "/1.0/instances/web1"}),
        location: "none".to_owned(),
        project: "default".to_owned(),
    }
}

/// A running container `web1` with `eth0` attached to `lxdbr0`.
pub fn web1() -> ContainerFull {
    serde_json::from_value(json!({
        "name": "web1",
        "status": "Running",
        "expanded_devices": {
            "eth0": {"type": "nic", "nictype": "bridged", "network": "lxdbr0"},
            "root": {"type": "disk", "path": "/", "pool": "default"}
        },
        "state": {
            "status": "Running",
            "network": {
                "eth0": {
                    "addresses": [
                        {"family": "inet", "address": "10.0.0.5", "netmask": "24", "scope": "global"},
                        {"family": "inet6", "address": "fd42::5", "netmask": "64", "scope": "global"}
                    ],
                    "hwaddr": "00:16:3e:00:00:01",
                    "host_name": "veth1",
                    "state": "up"
                }
            }
        }
    }))
    .unwrap()
}

/// Puts `lxdbr0` and [`web1`] on `host`.
pub fn populate_web1(host: &FakeHost) {
    let mut state = host.state();
    state.networks = vec![("lxdbr0".to_owned(), "00:16:3e:aa:bb:cc".to_owned())];
    state.containers = vec![web1()];
}

pub fn test_config() -> Config {
    Config::from_toml_str(
        r#"
        hostname = "host1"

        [lxd]
        refresh_interval = 60
        wait_for_dhcp = 5

        [etcd]
        endpoints = ["http://127.0.0.1:2379"]

        [containers.web1]
        node_ip = "10.0.0.5"
        default_interface = "eth0"
        "#,
    )
    .unwrap()
}
