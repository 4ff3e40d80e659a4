//! Access to the observed LXD host: state queries and the lifecycle event stream.
//!
//! The refresh loop only depends on the [`HostConnector`] and [`HostSession`] traits; the
//! [`LxdConnector`] implementation talks to the daemon's REST API over its unix socket.
mod error;
pub mod events;
mod lxd;
pub mod models;
mod unix;

use std::future::Future;

pub use error::{Error, Result};
pub use events::{Classification, EventSink, RefreshSignal, classify};
pub use lxd::{LxdConnector, LxdSession};
pub use models::{ContainerFull, Event, Network, NetworkState};

/// Opens new sessions with the host.
pub trait HostConnector: Send + Sync {
    type Session: HostSession;

    fn connect(&self) -> impl Future<Output = Result<Self::Session>> + Send;
}

/// An open session with the host.
pub trait HostSession: Send + Sync {
    /// Starts delivering the host's lifecycle events to `sink`.
    fn subscribe(&self, sink: EventSink) -> impl Future<Output = Result<EventListener>> + Send;

    fn list_networks(&self) -> impl Future<Output = Result<Vec<Network>>> + Send;

    fn network_state(&self, name: &str) -> impl Future<Output = Result<NetworkState>> + Send;

    fn list_containers_full(&self) -> impl Future<Output = Result<Vec<ContainerFull>>> + Send;
}

/// Handle of the task delivering the events of one session.
///
/// Dropping the handle disconnects the listener.
#[derive(Debug)]
pub struct EventListener {
    task: tokio::task::JoinHandle<()>,
}

impl EventListener {
    pub fn spawn<F>(delivery: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            task: tokio::spawn(delivery),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn disconnect(self) {
        self.task.abort();
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        self.task.abort();
    }
}
