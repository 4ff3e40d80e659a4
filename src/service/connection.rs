use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::control::ServiceControl;
use super::shutdown::ShutdownSignal;
use super::{Error, Result};
use crate::error::ResultOkLogExt;
use crate::host::{self, EventListener, EventSink, HostConnector, HostSession, RefreshSignal};
use crate::store::{StoreConnector, StoreSession};

const BACKOFF_STEP: Duration = Duration::from_secs(10);
const BACKOFF_CEILING: Duration = Duration::from_secs(60);
const SIGNAL_BUFFER: usize = 64;

/// Linear backoff between connection attempts: 0s, 10s, 20s, ... capped at 60s.
#[derive(Debug, Default)]
pub(super) struct Backoff {
    next: Duration,
}

impl Backoff {
    pub(super) fn next_wait(&mut self) -> Duration {
        let wait = self.next;
        self.next = (self.next + BACKOFF_STEP).min(BACKOFF_CEILING);
        wait
    }
}

/// Everything a connection generation holds open.
pub(super) struct Connections<H: HostConnector, S: StoreConnector> {
    pub(super) host: H::Session,
    pub(super) listener: EventListener,
    pub(super) store: S::Session,
    /// Refresh signals of the event listener.
    pub(super) signals: mpsc::Receiver<RefreshSignal>,
    /// Errors invalidating the event listener.
    pub(super) errors: mpsc::Receiver<host::Error>,
}

/// Establishes and tears down the connections to the host and the store.
pub(super) struct ConnectionManager<H, S> {
    host: H,
    store: S,
    control: Arc<ServiceControl>,
}

impl<H: HostConnector, S: StoreConnector> ConnectionManager<H, S> {
    pub(super) fn new(host: H, store: S, control: Arc<ServiceControl>) -> Self {
        Self {
            host,
            store,
            control,
        }
    }

    pub(super) fn is_initialized(&self) -> bool {
        self.control.is_initialized()
    }

    /// Connects to the host, subscribes to its events and connects to the store.
    ///
    /// Retries until it succeeds, waiting longer after every failed attempt. Returns `None`
    /// when shutdown is requested in the meantime, also in the middle of an attempt.
    pub(super) async fn acquire(
        &self,
        shutdown: &mut ShutdownSignal,
    ) -> Option<Connections<H, S>> {
        self.control.set_initialized(false);
        let mut backoff = Backoff::default();
        log::trace!("starting to initialize service with retries");
        loop {
            if shutdown.is_triggered() {
                log::trace!("initialization canceled");
                return None;
            }
            let attempt = tokio::select! {
                biased;
                () = shutdown.wait() => {
                    log::trace!("initialization canceled");
                    return None;
                }
                attempt = self.try_connect() => attempt,
            };
            match attempt {
                Ok(connections) => {
                    self.control.set_initialized(true);
                    log::info!("connected to lxd and etcd");
                    return Some(connections);
                }
                Err(err) => log::error!("{err}"),
            }

            let wait = backoff.next_wait();
            log::debug!("next initialization attempt in {}s", wait.as_secs());
            tokio::select! {
                biased;
                () = shutdown.wait() => {
                    log::trace!("initialization canceled");
                    return None;
                }
                () = tokio::time::sleep(wait) => log::trace!("trying again to initialize service"),
            }
        }
    }

    /// One connection attempt. Its event channels die with it when it fails.
    async fn try_connect(&self) -> Result<Connections<H, S>> {
        let (signal_tx, signals) = mpsc::channel(SIGNAL_BUFFER);
        let (error_tx, errors) = mpsc::channel(1);
        let host = self.host.connect().await.map_err(Error::HostConnect)?;
        let listener = host
            .subscribe(EventSink::new(signal_tx, error_tx))
            .await
            .map_err(Error::Subscribe)?;
        // dropping the listener on failure disconnects it
        let store = self.store.connect().await.map_err(Error::StoreConnect)?;
        Ok(Connections {
            host,
            listener,
            store,
            signals,
            errors,
        })
    }

    /// Closes everything held by `connections`. Failures are logged, never returned.
    pub(super) async fn release(&self, connections: Connections<H, S>) {
        self.control.set_initialized(false);
        let Connections {
            host,
            listener,
            store,
            ..
        } = connections;
        if listener.is_active() {
            log::trace!("disconnecting lxd event listener");
            listener.disconnect();
        }
        drop(host);
        store.close().await.ok_log("fail to close etcd client");
    }
}
