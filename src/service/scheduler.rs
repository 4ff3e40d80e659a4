use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until};

use super::connection::{ConnectionManager, Connections};
use super::control::ServiceControl;
use super::shutdown::ShutdownSignal;
use super::trigger::{SettleTimers, TriggerSlot};
use super::{Error, Result};
use crate::config::Config;
use crate::host::{HostConnector, RefreshSignal};
use crate::snapshot::{Producer, Publisher};
use crate::store::StoreConnector;

/// Longest time a burst of refresh signals is collected before it is acted upon.
const DEBOUNCE_WINDOW: Duration = Duration::from_secs(1);
const STATE_BUFFER: usize = 16;

/// Lifecycle of the refresh loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    AwaitingConnection,
    Running,
    Draining,
    Stopped,
}

enum Exit {
    Shutdown,
    Fatal(Error),
}

/// Keeps the store in sync with the host.
///
/// Refreshes run one at a time on the task driving [`Scheduler::run`]: on startup of every
/// connection generation, periodically, and after bursts of host events.
pub struct Scheduler<H: HostConnector, S: StoreConnector> {
    connections: ConnectionManager<H, S>,
    producer: Producer,
    publisher: Publisher,
    refresh_interval: Duration,
    settle_delay: Duration,
    states: broadcast::Sender<State>,
}

impl<H: HostConnector, S: StoreConnector> Scheduler<H, S> {
    pub fn new(host: H, store: S, config: &Config, control: Arc<ServiceControl>) -> Self {
        let (states, _) = broadcast::channel(STATE_BUFFER);
        Self {
            connections: ConnectionManager::new(host, store, control),
            producer: Producer::new(Arc::new(config.containers.clone())),
            publisher: Publisher::new(config.hostname.clone()),
            refresh_interval: config.lxd.refresh_interval,
            settle_delay: config.lxd.wait_for_dhcp,
            states,
        }
    }

    /// Subscribes to the state transitions of the loop.
    pub fn states(&self) -> broadcast::Receiver<State> {
        self.states.subscribe()
    }

    /// Runs until `shutdown` is triggered.
    ///
    /// Fatal errors of a generation are logged and followed by a full reconnect.
    ///
    /// # Errors
    ///
    /// Returns the last fatal error if shutdown happened before the service could reconnect.
    pub async fn run(self, mut shutdown: ShutdownSignal) -> Result<()> {
        let mut outstanding = None;
        loop {
            self.enter(State::AwaitingConnection);
            let Some(mut connections) = self.connections.acquire(&mut shutdown).await else {
                break;
            };
            outstanding = None;

            self.enter(State::Running);
            let exit = self.run_generation(&mut connections, &mut shutdown).await;
            self.connections.release(connections).await;
            match exit {
                Exit::Shutdown => {
                    log::info!("stopping service...");
                    break;
                }
                Exit::Fatal(err) => {
                    self.enter(State::Draining);
                    log::error!("{err}");
                    outstanding = Some(err);
                }
            }
        }
        self.enter(State::Stopped);
        log::info!("service has been stopped...");
        outstanding.map_or(Ok(()), Err)
    }

    async fn run_generation(
        &self,
        connections: &mut Connections<H, S>,
        shutdown: &mut ShutdownSignal,
    ) -> Exit {
        let mut triggers = TriggerSlot::new();
        let mut settle = SettleTimers::new(self.settle_delay);
        let mut ticker = interval_at(
            Instant::now() + self.refresh_interval,
            self.refresh_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        triggers.offer();
        loop {
            tokio::select! {
                () = shutdown.wait() => return Exit::Shutdown,
                _ = ticker.tick() => {
                    if !triggers.offer() {
                        log::trace!("periodic refresh dropped, a refresh is already pending");
                    }
                }
                Some(RefreshSignal) = connections.signals.recv() => {
                    debounce(&mut connections.signals, shutdown).await;
                    if shutdown.is_triggered() {
                        return Exit::Shutdown;
                    }
                    triggers.offer();
                    settle.arm();
                    log::trace!("{} settle timer(s) armed", settle.armed());
                }
                () = settle.fired() => {
                    triggers.offer();
                }
                Some(err) = connections.errors.recv() => return Exit::Fatal(Error::Events(err)),
                () = triggers.next() => {
                    if let Err(err) = self.refresh(connections).await {
                        return Exit::Fatal(err);
                    }
                }
            }
        }
    }

    async fn refresh(&self, connections: &mut Connections<H, S>) -> Result<()> {
        if !self.connections.is_initialized() {
            log::warn!("refresh skipped, service is not initialized");
            return Ok(());
        }
        log::info!("refresh triggered");
        let snapshot = self
            .producer
            .capture(&connections.host)
            .await
            .map_err(Error::Refresh)?;
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("retrieved lxd info:\n{}", snapshot.pretty());
        }
        self.publisher
            .write(&mut connections.store, &snapshot)
            .await
            .map_err(Error::Refresh)
    }

    fn enter(&self, state: State) {
        log::debug!("refresh loop state: {state:?}");
        // no subscriber is fine
        let _ = self.states.send(state);
    }
}

/// Collects the signals following the first one of a burst.
///
/// Waits at most [`DEBOUNCE_WINDOW`] after the first signal, the window is not extended by
/// later ones. Signals still queued afterwards are discarded as well.
async fn debounce(signals: &mut mpsc::Receiver<RefreshSignal>, shutdown: &mut ShutdownSignal) {
    let deadline = Instant::now() + DEBOUNCE_WINDOW;
    let mut coalesced = 1_usize;
    loop {
        tokio::select! {
            () = shutdown.wait() => return,
            () = sleep_until(deadline) => break,
            signal = signals.recv() => match signal {
                Some(RefreshSignal) => coalesced += 1,
                None => break,
            },
        }
    }
    while signals.try_recv().is_ok() {
        coalesced += 1;
    }
    log::debug!("coalesced {coalesced} refresh signal(s)");
}
