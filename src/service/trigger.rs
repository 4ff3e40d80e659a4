use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

/// Holds at most one pending refresh request.
#[derive(Debug)]
pub(super) struct TriggerSlot {
    tx: mpsc::Sender<()>,
    rx: mpsc::Receiver<()>,
}

impl TriggerSlot {
    pub(super) fn new() -> Self {
        let (tx, rx) = mpsc::channel(1);
        Self { tx, rx }
    }

    /// Requests a refresh; returns `false` if one is already pending.
    pub(super) fn offer(&self) -> bool {
        self.tx.try_send(()).is_ok()
    }

    /// Waits for the pending request and consumes it.
    pub(super) async fn next(&mut self) {
        // the slot owns a sender, the channel cannot close
        self.rx.recv().await;
    }
}

/// Delayed refresh requests armed after event bursts.
#[derive(Debug)]
pub(super) struct SettleTimers {
    delay: Duration,
    deadlines: VecDeque<Instant>,
}

impl SettleTimers {
    pub(super) fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadlines: VecDeque::new(),
        }
    }

    pub(super) fn arm(&mut self) {
        self.deadlines.push_back(Instant::now() + self.delay);
    }

    pub(super) fn armed(&self) -> usize {
        self.deadlines.len()
    }

    /// Completes when the earliest armed timer expires. Pending while none is armed.
    ///
    /// Cancel safe: a timer is only consumed once it fired.
    pub(super) async fn fired(&mut self) {
        match self.deadlines.front() {
            Some(&deadline) => {
                sleep_until(deadline).await;
                self.deadlines.pop_front();
            }
            None => std::future::pending().await,
        }
    }
}
