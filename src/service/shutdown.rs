use std::sync::Arc;

use tokio::sync::watch;

/// Requests the shutdown of the service. Cloning yields handles to the same request.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Creates a shutdown handle together with the signal observing it.
    pub fn new() -> (Self, ShutdownSignal) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, ShutdownSignal { rx })
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

/// Observes a [`Shutdown`] request.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completes once shutdown was requested.
    ///
    /// Never completes if every [`Shutdown`] handle is gone without triggering.
    pub async fn wait(&mut self) {
        let triggered = self.rx.wait_for(|triggered| *triggered).await.is_ok();
        if !triggered {
            std::future::pending::<()>().await;
        }
    }
}
