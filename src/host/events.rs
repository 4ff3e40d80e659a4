//! Classification of LXD events and their hand-off to the refresh loop.
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::models::{Event, EventLifecycle};
use super::{Error, Result};

/// Lifecycle action prefixes that may change the mirrored state.
const REFRESH_ACTION_PREFIXES: [&str; 2] = ["instance-", "network-"];

/// Marker sent to the refresh loop when host state may have changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Refresh,
    Ignore,
}

/// Decides whether `event` implies a change of the mirrored host state.
///
/// # Errors
///
/// Returns [`Error::EventDecode`] if the event metadata is not a lifecycle description.
pub fn classify(event: &Event) -> Result<Classification> {
    let lifecycle: EventLifecycle =
        serde_json::from_value(event.metadata.clone()).map_err(|source| Error::EventDecode {
            metadata: event.metadata.to_string(),
            source,
        })?;
    if REFRESH_ACTION_PREFIXES
        .iter()
        .any(|prefix| lifecycle.action.starts_with(prefix))
    {
        log::trace!("triggering refresh for action <{}>", lifecycle.action);
        Ok(Classification::Refresh)
    } else {
        Ok(Classification::Ignore)
    }
}

/// Human readable one-line rendering of an event.
pub fn describe(event: &Event) -> String {
    format!(
        "Project:{}, Location:{}, Type:{}, Timestamp:{}, Metadata:{}",
        event.project, event.location, event.kind, event.timestamp, event.metadata
    )
}

/// Consumer of the events of one host session.
///
/// Never blocks the delivering task: a signal that does not fit in the channel is dropped, since
/// a pending signal already guarantees a refresh. The same holds for fatal errors, only the
/// first one of a generation matters.
#[derive(Debug, Clone)]
pub struct EventSink {
    signal_tx: mpsc::Sender<RefreshSignal>,
    error_tx: mpsc::Sender<Error>,
}

impl EventSink {
    pub fn new(signal_tx: mpsc::Sender<RefreshSignal>, error_tx: mpsc::Sender<Error>) -> Self {
        Self {
            signal_tx,
            error_tx,
        }
    }

    /// Classifies `event` and forwards the outcome to the refresh loop.
    pub fn deliver(&self, event: &Event) {
        log::trace!("event: {}", describe(event));
        match classify(event) {
            Ok(Classification::Refresh) => match self.signal_tx.try_send(RefreshSignal) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    log::trace!("refresh signal dropped, signal channel is full");
                }
                Err(TrySendError::Closed(_)) => {
                    log::trace!("refresh signal dropped, refresh loop is gone");
                }
            },
            Ok(Classification::Ignore) => {}
            Err(err) => self.fail(err),
        }
    }

    /// Reports an error that invalidates the current connection.
    pub fn fail(&self, err: Error) {
        if let Err(err) = self.error_tx.try_send(err) {
            log::debug!("dropping event error: {}", err.into_inner());
        }
    }
}
