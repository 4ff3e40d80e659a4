//! The downstream key-value store receiving the mirrored state.
mod error;
mod etcd;

use std::future::Future;

pub use error::{Error, Result};
pub use etcd::{EtcdConnector, EtcdSession};

/// Opens new sessions with the store.
pub trait StoreConnector: Send + Sync {
    type Session: StoreSession;

    fn connect(&self) -> impl Future<Output = Result<Self::Session>> + Send;
}

/// An open session with the store.
pub trait StoreSession: Send {
    fn put(&mut self, key: &str, value: String) -> impl Future<Output = Result<()>> + Send;

    /// Closes the session.
    fn close(self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sized;
}
