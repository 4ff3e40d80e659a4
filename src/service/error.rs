use crate::{host, snapshot, store};

/// Errors ending a connection generation of the refresh loop.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("fail to connect to lxd: {0}")]
    HostConnect(#[source] host::Error),
    #[error("fail to listen to lxd events: {0}")]
    Subscribe(#[source] host::Error),
    #[error("fail to connect to etcd: {0}")]
    StoreConnect(#[source] store::Error),
    #[error("fail to refresh host state: {0}")]
    Refresh(#[source] snapshot::Error),
    #[error("lxd event listener failed: {0}")]
    Events(#[source] host::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
