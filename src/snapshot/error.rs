use crate::{host, store};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("fail to retrieve networks: {0}")]
    ListNetworks(#[source] host::Error),
    #[error("fail to retrieve state of network <{name}>: {source}")]
    NetworkState {
        name: String,
        #[source]
        source: host::Error,
    },
    #[error("fail to retrieve containers: {0}")]
    ListContainers(#[source] host::Error),
    #[error("fail to serialize value of key `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Write(#[from] store::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
