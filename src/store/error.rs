use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to connect to etcd endpoints {endpoints:?}: {source}")]
    Connect {
        endpoints: Vec<String>,
        #[source]
        source: etcd_client::Error,
    },
    #[error("no answer from etcd endpoints {endpoints:?} within {timeout:?}")]
    ConnectTimeout {
        endpoints: Vec<String>,
        timeout: Duration,
    },
    #[error("failed to put key `{key}` in etcd: {source}")]
    Put {
        key: String,
        #[source]
        source: etcd_client::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
