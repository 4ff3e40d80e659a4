use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to connect to socket `{path}`: {source}")]
    SocketConnect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build request for `{path}`: {source}")]
    BuildRequest {
        path: String,
        #[source]
        source: hyper::http::Error,
    },
    #[error("failed http handshake with lxd: {0}")]
    Handshake(#[source] hyper::Error),
    #[error("request to `{path}` failed: {source}")]
    Request {
        path: String,
        #[source]
        source: hyper::Error,
    },
    #[error("lxd returned an error for `{path}` (code {code}): {message}")]
    Api {
        path: String,
        code: u16,
        message: String,
    },
    #[error("failed to decode lxd response for `{path}`: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to open lxd event stream: {0}")]
    EventConnect(#[source] Box<tokio_tungstenite::tungstenite::Error>),
    #[error("lxd event stream failed: {0}")]
    EventStream(#[source] Box<tokio_tungstenite::tungstenite::Error>),
    #[error("lxd event stream closed")]
    EventStreamClosed,
    #[error("failed to decode event <{metadata}>: {source}")]
    EventDecode {
        metadata: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
