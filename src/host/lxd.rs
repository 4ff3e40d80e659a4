use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use tokio::net::UnixStream;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use super::events::EventSink;
use super::models::{ContainerFull, Event, Network, NetworkState, Response};
use super::{Error, EventListener, HostConnector, HostSession, Result, unix};

const SERVER_PATH: &str = "/1.0";
const EVENTS_PATH: &str = "/1.0/events?type=lifecycle";
const NETWORKS_PATH: &str = "/1.0/networks?recursion=1";
const CONTAINERS_PATH: &str = "/1.0/containers?recursion=2";

/// Opens sessions with the LXD daemon listening on a unix socket.
#[derive(Debug, Clone)]
pub struct LxdConnector {
    socket_path: Arc<Path>,
}

impl LxdConnector {
    pub fn new(socket_path: PathBuf) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }
}

impl HostConnector for LxdConnector {
    type Session = LxdSession;

    /// Checks that the daemon answers before handing out a session.
    async fn connect(&self) -> Result<LxdSession> {
        let session = LxdSession {
            socket_path: Arc::clone(&self.socket_path),
        };
        let _: serde_json::Value = session.get(SERVER_PATH).await?;
        log::debug!("lxd client initialized");
        Ok(session)
    }
}

#[derive(Debug, Clone)]
pub struct LxdSession {
    socket_path: Arc<Path>,
}

impl LxdSession {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = unix::get(&self.socket_path, path).await?;
        let response: Response =
            serde_json::from_slice(&body).map_err(|source| Error::Decode {
                path: path.to_owned(),
                source,
            })?;
        if response.is_error() {
            return Err(Error::Api {
                path: path.to_owned(),
                code: response.error_code,
                message: response.error,
            });
        }
        serde_json::from_value(response.metadata).map_err(|source| Error::Decode {
            path: path.to_owned(),
            source,
        })
    }
}

impl HostSession for LxdSession {
    async fn subscribe(&self, sink: EventSink) -> Result<EventListener> {
        let stream = unix::websocket(&self.socket_path, EVENTS_PATH).await?;
        Ok(EventListener::spawn(read_events(stream, sink)))
    }

    async fn list_networks(&self) -> Result<Vec<Network>> {
        self.get(NETWORKS_PATH).await
    }

    async fn network_state(&self, name: &str) -> Result<NetworkState> {
        self.get(&format!("/1.0/networks/{name}/state")).await
    }

    async fn list_containers_full(&self) -> Result<Vec<ContainerFull>> {
        self.get(CONTAINERS_PATH).await
    }
}

/// Forwards every event of `stream` to `sink` until the stream fails or ends.
///
/// The end of the stream is itself reported as an error, the session is useless without it.
async fn read_events(mut stream: WebSocketStream<UnixStream>, sink: EventSink) {
    while let Some(message) = stream.next().await {
        let decoded = match message {
            Ok(Message::Text(text)) => serde_json::from_str::<Event>(&text)
                .map_err(|source| (text.as_str().to_owned(), source)),
            Ok(Message::Binary(data)) => serde_json::from_slice::<Event>(&data)
                .map_err(|source| (String::from_utf8_lossy(&data).into_owned(), source)),
            Ok(Message::Close(frame)) => {
                log::debug!("lxd closed the event stream: {frame:?}");
                break;
            }
            Ok(_) => continue,
            Err(err) => {
                sink.fail(Error::EventStream(Box::new(err)));
                return;
            }
        };
        match decoded {
            Ok(event) => sink.deliver(&event),
            Err((metadata, source)) => sink.fail(Error::EventDecode { metadata, source }),
        }
    }
    sink.fail(Error::EventStreamClosed);
}
