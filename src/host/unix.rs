use std::path::Path;

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::Request;
use hyper::header::HOST;
use hyper_util::rt::TokioIo;
use tokio::net::UnixStream;
use tokio_tungstenite::WebSocketStream;

use super::{Error, Result};

/// Authority sent to LXD; the daemon ignores it but HTTP/1.1 requires one.
const AUTHORITY: &str = "lxd";

async fn connect(path: &Path) -> Result<UnixStream> {
    log::trace!("Connecting to {}...", path.display());
    UnixStream::connect(path)
        .await
        .map_err(|source| Error::SocketConnect {
            path: path.to_path_buf(),
            source,
        })
}

/// Performs a `GET` request for `uri_path` on the unix socket at `socket` and returns the body.
///
/// Every request uses its own connection, the daemon is local and refreshes are rare.
pub(super) async fn get(socket: &Path, uri_path: &str) -> Result<Bytes> {
    let stream = connect(socket).await?;
    let (mut sender, connection) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
        .await
        .map_err(Error::Handshake)?;
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            log::debug!("lxd connection closed with error: {err}");
        }
    });

    let request = Request::get(uri_path)
        .header(HOST, AUTHORITY)
        .body(Empty::<Bytes>::new())
        .map_err(|source| Error::BuildRequest {
            path: uri_path.to_owned(),
            source,
        })?;
    let response = sender
        .send_request(request)
        .await
        .map_err(|source| Error::Request {
            path: uri_path.to_owned(),
            source,
        })?;
    log::trace!("GET {uri_path} -> {}", response.status());

    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|source| Error::Request {
            path: uri_path.to_owned(),
            source,
        })?
        .to_bytes();
    Ok(body)
}

/// Opens a websocket for `uri_path` on the unix socket at `socket`.
pub(super) async fn websocket(
    socket: &Path,
    uri_path: &str,
) -> Result<WebSocketStream<UnixStream>> {
    let stream = connect(socket).await?;
    let url = format!("ws://{AUTHORITY}{uri_path}");
    let (ws, response) = tokio_tungstenite::client_async(url, stream)
        .await
        .map_err(|err| Error::EventConnect(Box::new(err)))?;
    log::debug!(
        "Opened websocket {uri_path} on {} ({})",
        socket.display(),
        response.status()
    );
    Ok(ws)
}
