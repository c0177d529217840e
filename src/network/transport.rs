use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

use crate::error::{ClientError, ClientResult};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// `<ws-base>/ws/<room>?token=<token>`.
///
/// The token travels as a query credential; the browser-style handshake
/// this backend expects cannot carry custom headers.
pub fn stream_url(server_url: &str, room: &str, token: &str) -> ClientResult<Url> {
    let mut url = Url::parse(server_url)?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(ClientError::StreamUnavailable(format!(
                "scheme `{other}` cannot carry a WebSocket"
            )));
        }
    };
    url.set_scheme(scheme).map_err(|_| {
        ClientError::StreamUnavailable(format!("cannot switch {server_url} to {scheme}"))
    })?;

    url.path_segments_mut()
        .map_err(|_| ClientError::StreamUnavailable(format!("{server_url} cannot be a base")))?
        .pop_if_empty()
        .push("ws")
        .push(room);
    url.query_pairs_mut().clear().append_pair("token", token);
    Ok(url)
}

pub async fn connect(url: &Url) -> ClientResult<WsStream> {
    let (stream, response) = connect_async(url.as_str()).await?;
    log::debug!("Stream handshake answered with {}", response.status());
    Ok(stream)
}
