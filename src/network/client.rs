use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use url::Url;

use crate::chat::codec;
use crate::common::{CloseReason, StreamCommand, TransportEvent};
use crate::error::{ClientError, ClientResult};

use super::transport::{WsStream, connect};

/// Status code reported when the server closes without a close payload.
const NO_STATUS_RECEIVED: u16 = 1005;

/// Owns one room stream. Frames go up as [`TransportEvent`]s, outgoing
/// envelopes come down as [`StreamCommand`]s. Exactly one `Closed` event is
/// emitted, whatever ends the stream.
pub struct StreamClient {
    url: Url,
    event_sender: mpsc::Sender<TransportEvent>,
    command_receiver: mpsc::Receiver<StreamCommand>,
}

impl StreamClient {
    pub fn new(
        url: Url,
        event_sender: mpsc::Sender<TransportEvent>,
        command_receiver: mpsc::Receiver<StreamCommand>,
    ) -> Self {
        Self {
            url,
            event_sender,
            command_receiver,
        }
    }

    pub async fn run(mut self) -> ClientResult<()> {
        // the query carries the token, so only the path is logged
        let path = self.url.path().to_string();

        let stream = match connect(&self.url).await {
            Ok(stream) => stream,
            Err(err) => {
                log::warn!("Failed to open stream {path}: {err}");
                self.emit(TransportEvent::Closed(CloseReason::Error(err.to_string())))
                    .await;
                return Err(err);
            }
        };

        log::info!("Stream {path} opened");
        self.emit(TransportEvent::Opened).await;

        let reason = self.pump(stream).await;
        log::info!("Stream {path} closed: {reason}");
        self.emit(TransportEvent::Closed(reason.clone())).await;
        match reason {
            CloseReason::Error(_) => Err(ClientError::StreamClosed(reason)),
            _ => Ok(()),
        }
    }

    async fn pump(&mut self, stream: WsStream) -> CloseReason {
        let (mut ws_tx, mut ws_rx) = stream.split();

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(command) => {
                            if let Err(err) = self.handle_command(command, &mut ws_tx).await {
                                return CloseReason::Error(err.to_string());
                            }
                        }
                        None => {
                            if let Err(err) = ws_tx.send(WsMessage::Close(None)).await {
                                log::debug!("Close frame not delivered: {err}");
                            }
                            return CloseReason::Local;
                        }
                    }
                }
                message = ws_rx.next() => {
                    match message {
                        Some(Ok(WsMessage::Text(text))) => {
                            self.emit(TransportEvent::Frame(text)).await;
                        }
                        Some(Ok(WsMessage::Binary(bytes))) => match String::from_utf8(bytes) {
                            Ok(text) => self.emit(TransportEvent::Frame(text)).await,
                            Err(err) => log::warn!("Dropping non UTF-8 binary frame: {err}"),
                        },
                        Some(Ok(WsMessage::Close(frame))) => {
                            // the close reply is queued by the read; write it out
                            if let Err(err) = ws_tx.flush().await {
                                log::debug!("Close reply not delivered: {err}");
                            }
                            return match frame {
                                Some(frame) => CloseReason::Remote {
                                    code: frame.code.into(),
                                    reason: frame.reason.into_owned(),
                                },
                                None => CloseReason::Remote {
                                    code: NO_STATUS_RECEIVED,
                                    reason: String::new(),
                                },
                            };
                        }
                        Some(Ok(_)) => {}
                        Some(Err(err)) => {
                            log::warn!("Stream read error: {err}");
                            return CloseReason::Error(err.to_string());
                        }
                        None => return CloseReason::Eof,
                    }
                }
            }
        }
    }

    async fn handle_command(
        &mut self,
        command: StreamCommand,
        ws_tx: &mut SplitSink<WsStream, WsMessage>,
    ) -> ClientResult<()> {
        match command {
            StreamCommand::Send(message) => {
                let payload = codec::encode(&message)?;
                ws_tx
                    .send(WsMessage::Text(payload))
                    .await
                    .map_err(ClientError::from)
            }
        }
    }

    async fn emit(&self, event: TransportEvent) {
        if let Err(err) = self.event_sender.send(event).await {
            log::debug!("Chat view gone, dropping transport event: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::OutgoingMessage;
    use crate::network::transport::stream_url;
    use std::borrow::Cow;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
    use tokio_tungstenite::tungstenite::protocol::CloseFrame;
    use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

    async fn collect_events(mut rx: mpsc::Receiver<TransportEvent>) -> Vec<TransportEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn forwards_frames_then_reports_server_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
            ws.send(WsMessage::Text("first\nsecond".to_string())).await.unwrap();
            ws.send(WsMessage::Binary(b"third".to_vec())).await.unwrap();
            ws.send(WsMessage::Close(Some(CloseFrame {
                code: CloseCode::Normal,
                reason: Cow::Borrowed("bye"),
            })))
            .await
            .unwrap();
            // drain until the client acknowledges the close
            while let Some(Ok(_)) = ws.next().await {}
        });

        let url = stream_url(&format!("http://{addr}"), "lobby", "secret").unwrap();
        let (event_tx, event_rx) = mpsc::channel(16);
        let (_command_tx, command_rx) = mpsc::channel(16);
        StreamClient::new(url, event_tx, command_rx).run().await.unwrap();

        assert_eq!(collect_events(event_rx).await, vec![
            TransportEvent::Opened,
            TransportEvent::Frame("first\nsecond".to_string()),
            TransportEvent::Frame("third".to_string()),
            TransportEvent::Closed(CloseReason::Remote {
                code: 1000,
                reason: "bye".to_string(),
            }),
        ]);
    }

    #[tokio::test]
    async fn server_close_is_acknowledged() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (reply_tx, reply_rx) = oneshot::channel::<bool>();
        tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
            ws.send(WsMessage::Close(Some(CloseFrame {
                code: CloseCode::Away,
                reason: Cow::Borrowed("restarting"),
            })))
            .await
            .unwrap();
            let acknowledged = matches!(ws.next().await, Some(Ok(WsMessage::Close(_))));
            reply_tx.send(acknowledged).ok();
        });

        let url = stream_url(&format!("http://{addr}"), "lobby", "secret").unwrap();
        let (event_tx, event_rx) = mpsc::channel(16);
        let (_command_tx, command_rx) = mpsc::channel(16);
        StreamClient::new(url, event_tx, command_rx).run().await.unwrap();

        assert!(reply_rx.await.unwrap());
        assert_eq!(
            collect_events(event_rx).await.last(),
            Some(&TransportEvent::Closed(CloseReason::Remote {
                code: 1001,
                reason: "restarting".to_string(),
            }))
        );
    }

    #[tokio::test]
    async fn sends_envelopes_and_closes_when_view_goes_away() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (uri_tx, uri_rx) = oneshot::channel::<String>();
        let (text_tx, text_rx) = oneshot::channel::<String>();
        tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let callback = |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
                uri_tx.send(request.uri().to_string()).ok();
                Ok(response)
            };
            let mut ws = tokio_tungstenite::accept_hdr_async(tcp, callback).await.unwrap();
            let mut text_tx = Some(text_tx);
            while let Some(Ok(message)) = ws.next().await {
                if let WsMessage::Text(text) = message {
                    if let Some(tx) = text_tx.take() {
                        tx.send(text).ok();
                    }
                }
            }
        });

        let url = stream_url(&format!("http://{addr}"), "lobby", "secret").unwrap();
        let (event_tx, mut event_rx) = mpsc::channel(16);
        let (command_tx, command_rx) = mpsc::channel(16);
        let client = tokio::spawn(StreamClient::new(url, event_tx, command_rx).run());

        assert_eq!(event_rx.recv().await, Some(TransportEvent::Opened));
        assert_eq!(uri_rx.await.unwrap(), "/ws/lobby?token=secret");

        command_tx
            .send(StreamCommand::Send(OutgoingMessage::Send {
                text: "hello".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(
            text_rx.await.unwrap(),
            r#"{"type":"message.send","text":"hello"}"#
        );

        drop(command_tx);
        client.await.unwrap().unwrap();
        assert_eq!(
            collect_events(event_rx).await,
            vec![TransportEvent::Closed(CloseReason::Local)]
        );
    }

    #[tokio::test]
    async fn connect_failure_is_reported_as_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = stream_url(&format!("http://{addr}"), "lobby", "secret").unwrap();
        let (event_tx, event_rx) = mpsc::channel(16);
        let (_command_tx, command_rx) = mpsc::channel(16);
        let result = StreamClient::new(url, event_tx, command_rx).run().await;

        assert!(matches!(result, Err(ClientError::WebSocket(_))));
        let events = collect_events(event_rx).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            TransportEvent::Closed(CloseReason::Error(_))
        ));
    }
}
