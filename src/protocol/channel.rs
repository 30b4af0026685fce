use crate::error::{ViewError, ViewResult};

/// Outbound half of the optimizer connection.
///
/// Sends are fire-and-forget: no reply is awaited and none is correlated.
pub trait Channel {
    fn send(&mut self, message: String) -> ViewResult<()>;
}

/// Headless channel that keeps every sent message.
#[derive(Debug, Clone, Default)]
pub struct RecordingChannel {
    sent: Vec<String>,
}

impl RecordingChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sent.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }

    /// The most recent message parsed as JSON.
    pub fn last_json(&self) -> ViewResult<Option<serde_json::Value>> {
        self.sent
            .last()
            .map(|message| {
                serde_json::from_str(message).map_err(|e| {
                    ViewError::Protocol(format!("recorded message is not json: {e}"))
                })
            })
            .transpose()
    }

    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.sent)
    }
}

impl Channel for RecordingChannel {
    fn send(&mut self, message: String) -> ViewResult<()> {
        self.sent.push(message);
        Ok(())
    }
}

#[cfg(feature = "ws-channel")]
mod websocket {
    use std::net::TcpStream;

    use tracing::debug;
    use tungstenite::stream::MaybeTlsStream;
    use tungstenite::{Message, WebSocket, connect};

    use super::Channel;
    use crate::error::{ViewError, ViewResult};

    /// Blocking WebSocket connection to the optimizer service.
    pub struct WebSocketChannel {
        socket: WebSocket<MaybeTlsStream<TcpStream>>,
    }

    impl WebSocketChannel {
        pub fn connect(url: &str) -> ViewResult<Self> {
            let (socket, _) = connect(url)
                .map_err(|e| ViewError::Transport(format!("failed to connect to {url}: {e}")))?;
            debug!(url, "optimizer channel connected");
            Ok(Self { socket })
        }

        /// Blocks until the next text frame; `None` once the peer closed.
        pub fn read_text(&mut self) -> ViewResult<Option<String>> {
            loop {
                let message = self
                    .socket
                    .read()
                    .map_err(|e| ViewError::Transport(format!("websocket read failed: {e}")))?;
                match message {
                    Message::Text(payload) => return Ok(Some(payload.to_string())),
                    Message::Close(_) => return Ok(None),
                    _ => continue,
                }
            }
        }

        pub fn close(&mut self) -> ViewResult<()> {
            self.socket
                .close(None)
                .map_err(|e| ViewError::Transport(format!("websocket close failed: {e}")))
        }
    }

    impl Channel for WebSocketChannel {
        fn send(&mut self, message: String) -> ViewResult<()> {
            self.socket
                .send(Message::Text(message.into()))
                .map_err(|e| ViewError::Transport(format!("websocket send failed: {e}")))
        }
    }
}

#[cfg(feature = "ws-channel")]
pub use websocket::WebSocketChannel;
