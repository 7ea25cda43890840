//! Duplex Execution Channel
//!
//! The channel is a pair of ordered queues: events from the execution
//! service in, client messages out. [`connect`] backs it with a websocket;
//! [`in_memory`] backs it with the other end held by the caller.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use super::{decode_frame, encode_frame, ClientMessage, ServerEvent};
use crate::error::{Error, Result};

/// Client end of the execution channel
#[derive(Debug)]
pub struct ChannelHandle {
    outgoing: mpsc::UnboundedSender<ClientMessage>,
    incoming: mpsc::UnboundedReceiver<ServerEvent>,
}

impl ChannelHandle {
    pub fn new(
        outgoing: mpsc::UnboundedSender<ClientMessage>,
        incoming: mpsc::UnboundedReceiver<ServerEvent>,
    ) -> Self {
        Self { outgoing, incoming }
    }

    /// Queue a message for the execution service
    pub fn send(&self, message: ClientMessage) -> Result<()> {
        self.outgoing.send(message).map_err(|_| Error::ChannelClosed)
    }

    /// Next event in emission order; `None` once the service side is gone
    pub async fn recv(&mut self) -> Option<ServerEvent> {
        self.incoming.recv().await
    }

    /// Next event if one is already queued
    pub fn try_recv(&mut self) -> Option<ServerEvent> {
        self.incoming.try_recv().ok()
    }
}

/// Service end of an in-memory channel
#[derive(Debug)]
pub struct RemoteEnd {
    events: mpsc::UnboundedSender<ServerEvent>,
    messages: mpsc::UnboundedReceiver<ClientMessage>,
}

impl RemoteEnd {
    /// Push an event to the client
    pub fn emit(&self, event: ServerEvent) -> Result<()> {
        self.events.send(event).map_err(|_| Error::ChannelClosed)
    }

    /// Next message from the client
    pub async fn next_message(&mut self) -> Option<ClientMessage> {
        self.messages.recv().await
    }

    /// Next message from the client if one is already queued
    pub fn try_next_message(&mut self) -> Option<ClientMessage> {
        self.messages.try_recv().ok()
    }
}

/// Create a connected client/service pair
pub fn in_memory() -> (ChannelHandle, RemoteEnd) {
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    (
        ChannelHandle::new(out_tx, event_rx),
        RemoteEnd {
            events: event_tx,
            messages: out_rx,
        },
    )
}

/// Connect the execution channel over a websocket
pub async fn connect(url: &str) -> Result<ChannelHandle> {
    let (ws_stream, _) = connect_async(url)
        .await
        .map_err(|e| Error::ChannelConnectFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientMessage>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<ServerEvent>();

    info!(url, "Connected execution channel");

    // Writer: client messages -> websocket
    tokio::spawn(async move {
        while let Some(message) = out_rx.recv().await {
            let text = match encode_frame(&message) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to encode channel message: {}", e);
                    continue;
                }
            };
            if let Err(e) = ws_tx.send(Message::Text(text)).await {
                warn!("Execution channel write failed: {}", e);
                break;
            }
        }
        let _ = ws_tx.close().await;
        debug!("Execution channel writer stopped");
    });

    // Reader: websocket -> server events, in arrival order
    tokio::spawn(async move {
        while let Some(frame) = ws_rx.next().await {
            match frame {
                Ok(Message::Text(text)) => match decode_frame(&text) {
                    Ok(event) => {
                        if event_tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Dropping channel frame: {}", e),
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("Execution channel read failed: {}", e);
                    break;
                }
            }
        }
        debug!("Execution channel reader stopped");
    });

    Ok(ChannelHandle::new(out_tx, event_rx))
}
