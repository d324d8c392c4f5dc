// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The socket relay: one shared connection, a named-event surface.
//!
//! Pages register at most one handler per event name (`on` replaces any
//! previous handler for that name) and emit fire-and-forget events; a few
//! exchanges are request/response-shaped and use acknowledgement ids.
//! There is no reconnection or backoff policy: a dropped connection marks
//! the relay disconnected, emits are dropped with a debug log, and the
//! next explicit `connect()` dials fresh.

pub mod events;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::auth::Role;
use crate::error::{ClientError, Result};
pub use events::Envelope;

/// How long an acknowledged emit waits before giving up.
const ACK_TIMEOUT: Duration = Duration::from_secs(5);

type EventHandler = Arc<dyn Fn(Value) + Send + Sync>;

struct ConnectionHandle {
    tx: mpsc::UnboundedSender<Message>,
    alive: Arc<AtomicBool>,
}

/// Shared socket connection with a named-event pub/sub surface.
pub struct SocketRelay {
    url: String,
    conn: Mutex<Option<ConnectionHandle>>,
    handlers: Arc<DashMap<String, EventHandler>>,
    pending_acks: Arc<DashMap<u64, oneshot::Sender<Value>>>,
    next_ack: AtomicU64,
}

impl SocketRelay {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            conn: Mutex::new(None),
            handlers: Arc::new(DashMap::new()),
            pending_acks: Arc::new(DashMap::new()),
            next_ack: AtomicU64::new(1),
        }
    }

    /// Open the connection, reusing a live one.
    pub async fn connect(&self) -> Result<()> {
        let mut guard = self.conn.lock().await;
        if let Some(handle) = guard.as_ref() {
            if handle.alive.load(Ordering::SeqCst) {
                return Ok(());
            }
        }

        let (stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| ClientError::Socket(format!("connect {}: {}", self.url, e)))?;
        tracing::info!(url = %self.url, "Socket connected");

        let (mut write, mut read) = stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
        let alive = Arc::new(AtomicBool::new(true));

        // Writer task: everything outbound funnels through one sender.
        let writer_alive = Arc::clone(&alive);
        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if write.send(msg).await.is_err() {
                    break;
                }
            }
            writer_alive.store(false, Ordering::SeqCst);
        });

        // Reader task: envelopes go to the ack table or to the single
        // handler registered for their event name, in delivery order.
        let handlers = Arc::clone(&self.handlers);
        let pending_acks = Arc::clone(&self.pending_acks);
        let reader_alive = Arc::clone(&alive);
        tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                let msg = match msg {
                    Ok(msg) => msg,
                    Err(err) => {
                        tracing::warn!(error = %err, "Socket read error");
                        break;
                    }
                };
                if !msg.is_text() {
                    continue;
                }
                let Ok(text) = msg.to_text() else { continue };

                let envelope: Envelope = match serde_json::from_str(text) {
                    Ok(envelope) => envelope,
                    Err(err) => {
                        tracing::warn!(error = %err, "Malformed socket envelope");
                        continue;
                    }
                };

                if let Some((_, sender)) = envelope.ack.and_then(|id| pending_acks.remove(&id)) {
                    let _ = sender.send(envelope.data);
                    continue;
                }

                let handler = handlers
                    .get(&envelope.event)
                    .map(|entry| Arc::clone(entry.value()));
                match handler {
                    Some(handler) => handler(envelope.data),
                    None => {
                        tracing::debug!(event = %envelope.event, "No handler registered, dropping event")
                    }
                }
            }
            reader_alive.store(false, Ordering::SeqCst);
            tracing::info!("Socket disconnected");
        });

        *guard = Some(ConnectionHandle { tx, alive });
        Ok(())
    }

    /// Whether the connection is currently live.
    pub async fn is_connected(&self) -> bool {
        let guard = self.conn.lock().await;
        guard
            .as_ref()
            .map(|handle| handle.alive.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// Announce this connection's identity to the server.
    ///
    /// Must be called after every fresh `connect()` before the server
    /// routes role-specific events here.
    pub async fn join(&self, participant_id: &str, role: Role) {
        self.emit(
            events::names::JOIN,
            &events::JoinPayload {
                user_id: participant_id.to_string(),
                user_type: role.user_type().to_string(),
            },
        )
        .await;
    }

    /// Register the handler for an event name, replacing any previous one.
    pub fn on<F>(&self, event: &str, handler: F)
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        self.handlers.insert(event.to_string(), Arc::new(handler));
    }

    /// Remove the handler for an event name.
    pub fn off(&self, event: &str) {
        self.handlers.remove(event);
    }

    /// Fire-and-forget emit. Dropped (with a debug log) when disconnected.
    pub async fn emit<P: Serialize>(&self, event: &str, payload: &P) {
        let envelope = Envelope {
            event: event.to_string(),
            data: match serde_json::to_value(payload) {
                Ok(data) => data,
                Err(err) => {
                    tracing::warn!(event, error = %err, "Unserializable payload, dropping emit");
                    return;
                }
            },
            ack: None,
        };
        self.send_envelope(envelope).await;
    }

    /// Emit expecting an acknowledgement envelope from the server.
    pub async fn emit_with_ack<P: Serialize>(&self, event: &str, payload: &P) -> Result<Value> {
        let ack_id = self.next_ack.fetch_add(1, Ordering::SeqCst);
        let (sender, receiver) = oneshot::channel();
        self.pending_acks.insert(ack_id, sender);

        let envelope = Envelope {
            event: event.to_string(),
            data: serde_json::to_value(payload)
                .map_err(|e| ClientError::Socket(format!("serialize {}: {}", event, e)))?,
            ack: Some(ack_id),
        };

        if !self.send_envelope(envelope).await {
            self.pending_acks.remove(&ack_id);
            return Err(ClientError::Socket("not connected".to_string()));
        }

        match tokio::time::timeout(ACK_TIMEOUT, receiver).await {
            Ok(Ok(data)) => Ok(data),
            _ => {
                self.pending_acks.remove(&ack_id);
                Err(ClientError::Ack(event.to_string()))
            }
        }
    }

    /// Close the connection and clear every registered handler.
    pub async fn disconnect(&self) {
        let mut guard = self.conn.lock().await;
        if let Some(handle) = guard.take() {
            let _ = handle.tx.send(Message::Close(None));
            handle.alive.store(false, Ordering::SeqCst);
        }
        self.handlers.clear();
        self.pending_acks.clear();
    }

    /// True if the message was handed to the writer task.
    async fn send_envelope(&self, envelope: Envelope) -> bool {
        let text = match serde_json::to_string(&envelope) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "Unserializable envelope");
                return false;
            }
        };

        let guard = self.conn.lock().await;
        match guard.as_ref() {
            Some(handle) if handle.alive.load(Ordering::SeqCst) => {
                handle.tx.send(Message::Text(text)).is_ok()
            }
            _ => {
                tracing::debug!(event = %envelope.event, "Socket not connected, dropping emit");
                false
            }
        }
    }
}
