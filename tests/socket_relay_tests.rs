// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Socket relay semantics: idempotent connect, join announcement,
//! single-handler-per-event registration, and acknowledged emits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cabio_client::auth::Role;
use cabio_client::error::ClientError;
use cabio_client::socket::{Envelope, SocketRelay};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};

mod common;

/// Server that forwards every received envelope to the test and pushes
/// every envelope the test hands it.
async fn echo_server(
    listener: tokio::net::TcpListener,
    received: mpsc::UnboundedSender<Envelope>,
    mut to_push: mpsc::UnboundedReceiver<Envelope>,
) {
    let (stream, _) = listener.accept().await.unwrap();
    let ws = accept_async(stream).await.unwrap();
    let (mut write, mut read) = ws.split();

    loop {
        tokio::select! {
            msg = read.next() => {
                let Some(Ok(msg)) = msg else { break };
                if !msg.is_text() {
                    continue;
                }
                let envelope: Envelope = serde_json::from_str(msg.to_text().unwrap()).unwrap();
                let _ = received.send(envelope);
            }
            envelope = to_push.recv() => {
                let Some(envelope) = envelope else { break };
                let text = serde_json::to_string(&envelope).unwrap();
                if write.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    }
}

struct Harness {
    relay: Arc<SocketRelay>,
    received: mpsc::UnboundedReceiver<Envelope>,
    push: mpsc::UnboundedSender<Envelope>,
}

async fn connect_harness() -> Harness {
    let (listener, url) = common::bind_ws().await;
    let (received_tx, received) = mpsc::unbounded_channel();
    let (push, push_rx) = mpsc::unbounded_channel();
    tokio::spawn(echo_server(listener, received_tx, push_rx));

    let relay = Arc::new(SocketRelay::new(url));
    relay.connect().await.unwrap();
    Harness {
        relay,
        received,
        push,
    }
}

async fn next_envelope(received: &mut mpsc::UnboundedReceiver<Envelope>) -> Envelope {
    tokio::time::timeout(Duration::from_secs(5), received.recv())
        .await
        .expect("no envelope from client")
        .expect("server channel closed")
}

#[tokio::test]
async fn test_join_announces_identity_and_role() {
    let mut harness = connect_harness().await;

    harness.relay.join("c42", Role::Captain).await;

    let envelope = next_envelope(&mut harness.received).await;
    assert_eq!(envelope.event, "join");
    assert_eq!(envelope.data["userId"], json!("c42"));
    assert_eq!(envelope.data["userType"], json!("captain"));
    assert_eq!(envelope.ack, None);
}

#[tokio::test]
async fn test_connect_is_idempotent() {
    let harness = connect_harness().await;

    // Reuses the live connection instead of dialing again; a second dial
    // would hang forever because the test listener accepts only once.
    harness.relay.connect().await.unwrap();
    assert!(harness.relay.is_connected().await);

    harness.relay.emit("ping", &json!({})).await;
}

#[tokio::test]
async fn test_second_handler_replaces_the_first() {
    let mut harness = connect_harness().await;

    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    harness.relay.on("ride-confirmed", {
        let first = Arc::clone(&first);
        move |_| {
            first.fetch_add(1, Ordering::SeqCst);
        }
    });
    harness.relay.on("ride-confirmed", {
        let second = Arc::clone(&second);
        move |_| {
            second.fetch_add(1, Ordering::SeqCst);
        }
    });

    harness
        .push
        .send(Envelope {
            event: "ride-confirmed".to_string(),
            data: json!({ "x": 1 }),
            ack: None,
        })
        .unwrap();

    // Round-trip a second event to know the first was dispatched.
    harness.relay.emit("marker", &json!({})).await;
    let _ = next_envelope(&mut harness.received).await;
    common::wait_for("replacement handler to run", || {
        second.load(Ordering::SeqCst) == 1
    })
    .await;

    assert_eq!(first.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_off_unregisters_the_handler() {
    let harness = connect_harness().await;

    let calls = Arc::new(AtomicUsize::new(0));
    harness.relay.on("ride-started", {
        let calls = Arc::clone(&calls);
        move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    });
    harness.relay.off("ride-started");

    harness
        .push
        .send(Envelope {
            event: "ride-started".to_string(),
            data: json!({}),
            ack: None,
        })
        .unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_emit_with_ack_resolves_with_server_payload() {
    let mut harness = connect_harness().await;

    let relay = Arc::clone(&harness.relay);
    let ack_task = tokio::spawn(async move {
        relay
            .emit_with_ack("accept-ride-request", &json!({ "rideId": "r1" }))
            .await
    });

    let request = next_envelope(&mut harness.received).await;
    assert_eq!(request.event, "accept-ride-request");
    let ack_id = request.ack.expect("acknowledged emit carries an ack id");

    harness
        .push
        .send(Envelope {
            event: "accept-ride-request".to_string(),
            data: json!({ "confirmed": true }),
            ack: Some(ack_id),
        })
        .unwrap();

    let ack = ack_task.await.unwrap().unwrap();
    assert_eq!(ack, json!({ "confirmed": true }));
}

#[tokio::test]
async fn test_emit_without_connection_is_dropped_quietly() {
    let relay = SocketRelay::new("ws://127.0.0.1:9");

    // Fire-and-forget: dropped, no error, no panic.
    relay.emit("ride-confirmed", &json!({ "x": 1 })).await;
    assert!(!relay.is_connected().await);

    // Request/response has to fail loudly instead.
    let result = relay.emit_with_ack("accept-ride-request", &json!({})).await;
    assert!(matches!(result, Err(ClientError::Socket(_))));
}

#[tokio::test]
async fn test_disconnect_clears_handlers() {
    let harness = connect_harness().await;

    let calls = Arc::new(AtomicUsize::new(0));
    harness.relay.on("ride-ended", {
        let calls = Arc::clone(&calls);
        move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    });

    harness.relay.disconnect().await;
    assert!(!harness.relay.is_connected().await);

    // Events pushed after disconnect reach nobody.
    let _ = harness.push.send(Envelope {
        event: "ride-ended".to_string(),
        data: json!({}),
        ack: None,
    });
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
