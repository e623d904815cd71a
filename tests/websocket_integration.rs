//! Integration tests for the WebSocket transport.
//!
//! Runs the full router on a loopback listener and drives it with real
//! WebSocket clients:
//! 1. Text fan-out, immediate and delayed, including the sender
//! 2. `stop` closes only the sender with a close frame
//! 3. Disconnects unregister the session and release its connection tasks

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use broadcast_hub::adapters::http::{app_router, HubState};
use broadcast_hub::adapters::{InMemorySessionRegistry, TokioDelayScheduler};
use broadcast_hub::application::{BroadcastHub, HubSettings};
use broadcast_hub::config::ServerConfig;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const READ_TIMEOUT: Duration = Duration::from_secs(2);

// =============================================================================
// Helpers
// =============================================================================

async fn start_server() -> (SocketAddr, Arc<BroadcastHub>) {
    let hub = Arc::new(BroadcastHub::new(
        Arc::new(InMemorySessionRegistry::new()),
        Arc::new(TokioDelayScheduler::new()),
        HubSettings::default(),
    ));
    let app = app_router(HubState::new(hub.clone()), &ServerConfig::default());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, hub)
}

async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{}/broadcast", addr))
        .await
        .unwrap();
    client
}

async fn next_frame(client: &mut Client) -> Message {
    timeout(READ_TIMEOUT, client.next())
        .await
        .expect("timed out waiting for a frame")
        .expect("connection ended")
        .expect("read failed")
}

async fn next_text(client: &mut Client) -> String {
    loop {
        if let Message::Text(text) = next_frame(client).await {
            return text.as_str().to_string();
        }
    }
}

/// Poll until the hub holds `expected` sessions.
async fn wait_for_sessions(hub: &BroadcastHub, expected: usize) -> bool {
    for _ in 0..200 {
        if hub.session_count().await == expected {
            return true;
        }
        sleep(Duration::from_millis(10)).await;
    }
    false
}

fn alive_tasks() -> usize {
    tokio::runtime::Handle::current().metrics().num_alive_tasks()
}

// =============================================================================
// Fan-out
// =============================================================================

#[tokio::test]
async fn text_reaches_every_client_then_again_delayed() {
    let (addr, hub) = start_server().await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    assert!(wait_for_sessions(&hub, 2).await);

    a.send(Message::text("hello")).await.unwrap();

    assert_eq!(next_text(&mut a).await, "hello");
    assert_eq!(next_text(&mut b).await, "hello");
    assert_eq!(next_text(&mut a).await, "hello (delayed)");
    assert_eq!(next_text(&mut b).await, "hello (delayed)");
}

// =============================================================================
// Stop
// =============================================================================

#[tokio::test]
async fn stop_sends_close_frame_to_sender_only() {
    let (addr, hub) = start_server().await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    assert!(wait_for_sessions(&hub, 2).await);

    a.send(Message::text("stop")).await.unwrap();

    match next_frame(&mut a).await {
        Message::Close(Some(frame)) => {
            assert_eq!(u16::from(frame.code), 1000);
            assert_eq!(frame.reason.as_str(), "stop requested");
        }
        other => panic!("expected a close frame, got {:?}", other),
    }
    assert!(wait_for_sessions(&hub, 1).await);
    assert!(timeout(Duration::from_millis(700), b.next()).await.is_err());
}

// =============================================================================
// Teardown
// =============================================================================

#[tokio::test]
async fn disconnects_release_sessions_and_connection_tasks() {
    let (addr, hub) = start_server().await;
    let baseline = alive_tasks();

    let mut clients = Vec::new();
    for _ in 0..20 {
        clients.push(connect(addr).await);
    }
    assert!(wait_for_sessions(&hub, 20).await);

    // Half close politely, half just vanish
    for (i, mut client) in clients.into_iter().enumerate() {
        if i % 2 == 0 {
            client.close(None).await.unwrap();
        }
        drop(client);
    }

    assert!(wait_for_sessions(&hub, 0).await);

    let mut alive = alive_tasks();
    for _ in 0..200 {
        if alive <= baseline {
            break;
        }
        sleep(Duration::from_millis(10)).await;
        alive = alive_tasks();
    }
    assert!(
        alive <= baseline,
        "connection tasks still alive: baseline={} alive={}",
        baseline,
        alive
    );
}

#[tokio::test]
async fn stopped_connection_releases_its_tasks() {
    let (addr, hub) = start_server().await;
    let baseline = alive_tasks();
    let mut a = connect(addr).await;
    assert!(wait_for_sessions(&hub, 1).await);

    a.send(Message::text("stop")).await.unwrap();
    assert!(matches!(next_frame(&mut a).await, Message::Close(_)));
    assert!(wait_for_sessions(&hub, 0).await);

    for _ in 0..200 {
        if alive_tasks() <= baseline {
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }
    assert!(alive_tasks() <= baseline);
}
