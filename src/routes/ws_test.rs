use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::*;
use crate::routes::app;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_relay() -> (SocketAddr, AppState) {
    let state = AppState::new(16);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app(state.clone());
    tokio::spawn(async move { axum::serve(listener, router).await });
    (addr, state)
}

async fn connect(addr: SocketAddr, state: &AppState, expected_clients: usize) -> Client {
    let (stream, _) = connect_async(format!("ws://{addr}/")).await.unwrap();
    wait_for_clients(state, expected_clients).await;
    stream
}

/// Registration happens after the handshake completes; poll until the relay
/// sees the expected number of peers.
async fn wait_for_clients(state: &AppState, expected: usize) {
    timeout(Duration::from_secs(2), async {
        while state.client_count().await != expected {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}

async fn recv_text(client: &mut Client) -> String {
    let msg = timeout(Duration::from_millis(500), client.next()).await.unwrap().unwrap().unwrap();
    match msg {
        WsMessage::Text(text) => text.as_str().to_string(),
        other => panic!("expected text frame, got {other:?}"),
    }
}

async fn assert_silent(client: &mut Client) {
    let got = timeout(Duration::from_millis(150), client.next()).await;
    assert!(got.is_err(), "expected no frame, got {got:?}");
}

// =============================================================================
// RELAY
// =============================================================================

#[tokio::test]
async fn valid_frame_reaches_peer_verbatim_and_not_sender() {
    let (addr, state) = spawn_relay().await;
    let mut a = connect(addr, &state, 1).await;
    let mut b = connect(addr, &state, 2).await;

    let payload = r#"{ "type": "unlock",  "area": "forest1" }"#;
    a.send(WsMessage::Text(payload.into())).await.unwrap();

    assert_eq!(recv_text(&mut b).await, payload);
    assert_silent(&mut a).await;
}

#[tokio::test]
async fn malformed_frame_is_dropped_and_sender_stays_connected() {
    let (addr, state) = spawn_relay().await;
    let mut a = connect(addr, &state, 1).await;
    let mut b = connect(addr, &state, 2).await;

    a.send(WsMessage::Text("not json".into())).await.unwrap();
    assert_silent(&mut b).await;
    assert_eq!(state.client_count().await, 2);

    a.send(WsMessage::Text("[1]".into())).await.unwrap();
    assert_eq!(recv_text(&mut b).await, "[1]");
}

#[tokio::test]
async fn binary_frames_are_ignored() {
    let (addr, state) = spawn_relay().await;
    let mut a = connect(addr, &state, 1).await;
    let mut b = connect(addr, &state, 2).await;

    a.send(WsMessage::Binary(vec![1u8, 2, 3].into())).await.unwrap();
    assert_silent(&mut b).await;
    assert_eq!(state.client_count().await, 2);
}

#[tokio::test]
async fn fan_out_reaches_every_other_peer() {
    let (addr, state) = spawn_relay().await;
    let mut a = connect(addr, &state, 1).await;
    let mut b = connect(addr, &state, 2).await;
    let mut c = connect(addr, &state, 3).await;

    b.send(WsMessage::Text("{\"n\":2}".into())).await.unwrap();

    assert_eq!(recv_text(&mut a).await, "{\"n\":2}");
    assert_eq!(recv_text(&mut c).await, "{\"n\":2}");
    assert_silent(&mut b).await;
}

#[tokio::test]
async fn disconnect_unregisters_peer() {
    let (addr, state) = spawn_relay().await;
    let mut a = connect(addr, &state, 1).await;
    let mut b = connect(addr, &state, 2).await;

    b.close(None).await.unwrap();
    wait_for_clients(&state, 1).await;

    a.send(WsMessage::Text("{}".into())).await.unwrap();
    assert_silent(&mut a).await;
}

// =============================================================================
// HTTP
// =============================================================================

async fn plain_get(addr: SocketAddr, path: &str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    timeout(Duration::from_secs(2), stream.read_to_string(&mut response)).await.unwrap().unwrap();
    response
}

#[tokio::test]
async fn plain_get_reports_status_text() {
    let (addr, _state) = spawn_relay().await;
    let response = plain_get(addr, "/").await;
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with(STATUS_TEXT), "{response}");
}

#[tokio::test]
async fn healthz_answers_ok() {
    let (addr, state) = spawn_relay().await;
    let response = plain_get(addr, "/healthz").await;
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with("ok clients=0"), "{response}");

    let _a = connect(addr, &state, 1).await;
    let response = plain_get(addr, "/healthz").await;
    assert!(response.ends_with("ok clients=1"), "{response}");
}
