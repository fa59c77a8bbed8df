use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use framewatch::application::Poller;
use framewatch::domain::{Fetcher, PollConfig, Record};
use framewatch::infrastructure::presentation::dashboard_server;

#[derive(Debug)]
struct Never;
impl std::fmt::Display for Never {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("never")
    }
}
impl std::error::Error for Never {}

#[derive(Default)]
struct CountingFetcher {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Fetcher for CountingFetcher {
    type Error = Never;

    async fn fetch(&self, _resource: &str) -> Result<Vec<Record>, Self::Error> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(vec![Record::from(json!({ "frame_id": format!("f-{n}") }))])
    }
}

async fn spawn_dashboard() -> String {
    let poller = Poller::new(CountingFetcher::default(), PollConfig::default());
    let state = poller.subscribe();
    let router = dashboard_server::router(Arc::new(Mutex::new(poller)), state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

    format!("http://{addr}")
}

async fn get_state(client: &reqwest::Client, base: &str) -> Value {
    client
        .get(format!("{base}/api/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn state_starts_idle_and_empty() {
    let base = spawn_dashboard().await;
    let client = reqwest::Client::new();

    let state = get_state(&client, &base).await;
    assert_eq!(state["active"], json!(false));
    assert_eq!(state["data"], json!([]));
    assert_eq!(state["last_updated"], Value::Null);
}

#[tokio::test]
async fn toggle_flips_active() {
    let base = spawn_dashboard().await;
    let client = reqwest::Client::new();

    for expected in [true, false, true] {
        let state: Value = client
            .post(format!("{base}/api/toggle"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(state["active"], json!(expected));
        assert_eq!(get_state(&client, &base).await["active"], json!(expected));
    }
}

#[tokio::test]
async fn fetch_is_accepted_and_updates_data() {
    let base = spawn_dashboard().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/fetch"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 202);

    let mut state = get_state(&client, &base).await;
    for _ in 0..50 {
        if state["data"] != json!([]) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        state = get_state(&client, &base).await;
    }

    assert_eq!(state["data"], json!([{ "frame_id": "f-1" }]));
    assert_eq!(state["active"], json!(false));
    assert!(state["last_updated"].is_string());
}

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn next_state(socket: &mut Socket) -> Value {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("no message within 5s")
            .expect("socket closed")
            .unwrap();
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[tokio::test]
async fn websocket_pushes_state_on_connect_and_on_change() {
    let base = spawn_dashboard().await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/ws", base.replacen("http://", "ws://", 1));
    let (mut socket, _) = tokio_tungstenite::connect_async(url).await.unwrap();

    let initial = next_state(&mut socket).await;
    assert_eq!(
        initial,
        json!({ "active": false, "data": [], "last_updated": null })
    );

    let response = client
        .post(format!("{base}/api/fetch"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 202);

    let updated = next_state(&mut socket).await;
    assert_eq!(updated["data"], json!([{ "frame_id": "f-1" }]));
    assert!(updated["last_updated"].is_string());

    socket
        .send(Message::Text("refresh".to_owned()))
        .await
        .unwrap();
    let resent = next_state(&mut socket).await;
    assert_eq!(resent, updated);

    socket.close(None).await.unwrap();
}
