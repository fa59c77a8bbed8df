//! JSON/WebSocket surface over a shared [`Poller`].

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::{SinkExt, StreamExt};
use log::{debug, warn};
use tokio::sync::{watch, Mutex};

use crate::application::Poller;
use crate::domain::{self, DashboardState};

pub struct Dashboard<Fetcher> {
    poller: Arc<Mutex<Poller<Fetcher>>>,
    state: watch::Receiver<DashboardState>,
}
impl<Fetcher> Clone for Dashboard<Fetcher> {
    fn clone(&self) -> Self {
        Self {
            poller: self.poller.clone(),
            state: self.state.clone(),
        }
    }
}

pub fn router<Fetcher>(poller: Arc<Mutex<Poller<Fetcher>>>, state: watch::Receiver<DashboardState>) -> Router
where
    Fetcher: domain::Fetcher + Send + Sync + 'static,
{
    Router::new()
        .route("/api/state", get(get_state::<Fetcher>))
        .route("/api/toggle", post(toggle::<Fetcher>))
        .route("/api/fetch", post(fetch_once::<Fetcher>))
        .route("/api/ws", get(websocket::<Fetcher>))
        .with_state(Dashboard { poller, state })
}

async fn get_state<Fetcher>(State(dashboard): State<Dashboard<Fetcher>>) -> Json<DashboardState>
where
    Fetcher: domain::Fetcher + Send + Sync + 'static,
{
    let state = dashboard.state.borrow().clone();
    Json(state)
}

async fn toggle<Fetcher>(State(dashboard): State<Dashboard<Fetcher>>) -> Json<DashboardState>
where
    Fetcher: domain::Fetcher + Send + Sync + 'static,
{
    let mut poller = dashboard.poller.lock().await;
    poller.toggle();
    Json(poller.state())
}

async fn fetch_once<Fetcher>(State(dashboard): State<Dashboard<Fetcher>>) -> StatusCode
where
    Fetcher: domain::Fetcher + Send + Sync + 'static,
{
    let _ = dashboard.poller.lock().await.fetch_once();
    StatusCode::ACCEPTED
}

async fn websocket<Fetcher>(
    ws: WebSocketUpgrade,
    State(dashboard): State<Dashboard<Fetcher>>,
) -> Response
where
    Fetcher: domain::Fetcher + Send + Sync + 'static,
{
    let state = dashboard.state.clone();
    ws.on_upgrade(move |socket| stream_state(socket, state))
}

/// Sends the state now and after every change. Any inbound message other than
/// a close asks for the current state again.
async fn stream_state(socket: WebSocket, mut state: watch::Receiver<DashboardState>) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        let json = serde_json::to_string(&*state.borrow_and_update());
        let json = match json {
            Ok(x) => x,
            Err(why) => {
                warn!("failed to encode the dashboard state: {why}");
                break;
            }
        };
        if let Err(why) = sender.send(Message::Text(json)).await {
            debug!("websocket closed: {why}");
            break;
        }

        tokio::select! {
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => (),
            },
        }
    }
}
