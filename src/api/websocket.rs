use crate::messaging::event::EventMessage;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use log::{debug, error, warn};
use serde::Deserialize;
use tokio::sync::broadcast;

use super::rest::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct WsAuthQuery {
    token: Option<String>,
}

/// Upgrade to the live event stream. Browsers cannot set headers on a
/// WebSocket handshake, so the bearer token arrives as a query parameter.
pub async fn events_handler(
    State(state): State<AppState>,
    Query(query): Query<WsAuthQuery>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    let token = query.token.ok_or(ApiError {
        message: "Missing bearer token".to_string(),
        status: StatusCode::UNAUTHORIZED.as_u16(),
    })?;
    state.security.validate_token(&token)?;

    let rx = state.bus.subscribe();
    Ok(ws.on_upgrade(move |socket| stream_events(socket, rx)))
}

// Forward bus events to the client until either side hangs up.
async fn stream_events(socket: WebSocket, mut rx: broadcast::Receiver<EventMessage>) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    let text = match serde_json::to_string(&event) {
                        Ok(text) => text,
                        Err(e) => {
                            error!("Failed to encode event for stream: {}", e);
                            continue;
                        }
                    };
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(dropped)) => {
                    warn!("Event stream lagged, dropped {} events", dropped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {
                    // clients only listen; ignore anything they send
                }
                Some(Err(_)) => break,
            },
        }
    }

    debug!("Event stream client disconnected");
}
