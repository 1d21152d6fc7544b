use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::sync::broadcast::error::RecvError;

use super::protocol::WsIncomingMessage;
use crate::core::errors::ApiError;
use crate::server::router::allowed_origins;
use crate::session::{NotificationLevel, SessionError, UiEvent};
use crate::state::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if !validate_origin(&headers, &state) {
        tracing::warn!("Rejected WebSocket connection from a disallowed origin");
        return Err(ApiError::Forbidden("Invalid Origin".to_string()));
    }
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before the snapshot so no delta falls between the two.
    let mut events = state.events.subscribe();
    if send_snapshot(&mut sender, &state).await.is_err() {
        return;
    }

    let forward_state = state.clone();
    let mut forwarder = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let payload = match serde_json::to_value(&event) {
                        Ok(value) => value,
                        Err(err) => {
                            tracing::warn!("Failed to serialize UI event: {}", err);
                            continue;
                        }
                    };
                    if send_json(&mut sender, payload).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("WebSocket client lagged by {} events, resyncing", skipped);
                    if send_snapshot(&mut sender, &forward_state).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                let Some(Ok(msg)) = incoming else { break };
                match msg {
                    Message::Text(text) => dispatch_text(&state, &text).await,
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            _ = &mut forwarder => break,
        }
    }

    forwarder.abort();
}

async fn dispatch_text(state: &AppState, text: &str) {
    let incoming = match serde_json::from_str::<WsIncomingMessage>(text) {
        Ok(incoming) => incoming,
        Err(err) => {
            report_failure(state, "websocket", &err);
            return;
        }
    };

    let handler = incoming.handler_name();
    if let Err(err) = handle_message(state, incoming).await {
        report_failure(state, handler, &err);
    }
}

async fn handle_message(state: &AppState, incoming: WsIncomingMessage) -> Result<(), SessionError> {
    let session = &state.session;
    match incoming {
        WsIncomingMessage::SendMessage { message } => {
            session.send_message(message).await;
        }
        WsIncomingMessage::Reset => {
            session.reset().await;
        }
        WsIncomingMessage::SelectConversation { id } => session.select_conversation(id).await?,
    }
    Ok(())
}

/// Turns any handler failure into a toast on the page.
fn report_failure(state: &AppState, handler: &str, err: &dyn std::fmt::Display) {
    tracing::warn!("Handler {} failed: {}", handler, err);
    state.events.emit(UiEvent::notification(
        NotificationLevel::Error,
        format!("An error occurred in {}: {}", handler, err),
    ));
}

async fn send_snapshot(
    sender: &mut SplitSink<WebSocket, Message>,
    state: &AppState,
) -> Result<(), ApiError> {
    let snapshot = state.session.snapshot().await;
    send_json(sender, json!({"type": "snapshot", "state": snapshot})).await
}

pub async fn send_json(
    sender: &mut SplitSink<WebSocket, Message>,
    payload: Value,
) -> Result<(), ApiError> {
    let text = serde_json::to_string(&payload).map_err(ApiError::internal)?;
    sender
        .send(Message::Text(text))
        .await
        .map_err(ApiError::internal)?;
    Ok(())
}

fn validate_origin(headers: &HeaderMap, state: &AppState) -> bool {
    let Some(origin) = headers.get("origin").and_then(|v| v.to_str().ok()) else {
        return true;
    };

    allowed_origins(&state.config.server)
        .iter()
        .any(|allowed| origin == allowed || origin.starts_with(&format!("{}/", allowed)))
}
