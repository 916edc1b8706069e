//! WebSocket endpoint feeding matched notifications to connected clients.
//!
//! The handshake authenticates with `?token=`; a bad token refuses the
//! upgrade. Each accepted connection registers one session in the presence
//! registry and unregisters it on close, whichever way the connection ends.

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use uuid::Uuid;

use crate::{notifications::notification_view, server::ServerState};
use api_types::notification::RealtimeFrame;
use engine::SessionHandle;

const EVENT_NEW_NOTIFICATION: &str = "newNotification";

#[derive(Deserialize)]
pub struct WsParams {
    token: Option<String>,
}

pub async fn upgrade(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<ServerState>,
) -> Result<Response, StatusCode> {
    let token = params.token.ok_or(StatusCode::UNAUTHORIZED)?;
    let user = state
        .engine
        .user_by_token(&token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let user_id = Uuid::parse_str(&user.id).map_err(|_| StatusCode::UNAUTHORIZED)?;

    Ok(ws.on_upgrade(move |socket| session(socket, state, user_id)))
}

async fn session(socket: WebSocket, state: ServerState, user_id: Uuid) {
    let (handle, mut pushed) = SessionHandle::new(Some(user_id));
    let session_id = handle.id;
    state.presence.register(user_id, handle);
    tracing::info!("session {session_id} opened for user {user_id}");

    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            incoming = stream.next() => match incoming {
                // Clients only listen on this channel; drain and ignore
                // anything they send besides close.
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            notification = pushed.recv() => {
                let Some(notification) = notification else { break };
                let frame = RealtimeFrame {
                    event: EVENT_NEW_NOTIFICATION.to_string(),
                    data: notification_view(&notification),
                };
                match serde_json::to_string(&frame) {
                    Ok(text) => {
                        if sink.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => tracing::error!("failed to encode frame: {err}"),
                }
            }
        }
    }

    state.presence.unregister(user_id, session_id);
    tracing::info!("session {session_id} closed");
}
