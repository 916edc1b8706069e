//! Liveness probe and dev-only introspection endpoints.

use api_types::debug::{ConnectedUser, Ping, SessionInfo, TestNotification, TestNotificationResponse};
use axum::{Extension, Json, extract::State};
use chrono::Utc;

use crate::{ServerError, notifications::notification_view, server::ServerState};

pub async fn ping() -> Json<Ping> {
    Json(Ping {
        ok: true,
        time: Utc::now(),
    })
}

/// Snapshot of users with at least one open real-time session.
pub async fn connected_users(
    Extension(_user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
) -> Json<Vec<ConnectedUser>> {
    let users = state
        .presence
        .connected_users()
        .into_iter()
        .map(|(user_id, sessions)| ConnectedUser { user_id, sessions })
        .collect();
    Json(users)
}

/// Every open session and the identity it authenticated as.
pub async fn sessions(
    Extension(_user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
) -> Json<Vec<SessionInfo>> {
    let sessions = state
        .presence
        .sessions()
        .into_iter()
        .map(|(session_id, user_id)| SessionInfo {
            session_id,
            user_id,
        })
        .collect();
    Json(sessions)
}

/// Stores and pushes a notification without going through a transfer.
pub async fn test_notification(
    Extension(_user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TestNotification>,
) -> Result<Json<TestNotificationResponse>, ServerError> {
    let notification = state
        .engine
        .create_test_notification(&payload.user_id.to_string(), &payload.message)
        .await?;

    Ok(Json(TestNotificationResponse {
        ok: true,
        notification: notification_view(&notification),
    }))
}
