//! Notification inbox endpoints.

use api_types::notification::NotificationView;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn notification_view(notification: &engine::Notification) -> NotificationView {
    NotificationView {
        id: notification.id,
        user: notification.user,
        sender: notification.sender,
        from_email: notification.from_email.clone(),
        to_email: notification.to_email.clone(),
        kind: notification.kind.clone(),
        message: notification.message.clone(),
        link: notification.link.clone(),
        is_read: notification.is_read,
        created_at: notification.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<NotificationView>>, ServerError> {
    let inbox = state.engine.notifications_for_user(&user.id).await?;
    Ok(Json(inbox.iter().map(notification_view).collect()))
}

pub async fn mark_read(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationView>, ServerError> {
    let notification = state.engine.mark_notification_read(&user.id, id).await?;
    Ok(Json(notification_view(&notification)))
}
