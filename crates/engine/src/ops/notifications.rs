//! Notification inbox operations.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::{
    EngineError, Notification, NotificationEvent, ResultEngine,
    notifications::{self, KIND_SYSTEM, KIND_TEST},
    ops::Engine,
};

impl Engine {
    /// The user's inbox, newest first.
    ///
    /// An empty inbox is seeded with a single already-read "no notifications
    /// yet" entry before returning, so clients always have something to
    /// render. Existing clients depend on this quirk.
    pub async fn notifications_for_user(&self, user_id: &str) -> ResultEngine<Vec<Notification>> {
        let models = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .order_by_desc(notifications::Column::CreatedAt)
            .all(&self.database)
            .await?;

        if models.is_empty() {
            let owner = Uuid::parse_str(user_id)
                .map_err(|_| EngineError::KeyNotFound(user_id.to_string()))?;
            let seeded = Notification::new(
                owner,
                KIND_SYSTEM,
                "No notifications yet. Check back later!",
            )
            .read();
            notifications::ActiveModel::from(&seeded)
                .insert(&self.database)
                .await?;
            return Ok(vec![seeded]);
        }

        models.into_iter().map(Notification::try_from).collect()
    }

    /// Marks a notification read. Idempotent: a second call is a no-op that
    /// returns the same state. Only the owner may touch it.
    pub async fn mark_notification_read(
        &self,
        user_id: &str,
        notification_id: Uuid,
    ) -> ResultEngine<Notification> {
        let model = notifications::Entity::find_by_id(notification_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("notification".to_string()))?;

        if model.user_id != user_id {
            return Err(EngineError::Forbidden(
                "notification belongs to another user".to_string(),
            ));
        }

        if model.is_read {
            return Notification::try_from(model);
        }

        let update = notifications::ActiveModel {
            id: ActiveValue::Set(model.id.clone()),
            is_read: ActiveValue::Set(true),
            ..Default::default()
        };
        Notification::try_from(update.update(&self.database).await?)
    }

    /// Dev-only helper: stores a test notification for `user_id` and hands
    /// it to the delivery subscriber with no sender attached.
    pub async fn create_test_notification(
        &self,
        user_id: &str,
        message: &str,
    ) -> ResultEngine<Notification> {
        if message.trim().is_empty() {
            return Err(EngineError::InvalidInput("message is required".to_string()));
        }
        // The user must exist; notifications reference the users table.
        let user = self.user_by_id(user_id).await?;
        let owner = Uuid::parse_str(&user.id)
            .map_err(|_| EngineError::KeyNotFound(user.id.clone()))?;

        let notification = Notification::new(owner, KIND_TEST, message.trim());
        notifications::ActiveModel::from(&notification)
            .insert(&self.database)
            .await?;

        self.publish(NotificationEvent {
            recipient_id: owner,
            sender_id: None,
            notification: notification.clone(),
        });

        Ok(notification)
    }
}
