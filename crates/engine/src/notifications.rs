//! Per-user notification inbox.
//!
//! Notifications are created unread and only ever flip to read; the flag
//! never reverts. The inbox is the durable side of delivery: the real-time
//! channel is a convenience on top of it.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

/// Kind tag for an incoming-coins notification.
pub const KIND_COIN: &str = "coin";
/// Kind tag for the synthetic "empty inbox" entry.
pub const KIND_SYSTEM: &str = "system";
/// Kind tag for dev-only test notifications.
pub const KIND_TEST: &str = "test";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    /// Recipient of the notification.
    pub user: Uuid,
    pub sender: Option<Uuid>,
    pub from_email: Option<String>,
    pub to_email: Option<String>,
    pub kind: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user: Uuid, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            sender: None,
            from_email: None,
            to_email: None,
            kind: kind.into(),
            message: message.into(),
            link: None,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn sender(mut self, sender: Uuid) -> Self {
        self.sender = Some(sender);
        self
    }

    #[must_use]
    pub fn emails(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.from_email = Some(from.into());
        self.to_email = Some(to.into());
        self
    }

    #[must_use]
    pub fn read(mut self) -> Self {
        self.is_read = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub sender_id: Option<String>,
    pub from_email: Option<String>,
    pub to_email: Option<String>,
    pub kind: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Notification> for ActiveModel {
    fn from(value: &Notification) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user.to_string()),
            sender_id: ActiveValue::Set(value.sender.map(|id| id.to_string())),
            from_email: ActiveValue::Set(value.from_email.clone()),
            to_email: ActiveValue::Set(value.to_email.clone()),
            kind: ActiveValue::Set(value.kind.clone()),
            message: ActiveValue::Set(value.message.clone()),
            link: ActiveValue::Set(value.link.clone()),
            is_read: ActiveValue::Set(value.is_read),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Notification {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::KeyNotFound(model.id.clone()))?;
        let user = Uuid::parse_str(&model.user_id)
            .map_err(|_| EngineError::KeyNotFound(model.user_id.clone()))?;
        let sender = match &model.sender_id {
            Some(raw) => Some(
                Uuid::parse_str(raw).map_err(|_| EngineError::KeyNotFound(raw.clone()))?,
            ),
            None => None,
        };
        Ok(Self {
            id,
            user,
            sender,
            from_email: model.from_email,
            to_email: model.to_email,
            kind: model.kind,
            message: model.message,
            link: model.link,
            is_read: model.is_read,
            created_at: model.created_at,
        })
    }
}
