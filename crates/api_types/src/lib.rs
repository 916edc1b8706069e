//! Wire types shared between the server and its clients.
//!
//! Field names follow the JSON the web client already speaks
//! (camelCase, `type` for the notification kind), so the shapes here are
//! the contract and the server maps engine types into them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Plain `{"message": ...}` body, used for acks and every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterUser {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginUser {
        pub email: String,
        pub password: String,
    }

    /// Returned by both register and login.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub token: String,
        pub id: Uuid,
        pub name: String,
        pub email: String,
    }
}

pub mod wallet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletNew {
        pub coin: String,
        pub amount: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletView {
        pub id: Uuid,
        pub coin: String,
        pub amount: i64,
        pub created_at: DateTime<Utc>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VerifyUser {
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VerifyUserResponse {
        pub ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub message: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SendNew {
        pub coin: String,
        pub amount: i64,
        pub to_email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BatchItem {
        pub to_email: String,
        pub coin: String,
        pub amount: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SendBatch {
        pub items: Vec<BatchItem>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BatchItemStatus {
        Ok,
        Error,
    }

    /// One entry per input item, in input order.
    ///
    /// `amount` is the sender's balance for that coin after the item
    /// succeeded; `message` is the failure reason otherwise.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BatchItemResult {
        pub to_email: String,
        pub coin: String,
        pub status: BatchItemStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub amount: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub message: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SendResponse {
        pub message: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SendBatchResponse {
        pub message: String,
        pub results: Vec<BatchItemResult>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransferView {
        pub id: Uuid,
        pub from: Uuid,
        pub from_email: String,
        pub to: Uuid,
        pub to_email: String,
        pub coin: String,
        pub amount: i64,
        pub created_at: DateTime<Utc>,
    }
}

pub mod notification {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NotificationView {
        pub id: Uuid,
        pub user: Uuid,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub sender: Option<Uuid>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub from_email: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub to_email: Option<String>,
        #[serde(rename = "type")]
        pub kind: String,
        pub message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub link: Option<String>,
        pub is_read: bool,
        pub created_at: DateTime<Utc>,
    }

    /// Frame pushed over the real-time channel.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct RealtimeFrame {
        pub event: String,
        pub data: NotificationView,
    }
}

pub mod debug {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ConnectedUser {
        pub user_id: Uuid,
        pub sessions: Vec<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SessionInfo {
        pub session_id: Uuid,
        pub user_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TestNotification {
        pub user_id: Uuid,
        pub message: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TestNotificationResponse {
        pub ok: bool,
        pub notification: super::notification::NotificationView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Ping {
        pub ok: bool,
        pub time: DateTime<Utc>,
    }
}
