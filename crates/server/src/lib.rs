use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod debug;
mod notifications;
mod realtime;
mod server;
mod transactions;
mod user;
mod wallets;

pub mod types {
    pub mod user {
        pub use api_types::user::{AuthResponse, LoginUser, RegisterUser};
    }

    pub mod wallet {
        pub use api_types::wallet::{WalletNew, WalletView};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            BatchItem, BatchItemResult, BatchItemStatus, SendBatch, SendBatchResponse, SendNew,
            SendResponse, TransferView, VerifyUser, VerifyUserResponse,
        };
    }

    pub mod notification {
        pub use api_types::notification::{NotificationView, RealtimeFrame};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) | EngineError::RecipientNotFound => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidInput(_)
        | EngineError::SelfTransfer
        | EngineError::InsufficientBalance => StatusCode::BAD_REQUEST,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
