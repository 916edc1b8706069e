//! Wallet endpoints.

use api_types::MessageResponse;
use api_types::wallet::{WalletNew, WalletView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn wallet_view(wallet: engine::WalletBalance) -> WalletView {
    WalletView {
        id: wallet.id,
        coin: wallet.coin,
        amount: wallet.amount,
        created_at: wallet.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<WalletView>>, ServerError> {
    let wallets = state.engine.wallets_for_user(&user.id).await?;
    Ok(Json(wallets.into_iter().map(wallet_view).collect()))
}

pub async fn create(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<WalletNew>,
) -> Result<(StatusCode, Json<WalletView>), ServerError> {
    let wallet = state
        .engine
        .top_up_wallet(&user.id, &payload.coin, payload.amount)
        .await?;
    Ok((StatusCode::CREATED, Json(wallet_view(wallet))))
}

pub async fn remove(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ServerError> {
    state.engine.delete_wallet(&user.id, id).await?;
    Ok(Json(MessageResponse {
        message: "Wallet deleted".to_string(),
    }))
}
