//! Transfer endpoints: recipient check, single and batch sends, history.

use api_types::transaction::{
    BatchItemResult, BatchItemStatus, SendBatch, SendBatchResponse, SendNew, SendResponse,
    TransferView, VerifyUser, VerifyUserResponse,
};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::{BatchItemCmd, SendCoinsCmd};

use crate::{ServerError, server::ServerState};

fn transfer_view(record: engine::TransferRecord) -> TransferView {
    TransferView {
        id: record.id,
        from: record.from,
        from_email: record.from_email,
        to: record.to,
        to_email: record.to_email,
        coin: record.coin,
        amount: record.amount,
        created_at: record.created_at,
    }
}

/// Pre-flight check the client runs before a send.
pub async fn verify_user(
    Extension(_user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<VerifyUser>,
) -> Result<Response, ServerError> {
    if state.engine.verify_email_exists(&payload.email).await? {
        return Ok(Json(VerifyUserResponse {
            ok: true,
            message: None,
        })
        .into_response());
    }

    Ok((
        StatusCode::NOT_FOUND,
        Json(VerifyUserResponse {
            ok: false,
            message: Some("Recipient not found".to_string()),
        }),
    )
        .into_response())
}

pub async fn send(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SendNew>,
) -> Result<Json<SendResponse>, ServerError> {
    state
        .engine
        .send_coins(SendCoinsCmd::new(
            &user.id,
            &user.email,
            &payload.coin,
            payload.amount,
            &payload.to_email,
        ))
        .await?;

    Ok(Json(SendResponse {
        message: "Transaction successful".to_string(),
    }))
}

pub async fn send_batch(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SendBatch>,
) -> Result<Json<SendBatchResponse>, ServerError> {
    let items = payload
        .items
        .into_iter()
        .map(|item| BatchItemCmd::new(&item.to_email, &item.coin, item.amount))
        .collect();
    let outcomes = state
        .engine
        .send_coins_batch(&user.id, &user.email, items)
        .await?;

    let results = outcomes
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(balance) => BatchItemResult {
                to_email: outcome.to_email,
                coin: outcome.coin,
                status: BatchItemStatus::Ok,
                amount: Some(balance),
                message: None,
            },
            Err(reason) => BatchItemResult {
                to_email: outcome.to_email,
                coin: outcome.coin,
                status: BatchItemStatus::Error,
                amount: None,
                message: Some(reason),
            },
        })
        .collect();

    Ok(Json(SendBatchResponse {
        message: "Batch processed".to_string(),
        results,
    }))
}

pub async fn received(
    Extension(user): Extension<engine::users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<TransferView>>, ServerError> {
    let records = state.engine.received_transfers(&user.id).await?;
    Ok(Json(records.into_iter().map(transfer_view).collect()))
}
