//! Account endpoints: registration and login.

use api_types::user::{AuthResponse, LoginUser, RegisterUser};
use axum::{Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState};

fn auth_response(user: engine::users::Model) -> Result<AuthResponse, ServerError> {
    let token = user
        .token
        .ok_or_else(|| ServerError::Generic("no session token issued".to_string()))?;
    let id = uuid::Uuid::parse_str(&user.id)
        .map_err(|_| ServerError::Generic("malformed user id".to_string()))?;
    Ok(AuthResponse {
        token,
        id,
        name: user.name,
        email: user.email,
    })
}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterUser>,
) -> Result<(StatusCode, Json<AuthResponse>), ServerError> {
    let user = state
        .engine
        .register_user(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(auth_response(user)?)))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginUser>,
) -> Result<Json<AuthResponse>, ServerError> {
    let user = state.engine.login(&payload.email, &payload.password).await?;
    Ok(Json(auth_response(user)?))
}
