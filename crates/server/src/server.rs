use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use sea_orm::DatabaseConnection;

use std::sync::Arc;

use crate::{debug, notifications, realtime, transactions, user, wallets};
use engine::{Engine, PresenceRegistry};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
    pub presence: Arc<PresenceRegistry>,
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // A missing or malformed header is the same failure as a bad token.
    let auth_header = auth_header.ok_or(StatusCode::UNAUTHORIZED)?;
    let user = state
        .engine
        .user_by_token(auth_header.token())
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/wallets", get(wallets::list).post(wallets::create))
        .route("/wallets/{id}", axum::routing::delete(wallets::remove))
        .route("/transactions/verify-user", post(transactions::verify_user))
        .route("/transactions/send", post(transactions::send))
        .route("/transactions/send-batch", post(transactions::send_batch))
        .route("/transactions/received", get(transactions::received))
        .route("/notifications", get(notifications::list))
        .route("/notifications/{id}/read", put(notifications::mark_read))
        .route("/debug/connected-users", get(debug::connected_users))
        .route("/debug/sessions", get(debug::sessions))
        .route("/debug/test-notification", post(debug::test_notification))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/users/register", post(user::register))
        .route("/users/login", post(user::login))
        .route("/ping", get(debug::ping))
        .route("/ws", get(realtime::upgrade))
        .merge(protected)
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection, presence: Arc<PresenceRegistry>) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, presence, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    presence: Arc<PresenceRegistry>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
        presence,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    presence: Arc<PresenceRegistry>,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, presence, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
