use engine::{Engine, EngineError};
use migration::MigratorTrait;
use sea_orm::Database;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build()
}

#[tokio::test]
async fn register_normalizes_the_email_and_rejects_duplicates() {
    let engine = engine_with_db().await;

    let alice = engine
        .register_user("Alice", "  Alice@Example.COM ", "secret")
        .await
        .unwrap();
    assert_eq!(alice.email, "alice@example.com");
    assert!(alice.token.is_some());

    let err = engine
        .register_user("Imposter", "alice@example.com", "secret")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn login_rotates_the_bearer_token() {
    let engine = engine_with_db().await;
    let registered = engine
        .register_user("Alice", "alice@example.com", "secret")
        .await
        .unwrap();

    let logged_in = engine.login("ALICE@example.com", "secret").await.unwrap();
    assert_eq!(logged_in.id, registered.id);
    assert_ne!(logged_in.token, registered.token);

    // The old token no longer resolves; the new one does.
    let old = registered.token.unwrap();
    assert!(engine.user_by_token(&old).await.unwrap().is_none());
    let new = logged_in.token.unwrap();
    assert_eq!(
        engine.user_by_token(&new).await.unwrap().map(|u| u.id),
        Some(logged_in.id)
    );
}

#[tokio::test]
async fn login_with_bad_credentials_is_forbidden() {
    let engine = engine_with_db().await;
    engine
        .register_user("Alice", "alice@example.com", "secret")
        .await
        .unwrap();

    let err = engine
        .login("alice@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn verify_email_is_case_insensitive() {
    let engine = engine_with_db().await;
    engine
        .register_user("Alice", "alice@example.com", "secret")
        .await
        .unwrap();

    assert!(engine.verify_email_exists("ALICE@EXAMPLE.COM").await.unwrap());
    assert!(!engine.verify_email_exists("ghost@example.com").await.unwrap());
    assert!(!engine.verify_email_exists("   ").await.unwrap());
}
