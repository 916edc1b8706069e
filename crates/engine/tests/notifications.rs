use engine::{Engine, EngineError, SendCoinsCmd};
use migration::MigratorTrait;
use sea_orm::Database;
use uuid::Uuid;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build()
}

async fn register(engine: &Engine, name: &str, email: &str) -> engine::users::Model {
    engine.register_user(name, email, "password").await.unwrap()
}

#[tokio::test]
async fn empty_inbox_is_seeded_with_a_read_placeholder() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;

    let inbox = engine.notifications_for_user(&alice.id).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0].is_read);
    assert_eq!(inbox[0].message, "No notifications yet. Check back later!");

    // The seed is stored, not synthesized per call.
    let again = engine.notifications_for_user(&alice.id).await.unwrap();
    assert_eq!(again.len(), 1);
    assert_eq!(again[0].id, inbox[0].id);
}

#[tokio::test]
async fn offline_recipient_still_gets_a_durable_unread_notification() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    let bob = register(&engine, "Bob", "bob@example.com").await;
    engine.top_up_wallet(&alice.id, "BTC", 5).await.unwrap();

    // No delivery subscriber and no open sessions anywhere.
    engine
        .send_coins(SendCoinsCmd::new(
            &alice.id,
            &alice.email,
            "BTC",
            2,
            "bob@example.com",
        ))
        .await
        .unwrap();

    let inbox = engine.notifications_for_user(&bob.id).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert!(!inbox[0].is_read);
    assert_eq!(inbox[0].from_email.as_deref(), Some("alice@example.com"));
}

#[tokio::test]
async fn mark_read_is_idempotent() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    let bob = register(&engine, "Bob", "bob@example.com").await;
    engine.top_up_wallet(&alice.id, "BTC", 5).await.unwrap();
    let receipt = engine
        .send_coins(SendCoinsCmd::new(
            &alice.id,
            &alice.email,
            "BTC",
            1,
            "bob@example.com",
        ))
        .await
        .unwrap();

    let first = engine
        .mark_notification_read(&bob.id, receipt.notification.id)
        .await
        .unwrap();
    assert!(first.is_read);

    let second = engine
        .mark_notification_read(&bob.id, receipt.notification.id)
        .await
        .unwrap();
    assert!(second.is_read);
    assert_eq!(second.id, first.id);
}

#[tokio::test]
async fn mark_read_refuses_foreign_notifications() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    let bob = register(&engine, "Bob", "bob@example.com").await;
    engine.top_up_wallet(&alice.id, "BTC", 5).await.unwrap();
    let receipt = engine
        .send_coins(SendCoinsCmd::new(
            &alice.id,
            &alice.email,
            "BTC",
            1,
            "bob@example.com",
        ))
        .await
        .unwrap();

    // Alice tries to mark Bob's notification.
    let err = engine
        .mark_notification_read(&alice.id, receipt.notification.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let inbox = engine.notifications_for_user(&bob.id).await.unwrap();
    assert!(!inbox[0].is_read);
}

#[tokio::test]
async fn mark_read_on_an_unknown_id_is_not_found() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;

    let err = engine
        .mark_notification_read(&alice.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn test_notification_requires_an_existing_user_and_a_message() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;

    let err = engine
        .create_test_notification(&alice.id, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .create_test_notification(&Uuid::new_v4().to_string(), "hello")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let stored = engine
        .create_test_notification(&alice.id, "hello")
        .await
        .unwrap();
    assert_eq!(stored.message, "hello");
    assert!(!stored.is_read);
}
