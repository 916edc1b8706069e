use engine::{BatchItemCmd, Engine, EngineError, SendCoinsCmd, event_channel};
use migration::MigratorTrait;
use sea_orm::Database;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build()
}

async fn register(engine: &Engine, name: &str, email: &str) -> engine::users::Model {
    engine.register_user(name, email, "password").await.unwrap()
}

async fn balance(engine: &Engine, user_id: &str, coin: &str) -> Option<i64> {
    engine
        .wallets_for_user(user_id)
        .await
        .unwrap()
        .into_iter()
        .find(|w| w.coin == coin)
        .map(|w| w.amount)
}

#[tokio::test]
async fn send_conserves_balance_and_appends_ledger_and_notification() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    let bob = register(&engine, "Bob", "bob@example.com").await;
    engine.top_up_wallet(&alice.id, "BTC", 10).await.unwrap();
    engine.top_up_wallet(&bob.id, "BTC", 3).await.unwrap();

    let receipt = engine
        .send_coins(SendCoinsCmd::new(
            &alice.id,
            &alice.email,
            "BTC",
            4,
            "bob@example.com",
        ))
        .await
        .unwrap();

    assert_eq!(receipt.sender_balance, 6);
    assert_eq!(balance(&engine, &alice.id, "BTC").await, Some(6));
    assert_eq!(balance(&engine, &bob.id, "BTC").await, Some(7));

    let received = engine.received_transfers(&bob.id).await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].amount, 4);
    assert_eq!(received[0].from_email, "alice@example.com");
    assert_eq!(received[0].to_email, "bob@example.com");

    let inbox = engine.notifications_for_user(&bob.id).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert!(!inbox[0].is_read);
    assert!(inbox[0].message.contains("4 BTC"));
    assert!(inbox[0].message.contains("Alice"));
}

#[tokio::test]
async fn first_credit_creates_the_recipient_wallet() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    let bob = register(&engine, "Bob", "bob@example.com").await;
    engine.top_up_wallet(&alice.id, "BTC", 10).await.unwrap();

    engine
        .send_coins(SendCoinsCmd::new(
            &alice.id,
            &alice.email,
            "BTC",
            1,
            "bob@example.com",
        ))
        .await
        .unwrap();

    assert_eq!(balance(&engine, &alice.id, "BTC").await, Some(9));
    assert_eq!(balance(&engine, &bob.id, "BTC").await, Some(1));
    assert_eq!(engine.received_transfers(&bob.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_recipient_is_rejected_without_mutation() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    engine.top_up_wallet(&alice.id, "BTC", 10).await.unwrap();

    let err = engine
        .send_coins(SendCoinsCmd::new(
            &alice.id,
            &alice.email,
            "BTC",
            1,
            "ghost@example.com",
        ))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::RecipientNotFound);
    assert_eq!(balance(&engine, &alice.id, "BTC").await, Some(10));
}

#[tokio::test]
async fn self_transfer_is_rejected_case_insensitively() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    engine.top_up_wallet(&alice.id, "BTC", 10).await.unwrap();

    let err = engine
        .send_coins(SendCoinsCmd::new(
            &alice.id,
            &alice.email,
            "BTC",
            1,
            "  ALICE@Example.COM ",
        ))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::SelfTransfer);
    assert_eq!(balance(&engine, &alice.id, "BTC").await, Some(10));
}

#[tokio::test]
async fn non_positive_amount_is_rejected() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    let _bob = register(&engine, "Bob", "bob@example.com").await;
    engine.top_up_wallet(&alice.id, "BTC", 10).await.unwrap();

    for amount in [0, -3] {
        let err = engine
            .send_coins(SendCoinsCmd::new(
                &alice.id,
                &alice.email,
                "BTC",
                amount,
                "bob@example.com",
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }
    assert_eq!(balance(&engine, &alice.id, "BTC").await, Some(10));
}

#[tokio::test]
async fn insufficient_balance_leaves_both_parties_untouched() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    let bob = register(&engine, "Bob", "bob@example.com").await;
    engine.top_up_wallet(&alice.id, "BTC", 1).await.unwrap();

    let err = engine
        .send_coins(SendCoinsCmd::new(
            &alice.id,
            &alice.email,
            "BTC",
            2,
            "bob@example.com",
        ))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::InsufficientBalance);
    assert_eq!(balance(&engine, &alice.id, "BTC").await, Some(1));
    assert_eq!(balance(&engine, &bob.id, "BTC").await, None);
    assert!(engine.received_transfers(&bob.id).await.unwrap().is_empty());

    // A coin the sender never held behaves the same way.
    let err = engine
        .send_coins(SendCoinsCmd::new(
            &alice.id,
            &alice.email,
            "ETH",
            1,
            "bob@example.com",
        ))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::InsufficientBalance);
}

#[tokio::test]
async fn batch_items_fail_independently_and_debits_accumulate() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    let bob = register(&engine, "Bob", "bob@example.com").await;
    engine.top_up_wallet(&alice.id, "BTC", 10).await.unwrap();

    let outcomes = engine
        .send_coins_batch(
            &alice.id,
            &alice.email,
            vec![
                BatchItemCmd::new("bob@example.com", "BTC", 1),
                BatchItemCmd::new("bob@example.com", "ETH", -1),
                BatchItemCmd::new("bob@example.com", "BTC", 1),
            ],
        )
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 3);
    // Each successful item re-reads the balance, so the debits accumulate.
    assert_eq!(outcomes[0].result, Ok(9));
    assert!(outcomes[1].result.is_err());
    assert_eq!(outcomes[2].result, Ok(8));

    assert_eq!(balance(&engine, &alice.id, "BTC").await, Some(8));
    assert_eq!(balance(&engine, &bob.id, "BTC").await, Some(2));
    assert_eq!(engine.received_transfers(&bob.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn empty_batch_is_rejected() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;

    let err = engine
        .send_coins_batch(&alice.id, &alice.email, Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn received_transfers_are_newest_first() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    let bob = register(&engine, "Bob", "bob@example.com").await;
    engine.top_up_wallet(&alice.id, "BTC", 10).await.unwrap();

    for amount in [1, 2, 3] {
        engine
            .send_coins(SendCoinsCmd::new(
                &alice.id,
                &alice.email,
                "BTC",
                amount,
                "bob@example.com",
            ))
            .await
            .unwrap();
    }

    let received = engine.received_transfers(&bob.id).await.unwrap();
    assert_eq!(received.len(), 3);
    let mut sorted = received.clone();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    assert_eq!(received, sorted);
}

#[tokio::test]
async fn successful_send_publishes_a_delivery_event() {
    let (events, mut rx) = event_channel();
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).events(events).build();

    let alice = register(&engine, "Alice", "alice@example.com").await;
    let bob = register(&engine, "Bob", "bob@example.com").await;
    engine.top_up_wallet(&alice.id, "BTC", 10).await.unwrap();

    engine
        .send_coins(SendCoinsCmd::new(
            &alice.id,
            &alice.email,
            "BTC",
            1,
            "bob@example.com",
        ))
        .await
        .unwrap();

    let event = rx.try_recv().unwrap();
    assert_eq!(event.recipient_id.to_string(), bob.id);
    assert_eq!(event.sender_id.map(|id| id.to_string()), Some(alice.id));
    assert!(!event.notification.is_read);
    assert!(rx.try_recv().is_err());
}
