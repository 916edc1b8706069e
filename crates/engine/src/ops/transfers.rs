//! The transfer engine: single sends, batch sends, and the received list.
//!
//! A send is four ordered writes (debit, credit, ledger append, notification)
//! wrapped in one database transaction: either all of them land or none do,
//! so a mid-sequence failure can never leave a debited-but-uncredited pair.
//! The real-time push happens after commit and is best effort.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    BatchItemCmd, EngineError, Notification, NotificationEvent, ResultEngine, SendCoinsCmd,
    TransferRecord,
    notifications::{self, KIND_COIN},
    ops::{Engine, users::find_by_email, wallets::upsert_add, with_tx},
    transfers, users,
    util::{normalize_coin, normalize_email},
    wallets,
};

/// Result of a completed single send.
#[derive(Clone, Debug)]
pub struct TransferReceipt {
    pub transfer_id: Uuid,
    /// Sender's balance for the coin after the debit.
    pub sender_balance: i64,
    pub notification: Notification,
}

/// Per-item outcome of a batch send, in input order.
#[derive(Clone, Debug)]
pub struct BatchOutcome {
    pub to_email: String,
    pub coin: String,
    /// `Ok` carries the sender's post-item balance, `Err` the reason.
    pub result: Result<i64, String>,
}

impl Engine {
    /// Moves `cmd.amount` of `cmd.coin` from the sender to the user behind
    /// `cmd.to_email`, appending a ledger record and an unread notification
    /// for the recipient.
    pub async fn send_coins(&self, cmd: SendCoinsCmd) -> ResultEngine<TransferReceipt> {
        let coin = normalize_coin(&cmd.coin);
        let to_email = normalize_email(&cmd.to_email);
        let sender_email = normalize_email(&cmd.sender_email);

        if coin.is_empty() || to_email.is_empty() {
            return Err(EngineError::InvalidInput(
                "coin and recipient email are required".to_string(),
            ));
        }
        if cmd.amount <= 0 {
            return Err(EngineError::InvalidInput(
                "amount must be greater than zero".to_string(),
            ));
        }
        if to_email == sender_email {
            return Err(EngineError::SelfTransfer);
        }

        let sender_id = Uuid::parse_str(&cmd.sender_id)
            .map_err(|_| EngineError::KeyNotFound(cmd.sender_id.clone()))?;

        let (receipt, recipient_id) = with_tx!(self, |db_tx| {
            send_in_tx(&db_tx, sender_id, &coin, cmd.amount, &to_email).await
        })?;

        self.publish(NotificationEvent {
            recipient_id,
            sender_id: Some(sender_id),
            notification: receipt.notification.clone(),
        });

        Ok(receipt)
    }

    /// Processes batch items independently and sequentially: each item runs
    /// the full single-send path in its own transaction, so one failure
    /// neither aborts nor rolls back its neighbors. Every item re-reads the
    /// sender's balance, so repeated sends of the same coin accumulate.
    pub async fn send_coins_batch(
        &self,
        sender_id: &str,
        sender_email: &str,
        items: Vec<BatchItemCmd>,
    ) -> ResultEngine<Vec<BatchOutcome>> {
        if items.is_empty() {
            return Err(EngineError::InvalidInput(
                "at least one item is required".to_string(),
            ));
        }

        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            let result = self
                .send_coins(SendCoinsCmd::new(
                    sender_id,
                    sender_email,
                    &item.coin,
                    item.amount,
                    &item.to_email,
                ))
                .await;

            outcomes.push(BatchOutcome {
                to_email: item.to_email,
                coin: normalize_coin(&item.coin),
                result: match result {
                    Ok(receipt) => Ok(receipt.sender_balance),
                    Err(EngineError::Database(db_err)) => {
                        tracing::error!("batch item failed on storage: {db_err}");
                        Err("internal server error".to_string())
                    }
                    Err(err) => Err(err.to_string()),
                },
            });
        }
        Ok(outcomes)
    }

    /// Ledger entries addressed to `user_id`, newest first.
    pub async fn received_transfers(&self, user_id: &str) -> ResultEngine<Vec<TransferRecord>> {
        let models = transfers::Entity::find()
            .filter(transfers::Column::ToUser.eq(user_id))
            .order_by_desc(transfers::Column::CreatedAt)
            .all(&self.database)
            .await?;

        models.into_iter().map(TransferRecord::try_from).collect()
    }
}

async fn send_in_tx<C: ConnectionTrait>(
    db_tx: &C,
    sender_id: Uuid,
    coin: &str,
    amount: i64,
    to_email: &str,
) -> ResultEngine<(TransferReceipt, Uuid)> {
    let recipient = find_by_email(db_tx, to_email)
        .await?
        .ok_or(EngineError::RecipientNotFound)?;
    let recipient_id = Uuid::parse_str(&recipient.id)
        .map_err(|_| EngineError::KeyNotFound(recipient.id.clone()))?;
    if recipient_id == sender_id {
        return Err(EngineError::SelfTransfer);
    }

    let sender = users::Entity::find_by_id(sender_id.to_string())
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("sender".to_string()))?;

    // Debit. The balance check and the write share the transaction, so a
    // concurrent send cannot sneak between them.
    let sender_wallet = wallets::Entity::find()
        .filter(wallets::Column::UserId.eq(sender_id.to_string()))
        .filter(wallets::Column::Coin.eq(coin))
        .one(db_tx)
        .await?;
    let sender_wallet = match sender_wallet {
        Some(wallet) if wallet.amount >= amount => wallet,
        _ => return Err(EngineError::InsufficientBalance),
    };
    let sender_balance = sender_wallet.amount - amount;
    let debit = wallets::ActiveModel {
        id: ActiveValue::Set(sender_wallet.id.clone()),
        amount: ActiveValue::Set(sender_balance),
        updated_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    };
    debit.update(db_tx).await?;

    // Credit, creating the recipient's record on first receipt of the coin.
    upsert_add(db_tx, recipient_id, coin, amount).await?;

    // Ledger append.
    let record = TransferRecord::new(
        sender_id,
        sender.email.clone(),
        recipient_id,
        recipient.email.clone(),
        coin.to_string(),
        amount,
    )?;
    transfers::ActiveModel::from(&record).insert(db_tx).await?;

    // Unread inbox entry for the recipient.
    let notification = Notification::new(
        recipient_id,
        KIND_COIN,
        format!(
            "You received {amount} {coin} from {}!",
            sender.display_name()
        ),
    )
    .sender(sender_id)
    .emails(sender.email.clone(), recipient.email.clone());
    notifications::ActiveModel::from(&notification)
        .insert(db_tx)
        .await?;

    Ok((
        TransferReceipt {
            transfer_id: record.id,
            sender_balance,
            notification,
        },
        recipient_id,
    ))
}
