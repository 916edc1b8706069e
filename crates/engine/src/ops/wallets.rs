//! Wallet store operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, WalletBalance,
    ops::{Engine, with_tx},
    util::normalize_coin,
    wallets,
};

impl Engine {
    /// All balance records owned by `user_id`, oldest first.
    pub async fn wallets_for_user(&self, user_id: &str) -> ResultEngine<Vec<WalletBalance>> {
        let models = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .order_by_asc(wallets::Column::CreatedAt)
            .all(&self.database)
            .await?;

        models.into_iter().map(WalletBalance::try_from).collect()
    }

    /// Credits `amount` of `coin` to the user, creating the record on first
    /// use. This is the external top-up path; transfers reuse the same
    /// upsert-add primitive for the recipient side.
    pub async fn top_up_wallet(
        &self,
        user_id: &str,
        coin: &str,
        amount: i64,
    ) -> ResultEngine<WalletBalance> {
        let coin = normalize_coin(coin);
        if coin.is_empty() {
            return Err(EngineError::InvalidInput("coin is required".to_string()));
        }
        if amount <= 0 {
            return Err(EngineError::InvalidInput(
                "amount must be greater than zero".to_string(),
            ));
        }
        let owner_id = Uuid::parse_str(user_id)
            .map_err(|_| EngineError::KeyNotFound(user_id.to_string()))?;

        with_tx!(self, |db_tx| {
            upsert_add(&db_tx, owner_id, &coin, amount).await
        })
    }

    /// Removes a balance record the user owns. Foreign or unknown ids both
    /// surface as not-found, matching the user-scoped lookup.
    pub async fn delete_wallet(&self, user_id: &str, wallet_id: Uuid) -> ResultEngine<()> {
        let wallet = wallets::Entity::find_by_id(wallet_id.to_string())
            .filter(wallets::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wallet".to_string()))?;

        wallets::Entity::delete_by_id(wallet.id)
            .exec(&self.database)
            .await?;
        Ok(())
    }
}

/// Adds `delta` to the (owner, coin) record, creating it when missing.
///
/// Atomic per record as long as the caller holds a transaction; the unique
/// (user_id, coin) index backs the one-record-per-pair invariant.
pub(crate) async fn upsert_add<C: ConnectionTrait>(
    db_tx: &C,
    owner_id: Uuid,
    coin: &str,
    delta: i64,
) -> ResultEngine<WalletBalance> {
    let existing = wallets::Entity::find()
        .filter(wallets::Column::UserId.eq(owner_id.to_string()))
        .filter(wallets::Column::Coin.eq(coin))
        .one(db_tx)
        .await?;

    match existing {
        Some(model) => {
            let updated = wallets::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                amount: ActiveValue::Set(model.amount + delta),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            WalletBalance::try_from(updated.update(db_tx).await?)
        }
        None => {
            let balance = WalletBalance::new(owner_id, coin.to_string(), delta);
            wallets::ActiveModel::from(&balance).insert(db_tx).await?;
            Ok(balance)
        }
    }
}
