//! Transfer ledger primitives.
//!
//! A `TransferRecord` is one completed coin movement between two users.
//! Records are append-only: created exactly once per successful transfer and
//! never updated, so the email snapshots stay valid even if an account is
//! later renamed.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: Uuid,
    pub from: Uuid,
    pub from_email: String,
    pub to: Uuid,
    pub to_email: String,
    pub coin: String,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

impl TransferRecord {
    pub fn new(
        from: Uuid,
        from_email: String,
        to: Uuid,
        to_email: String,
        coin: String,
        amount: i64,
    ) -> ResultEngine<Self> {
        if amount <= 0 {
            return Err(EngineError::InvalidInput(
                "amount must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            from,
            from_email,
            to,
            to_email,
            coin,
            amount,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub from_user: String,
    pub from_email: String,
    pub to_user: String,
    pub to_email: String,
    pub coin: String,
    pub amount: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&TransferRecord> for ActiveModel {
    fn from(record: &TransferRecord) -> Self {
        Self {
            id: ActiveValue::Set(record.id.to_string()),
            from_user: ActiveValue::Set(record.from.to_string()),
            from_email: ActiveValue::Set(record.from_email.clone()),
            to_user: ActiveValue::Set(record.to.to_string()),
            to_email: ActiveValue::Set(record.to_email.clone()),
            coin: ActiveValue::Set(record.coin.clone()),
            amount: ActiveValue::Set(record.amount),
            created_at: ActiveValue::Set(record.created_at),
        }
    }
}

impl TryFrom<Model> for TransferRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::KeyNotFound(model.id.clone()))?;
        let from = Uuid::parse_str(&model.from_user)
            .map_err(|_| EngineError::KeyNotFound(model.from_user.clone()))?;
        let to = Uuid::parse_str(&model.to_user)
            .map_err(|_| EngineError::KeyNotFound(model.to_user.clone()))?;
        Ok(Self {
            id,
            from,
            from_email: model.from_email,
            to,
            to_email: model.to_email,
            coin: model.coin,
            amount: model.amount,
            created_at: model.created_at,
        })
    }
}
