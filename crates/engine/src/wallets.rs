//! The module contains the `WalletBalance` struct and its entity.
//!
//! A wallet balance is the quantity of one coin symbol held by one user.
//! There is exactly one record per (owner, coin) pair; the record is created
//! on first credit and mutated in place afterwards.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalance {
    /// Stable identifier, generated once and persisted.
    pub id: Uuid,
    pub owner_id: Uuid,
    pub coin: String,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

impl WalletBalance {
    pub fn new(owner_id: Uuid, coin: String, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            coin,
            amount,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub coin: String,
    pub amount: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&WalletBalance> for ActiveModel {
    fn from(value: &WalletBalance) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.owner_id.to_string()),
            coin: ActiveValue::Set(value.coin.clone()),
            amount: ActiveValue::Set(value.amount),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for WalletBalance {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::KeyNotFound(model.id.clone()))?;
        let owner_id = Uuid::parse_str(&model.user_id)
            .map_err(|_| EngineError::KeyNotFound(model.user_id.clone()))?;
        Ok(Self {
            id,
            owner_id,
            coin: model.coin,
            amount: model.amount,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_the_entity_model() {
        let balance = WalletBalance::new(Uuid::new_v4(), "BTC".to_string(), 10);
        let active = ActiveModel::from(&balance);

        let model = Model {
            id: active.id.clone().unwrap(),
            user_id: active.user_id.clone().unwrap(),
            coin: active.coin.clone().unwrap(),
            amount: active.amount.clone().unwrap(),
            created_at: active.created_at.clone().unwrap(),
            updated_at: active.updated_at.clone().unwrap(),
        };

        assert_eq!(WalletBalance::try_from(model).unwrap(), balance);
    }

    #[test]
    fn rejects_a_malformed_id() {
        let model = Model {
            id: "not-a-uuid".to_string(),
            user_id: Uuid::new_v4().to_string(),
            coin: "BTC".to_string(),
            amount: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(matches!(
            WalletBalance::try_from(model),
            Err(EngineError::KeyNotFound(_))
        ));
    }
}
