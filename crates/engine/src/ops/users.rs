//! Account directory operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    ops::Engine,
    users,
    util::normalize_email,
};

impl Engine {
    /// Creates an account, storing the email in normalized form, and issues
    /// an initial bearer token.
    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ResultEngine<users::Model> {
        let name = name.trim();
        let email = normalize_email(email);
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(EngineError::InvalidInput(
                "name, email and password are required".to_string(),
            ));
        }

        if find_by_email(&self.database, &email).await?.is_some() {
            return Err(EngineError::ExistingKey(email));
        }

        let user = users::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            name: ActiveValue::Set(name.to_string()),
            email: ActiveValue::Set(email),
            password: ActiveValue::Set(password.to_string()),
            token: ActiveValue::Set(Some(Uuid::new_v4().to_string())),
            created_at: ActiveValue::Set(Utc::now()),
        };
        Ok(users::Entity::insert(user)
            .exec_with_returning(&self.database)
            .await?)
    }

    /// Checks credentials and rotates the user's bearer token.
    pub async fn login(&self, email: &str, password: &str) -> ResultEngine<users::Model> {
        let email = normalize_email(email);
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(&email))
            .filter(users::Column::Password.eq(password))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::Forbidden("invalid credentials".to_string()))?;

        let mut user: users::ActiveModel = user.into();
        user.token = ActiveValue::Set(Some(Uuid::new_v4().to_string()));
        Ok(user.update(&self.database).await?)
    }

    /// Resolves the user a bearer token belongs to. Used by the HTTP auth
    /// middleware and the WebSocket handshake.
    pub async fn user_by_token(&self, token: &str) -> ResultEngine<Option<users::Model>> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(users::Entity::find()
            .filter(users::Column::Token.eq(token))
            .one(&self.database)
            .await?)
    }

    pub async fn user_by_id(&self, user_id: &str) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user".to_string()))
    }

    /// Case-insensitive existence check for the verify-recipient endpoint.
    pub async fn verify_email_exists(&self, email: &str) -> ResultEngine<bool> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Ok(false);
        }
        Ok(find_by_email(&self.database, &email).await?.is_some())
    }
}

/// Equality lookup; `email` must already be normalized.
pub(crate) async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
}
