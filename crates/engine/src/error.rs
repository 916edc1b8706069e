//! The module contains the errors the engine can throw.
//!
//! Validation and business-rule failures ([`InvalidInput`], [`SelfTransfer`],
//! [`RecipientNotFound`], [`InsufficientBalance`]) are always detected before
//! any mutation, so they never leave partial state behind.
//!
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`SelfTransfer`]: EngineError::SelfTransfer
//!  [`RecipientNotFound`]: EngineError::RecipientNotFound
//!  [`InsufficientBalance`]: EngineError::InsufficientBalance
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("You cannot send to yourself")]
    SelfTransfer,
    #[error("Recipient not found")]
    RecipientNotFound,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("\"{0}\" not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::SelfTransfer, Self::SelfTransfer) => true,
            (Self::RecipientNotFound, Self::RecipientNotFound) => true,
            (Self::InsufficientBalance, Self::InsufficientBalance) => true,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
