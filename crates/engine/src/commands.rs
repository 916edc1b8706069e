//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

/// Send coins from one user to another, addressed by email.
#[derive(Clone, Debug)]
pub struct SendCoinsCmd {
    pub sender_id: String,
    pub sender_email: String,
    pub coin: String,
    pub amount: i64,
    pub to_email: String,
}

impl SendCoinsCmd {
    #[must_use]
    pub fn new(
        sender_id: impl Into<String>,
        sender_email: impl Into<String>,
        coin: impl Into<String>,
        amount: i64,
        to_email: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            sender_email: sender_email.into(),
            coin: coin.into(),
            amount,
            to_email: to_email.into(),
        }
    }
}

/// One item of a batch send. The sender is shared by the whole batch.
#[derive(Clone, Debug)]
pub struct BatchItemCmd {
    pub to_email: String,
    pub coin: String,
    pub amount: i64,
}

impl BatchItemCmd {
    #[must_use]
    pub fn new(to_email: impl Into<String>, coin: impl Into<String>, amount: i64) -> Self {
        Self {
            to_email: to_email.into(),
            coin: coin.into(),
            amount,
        }
    }
}
