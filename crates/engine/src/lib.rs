pub use commands::{BatchItemCmd, SendCoinsCmd};
pub use error::EngineError;
pub use events::{EventReceiver, EventSender, NotificationEvent, event_channel};
pub use notifications::Notification;
pub use ops::{Engine, EngineBuilder};
pub use ops::transfers::{BatchOutcome, TransferReceipt};
pub use presence::{PresenceRegistry, SessionHandle, SessionId};
pub use transfers::TransferRecord;
pub use wallets::WalletBalance;

mod commands;
pub mod delivery;
mod error;
mod events;
pub mod notifications;
mod ops;
mod presence;
pub mod transfers;
pub mod users;
mod util;
pub mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
