use sea_orm::DatabaseConnection;

use crate::{EventSender, NotificationEvent};

mod notifications;
pub(crate) mod transfers;
mod users;
mod wallets;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    events: Option<EventSender>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Hands a committed notification to the delivery subscriber.
    ///
    /// Best effort only: with no subscriber attached (tests, CLI tooling)
    /// the notification stays pull-only.
    pub(crate) fn publish(&self, event: NotificationEvent) {
        let Some(events) = &self.events else {
            return;
        };
        if events.send(event).is_err() {
            tracing::debug!("delivery subscriber gone, notification stays pull-only");
        }
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    events: Option<EventSender>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Attach the channel the delivery subscriber listens on.
    pub fn events(mut self, events: EventSender) -> EngineBuilder {
        self.events = Some(events);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
            events: self.events,
        }
    }
}
