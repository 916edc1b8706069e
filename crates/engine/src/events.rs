//! Notification-created events.
//!
//! The engine publishes one event per durably stored notification; the
//! delivery subscriber (see [`crate::delivery`]) matches events against the
//! presence registry and pushes them to live sessions. Transfer correctness
//! never depends on a subscriber being attached.

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::Notification;

#[derive(Clone, Debug)]
pub struct NotificationEvent {
    pub recipient_id: Uuid,
    /// Absent for system/test notifications.
    pub sender_id: Option<Uuid>,
    pub notification: Notification,
}

pub type EventSender = mpsc::UnboundedSender<NotificationEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<NotificationEvent>;

pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
