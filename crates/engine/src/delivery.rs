//! Best-effort real-time delivery.
//!
//! A single subscriber drains [`NotificationEvent`]s and matches them
//! against the presence registry. Delivery is at most once per open session
//! and never fails the transfer that produced the event: an offline
//! recipient simply pulls the notification from the store later.

use std::sync::Arc;

use crate::{EventReceiver, NotificationEvent, PresenceRegistry};

/// Runs until the event channel closes (i.e. the engine is dropped).
pub async fn run(mut events: EventReceiver, presence: Arc<PresenceRegistry>) {
    while let Some(event) = events.recv().await {
        dispatch(&presence, &event);
    }
    tracing::debug!("notification event channel closed, delivery subscriber stopping");
}

/// Pushes one event to every eligible live session of the recipient.
///
/// A session is skipped when it is also registered under the sender (a
/// handle must not serve both parties) or when its authenticated identity
/// does not match the recipient. Returns the number of sessions reached.
pub fn dispatch(presence: &PresenceRegistry, event: &NotificationEvent) -> usize {
    let sessions = presence.sessions_for(event.recipient_id);
    if sessions.is_empty() {
        tracing::debug!(
            recipient = %event.recipient_id,
            "recipient not connected, skipping real-time push"
        );
        return 0;
    }

    let sender_sessions = event
        .sender_id
        .map(|id| presence.session_ids_for(id))
        .unwrap_or_default();

    let mut delivered = 0;
    for handle in sessions {
        if sender_sessions.contains(&handle.id) {
            tracing::warn!(session = %handle.id, "session registered for both parties, skipping");
            continue;
        }
        if let Some(identity) = handle.identity {
            if identity != event.recipient_id {
                tracing::warn!(
                    session = %handle.id,
                    identity = %identity,
                    recipient = %event.recipient_id,
                    "session identity mismatch, skipping"
                );
                continue;
            }
        }
        match handle.push(event.notification.clone()) {
            Ok(()) => delivered += 1,
            Err(err) => {
                tracing::warn!(session = %handle.id, "failed to push notification: {err}");
            }
        }
    }
    delivered
}
