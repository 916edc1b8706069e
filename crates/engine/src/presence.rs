//! Process-wide registry of live real-time sessions.
//!
//! The connection layer adds a session on connect and removes it on
//! disconnect; the delivery subscriber only reads. A session handle lives in
//! at most one user's set, keyed by the authenticated handshake identity.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::Notification;

pub type SessionId = Uuid;

/// A live real-time session for one connection.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    pub id: SessionId,
    /// Identity the transport authenticated at handshake, if any.
    pub identity: Option<Uuid>,
    sender: mpsc::UnboundedSender<Notification>,
}

impl SessionHandle {
    /// Creates a handle and the receiving end the connection task drains.
    pub fn new(identity: Option<Uuid>) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                id: Uuid::new_v4(),
                identity,
                sender,
            },
            receiver,
        )
    }

    pub fn push(
        &self,
        notification: Notification,
    ) -> Result<(), mpsc::error::SendError<Notification>> {
        self.sender.send(notification)
    }
}

#[derive(Debug, Default)]
pub struct PresenceRegistry {
    inner: RwLock<HashMap<Uuid, HashMap<SessionId, SessionHandle>>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, user_id: Uuid, handle: SessionHandle) {
        let mut map = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        map.entry(user_id).or_default().insert(handle.id, handle);
    }

    /// Removes a session, pruning the user's set when it becomes empty.
    pub fn unregister(&self, user_id: Uuid, session_id: SessionId) {
        let mut map = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(sessions) = map.get_mut(&user_id) {
            sessions.remove(&session_id);
            if sessions.is_empty() {
                map.remove(&user_id);
            }
        }
    }

    pub fn sessions_for(&self, user_id: Uuid) -> Vec<SessionHandle> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(&user_id)
            .map(|sessions| sessions.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn session_ids_for(&self, user_id: Uuid) -> HashSet<SessionId> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(&user_id)
            .map(|sessions| sessions.keys().copied().collect())
            .unwrap_or_default()
    }

    /// All users with at least one open session, with their session ids.
    pub fn connected_users(&self) -> Vec<(Uuid, Vec<SessionId>)> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.iter()
            .map(|(user_id, sessions)| (*user_id, sessions.keys().copied().collect()))
            .collect()
    }

    /// Every open session with the identity it authenticated as.
    pub fn sessions(&self) -> Vec<(SessionId, Option<Uuid>)> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.values()
            .flat_map(|sessions| {
                sessions
                    .values()
                    .map(|handle| (handle.id, handle.identity))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let registry = PresenceRegistry::new();
        let user = Uuid::new_v4();
        let (handle, _rx) = SessionHandle::new(Some(user));
        let session_id = handle.id;

        registry.register(user, handle);
        assert_eq!(registry.sessions_for(user).len(), 1);
        assert!(registry.session_ids_for(user).contains(&session_id));
    }

    #[test]
    fn unregister_prunes_empty_sets() {
        let registry = PresenceRegistry::new();
        let user = Uuid::new_v4();
        let (handle, _rx) = SessionHandle::new(Some(user));
        let session_id = handle.id;

        registry.register(user, handle);
        registry.unregister(user, session_id);

        assert!(registry.sessions_for(user).is_empty());
        assert!(registry.connected_users().is_empty());
    }

    #[test]
    fn unknown_user_has_no_sessions() {
        let registry = PresenceRegistry::new();
        assert!(registry.sessions_for(Uuid::new_v4()).is_empty());
    }
}
