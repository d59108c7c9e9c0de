use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use waystone_common::{Identity, SessionId, TextComponent};

use crate::session::{ChatMessage, PreviousMessage, Session};

/// Channel identifier tagged onto player and disguised chat.
pub const CHAT_CHANNEL: &str = "minecraft:chat";

/// Bound on the previous-message history.
pub const HISTORY_CAP: usize = 20;

#[derive(Default)]
struct SessionSets {
    sessions: HashMap<SessionId, Arc<dyn Session>>,
    dummies: HashMap<SessionId, Arc<dyn Session>>,
}

/// Fans chat events out to every connected session and dummy listener, and
/// owns the bounded previous-message history.
///
/// Two independent locks guard the state: a reader-writer lock over the
/// session sets (read during fan-out, written on join/leave) and an
/// exclusive lock over the history. A single merged lock would serialize
/// disguised/system broadcasts against history bookkeeping.
///
/// Created once at server startup and lives for the process.
#[derive(Default)]
pub struct Broadcast {
    sets: RwLock<SessionSets>,
    previous_messages: Mutex<Vec<PreviousMessage>>,
}

impl Broadcast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a network session under its id. Insert-or-overwrite.
    pub fn add_session(&self, id: SessionId, session: Arc<dyn Session>) {
        self.sets.write().sessions.insert(id, session);
    }

    /// Remove a network session, returning it if it was registered.
    pub fn remove_session(&self, id: SessionId) -> Option<Arc<dyn Session>> {
        self.sets.write().sessions.remove(&id)
    }

    /// Register an in-process dummy listener under its id.
    pub fn add_dummy(&self, id: SessionId, session: Arc<dyn Session>) {
        self.sets.write().dummies.insert(id, session);
    }

    /// Remove a dummy listener, returning it if it was registered.
    pub fn remove_dummy(&self, id: SessionId) -> Option<Arc<dyn Session>> {
        self.sets.write().dummies.remove(&id)
    }

    /// Number of registered network sessions.
    pub fn session_count(&self) -> usize {
        self.sets.read().sessions.len()
    }

    /// Current history, newest first.
    pub fn previous_messages(&self) -> Vec<PreviousMessage> {
        self.previous_messages.lock().clone()
    }

    /// Deliver a signed chat message to every recipient and record it in
    /// the history.
    ///
    /// `index` is the sender-scoped monotonic sequence number supplied by
    /// the protocol layer; it is not re-validated here. The session-set
    /// read lock and the history lock are both held for the whole call so
    /// the snapshot handed to every recipient reflects the history before
    /// this message's own append. Delivery is always considered attempted;
    /// there is no error result.
    pub fn secure_chat_message(&self, sender: &Identity, message: &ChatMessage, index: i32) {
        let sets = self.sets.read();
        let mut history = self.previous_messages.lock();

        for session in sets.sessions.values() {
            session.player_chat_message(message, sender, CHAT_CHANNEL, index, &history);
        }
        for dummy in sets.dummies.values() {
            dummy.player_chat_message(message, sender, CHAT_CHANNEL, index, &history);
        }

        // History freezes once full: no rotation, no eviction. Rotating ids
        // would invalidate signature chains already anchored to them.
        if history.len() < HISTORY_CAP {
            let message_id = history.len() as i32;
            history.insert(0, PreviousMessage { message_id });
        }

        tracing::trace!(sender = %sender.name, index, history_len = history.len(), "secure chat fan-out");
    }

    /// Deliver rendered text tagged with the chat channel and the sender's
    /// identity. Never touches history.
    pub fn disguised_chat_message(&self, sender: &Identity, content: &TextComponent) {
        let sets = self.sets.read();

        for session in sets.sessions.values() {
            session.disguised_chat_message(content, sender, CHAT_CHANNEL);
        }
        for dummy in sets.dummies.values() {
            dummy.disguised_chat_message(content, sender, CHAT_CHANNEL);
        }
    }

    /// Deliver server text with no sender identity and no channel tag.
    pub fn system_chat_message(&self, content: &TextComponent) {
        let sets = self.sets.read();

        for session in sets.sessions.values() {
            session.system_message(content);
        }
        for dummy in sets.dummies.values() {
            dummy.system_message(content);
        }
    }
}
