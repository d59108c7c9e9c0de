//! Chat broadcast fan-out and routing for the waystone server core.
//!
//! # Invariants
//! - Message history never exceeds 20 entries and freezes once full.
//! - History appends are strictly ordered by the exclusive history lock.
//! - Session sets and history are guarded by independent locks.

pub mod broadcast;
pub mod router;
pub mod session;

pub use broadcast::{Broadcast, CHAT_CHANNEL, HISTORY_CAP};
pub use router::{route_chat_message, ChatMessageEvent};
pub use session::{ChatMessage, PreviousMessage, Session};
