use waystone_common::{Identity, ServerConfig, TextComponent};

use crate::broadcast::Broadcast;
use crate::session::ChatMessage;

/// An incoming chat event from the protocol layer.
#[derive(Debug, Clone)]
pub struct ChatMessageEvent {
    pub sender: Identity,
    pub message: ChatMessage,
    /// Sender-scoped monotonic sequence index, validated upstream.
    pub index: i32,
}

/// Decide which broadcast operation handles an incoming chat event.
///
/// First match wins:
/// 1. chat disabled: suppress, zero deliveries
/// 2. secure profile enforced and the message is signed: secure chat
/// 3. no custom system-chat format: plain text via disguised chat
/// 4. custom format with an unsigned message: no delivery here; applying
///    the format is owned by an external formatter
///
/// Every branch reports the event handled.
pub fn route_chat_message(
    event: &ChatMessageEvent,
    config: &ServerConfig,
    broadcast: &Broadcast,
) -> bool {
    if !config.enable_chat {
        tracing::debug!(sender = %event.sender.name, "chat disabled, suppressing message");
        return true;
    }
    if config.enforce_secure_profile && event.message.has_signature {
        broadcast.secure_chat_message(&event.sender, &event.message, event.index);
        return true;
    }
    if config.system_chat_format.is_none() {
        let content = TextComponent::plain(event.message.body.clone());
        broadcast.disguised_chat_message(&event.sender, &content);
        return true;
    }
    true
}
