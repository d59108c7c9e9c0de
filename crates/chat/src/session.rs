use waystone_common::{Identity, TextComponent};

/// A chat payload as received from the protocol layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub body: String,
    /// Whether the protocol layer verified a signature on this message.
    pub has_signature: bool,
}

impl ChatMessage {
    pub fn signed(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            has_signature: true,
        }
    }

    pub fn unsigned(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            has_signature: false,
        }
    }
}

/// History record handed to every recipient for signature-chain validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviousMessage {
    pub message_id: i32,
}

/// A live participant able to receive push messages.
///
/// Deliveries run sequentially under the broadcast locks, so a stalled
/// recipient delays every other recipient: implementations must not block.
/// Network sessions queue outgoing packets and return immediately; dummy
/// sessions are in-process listeners receiving the same events.
pub trait Session: Send + Sync {
    /// Signed player chat, with the history snapshot taken before this
    /// message was appended.
    fn player_chat_message(
        &self,
        message: &ChatMessage,
        sender: &Identity,
        channel: &str,
        index: i32,
        previous: &[PreviousMessage],
    );

    /// Rendered text attributed to a sender on a channel, outside the
    /// signature chain.
    fn disguised_chat_message(&self, content: &TextComponent, sender: &Identity, channel: &str);

    /// Server-originated text with no sender and no channel tag.
    fn system_message(&self, content: &TextComponent);
}
