use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a connected participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Sender identity carried on chat events and deliveries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: SessionId,
    pub name: String,
}

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            name: name.into(),
        }
    }
}

/// Minimal rendered text payload.
///
/// Component styling and rendering belong to the protocol layer; this core
/// only ever constructs plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextComponent {
    pub text: String,
}

impl TextComponent {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Namespace applied to bare resource names.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Prefix a bare name with the default namespace.
/// Names already carrying a namespace pass through unchanged.
pub fn namespaced(name: &str) -> String {
    if name.contains(':') {
        name.to_string()
    } else {
        format!("{DEFAULT_NAMESPACE}:{name}")
    }
}
