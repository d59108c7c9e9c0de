use serde::{Deserialize, Serialize};

/// The slice of server configuration this core consumes.
///
/// Loading and validating the operator's full configuration file is the
/// launcher's job; the core only reads these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// World root directory.
    pub level_name: String,
    /// Seed handed to the terrain generator when initializing a fresh world.
    pub seed: i64,
    /// Whether player chat is delivered at all.
    pub enable_chat: bool,
    /// Whether signed messages must flow through the secure chat path.
    pub enforce_secure_profile: bool,
    /// Custom system-chat format, if the operator configured one.
    /// Applying the format is owned by an external formatter.
    pub system_chat_format: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            level_name: "world".into(),
            seed: 0,
            enable_chat: true,
            enforce_secure_profile: true,
            system_chat_format: None,
        }
    }
}
