//! Shared types for the waystone server core: participant identity,
//! minimal text payloads, resource-name namespacing, and the slice of
//! server configuration the core consumes.

pub mod config;
pub mod types;

pub use config::ServerConfig;
pub use types::{namespaced, Identity, SessionId, TextComponent, DEFAULT_NAMESPACE};
