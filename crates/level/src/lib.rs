//! Persisted level metadata and the exclusive world session lock.
//!
//! # Invariants
//! - Metadata is only ever created at the supported format version.
//! - At most one live lock handle exists per world directory.

pub mod level;
pub mod lock;

pub use level::{Level, LevelData, LevelError, SUPPORTED_VERSION};
pub use lock::{LockError, SessionLock, LOCK_PAYLOAD};
