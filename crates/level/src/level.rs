//! Root persisted world metadata.
//!
//! Layout inside the world root:
//! ```text
//! level.json - format version, world name, seed, time counters
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use waystone_common::ServerConfig;

/// Metadata format version this build reads and writes.
pub const SUPPORTED_VERSION: i32 = 19133;

/// Errors from level metadata operations.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fields persisted in level.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelData {
    pub version: i32,
    pub name: String,
    pub seed: i64,
    pub time: i64,
    pub day_time: i64,
}

/// Root persisted world metadata bound to its on-disk location.
///
/// Opening never creates; a missing or unreadable file is the caller's
/// signal to initialize a fresh world instead.
#[derive(Debug, Clone)]
pub struct Level {
    data: LevelData,
    root: PathBuf,
}

impl Level {
    const FILE_NAME: &'static str = "level.json";

    /// Read existing metadata from the world root.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, LevelError> {
        let root = root.as_ref().to_path_buf();
        let file = std::fs::File::open(root.join(Self::FILE_NAME))?;
        let data: LevelData = serde_json::from_reader(file)?;
        Ok(Self { data, root })
    }

    /// Create fresh metadata at the supported version with zeroed time
    /// counters and persist it immediately.
    pub fn create(
        root: impl AsRef<Path>,
        name: impl Into<String>,
        seed: i64,
    ) -> Result<Self, LevelError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        let level = Self {
            data: LevelData {
                version: SUPPORTED_VERSION,
                name: name.into(),
                seed,
                time: 0,
                day_time: 0,
            },
            root,
        };
        level.save()?;
        tracing::info!(name = %level.data.name, seed, "created fresh level metadata");
        Ok(level)
    }

    /// Rewrite the metadata file with the current in-memory state.
    pub fn save(&self) -> Result<(), LevelError> {
        let file = std::fs::File::create(self.root.join(Self::FILE_NAME))?;
        serde_json::to_writer_pretty(file, &self.data)?;
        Ok(())
    }

    /// Reconcile in-memory metadata against server configuration overrides.
    pub fn refresh(&mut self, config: &ServerConfig) {
        if self.data.name != config.level_name {
            tracing::debug!(
                old = %self.data.name,
                new = %config.level_name,
                "applying configured world name"
            );
            self.data.name = config.level_name.clone();
        }
    }

    /// Store time counters back into the metadata (called at world save).
    pub fn set_time(&mut self, time: i64, day_time: i64) {
        self.data.time = time;
        self.data.day_time = day_time;
    }

    pub fn version(&self) -> i32 {
        self.data.version
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn seed(&self) -> i64 {
        self.data.seed
    }

    pub fn time(&self) -> i64 {
        self.data.time
    }

    pub fn day_time(&self) -> i64 {
        self.data.day_time
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
