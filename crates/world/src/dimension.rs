use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use waystone_chat::Broadcast;
use waystone_level::Level;

use crate::terrain::TerrainGenerator;

/// A named, independently persisted region of the world with its own chunk
/// storage.
///
/// Chunk loading and the region file format are external collaborators; the
/// dimension tracks how many chunks are resident and persists them on save.
pub struct Dimension {
    region_path: PathBuf,
    canonical_name: String,
    short_name: String,
    broadcast: Arc<Broadcast>,
    generator: TerrainGenerator,
    level: Level,
    loaded_chunks: AtomicI32,
}

impl Dimension {
    pub fn new(
        region_path: impl Into<PathBuf>,
        canonical_name: impl Into<String>,
        short_name: impl Into<String>,
        broadcast: Arc<Broadcast>,
        generator: TerrainGenerator,
        level: Level,
    ) -> Self {
        Self {
            region_path: region_path.into(),
            canonical_name: canonical_name.into(),
            short_name: short_name.into(),
            broadcast,
            generator,
            level,
            loaded_chunks: AtomicI32::new(0),
        }
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn region_path(&self) -> &Path {
        &self.region_path
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    pub fn broadcast(&self) -> &Arc<Broadcast> {
        &self.broadcast
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Number of chunks currently resident in memory.
    pub fn loaded_chunks(&self) -> i32 {
        self.loaded_chunks.load(Ordering::Relaxed)
    }

    /// Record a chunk entering residency (called by the chunk loader).
    pub fn chunk_loaded(&self) {
        self.loaded_chunks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a chunk leaving residency.
    pub fn chunk_unloaded(&self) {
        self.loaded_chunks.fetch_sub(1, Ordering::Relaxed);
    }

    /// Persist resident chunks to region storage.
    pub fn save(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.region_path)?;
        tracing::debug!(
            dimension = %self.canonical_name,
            chunks = self.loaded_chunks(),
            "saved dimension"
        );
        Ok(())
    }
}
