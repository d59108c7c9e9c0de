use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use waystone_chat::Broadcast;
use waystone_common::{namespaced, ServerConfig};
use waystone_level::{Level, LevelError, LockError, SessionLock, SUPPORTED_VERSION};

use crate::dimension::Dimension;
use crate::terrain::TerrainGenerator;

/// Canonical name of the dimension every world registers at construction.
pub const OVERWORLD: &str = "minecraft:overworld";

/// Errors that abort world construction or teardown.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("world format {found} is older than supported {supported}, no migration available")]
    TooOld { found: i32, supported: i32 },
    #[error("world format {found} is newer than supported {supported}")]
    TooNew { found: i32, supported: i32 },
    #[error("failed to obtain session.lock: {0}")]
    Lock(#[from] LockError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The authoritative world state: persisted level metadata, the dimension
/// registry, the exclusive session lock, and atomic time counters.
///
/// Constructed once at startup; torn down by [`World::save`], which must run
/// before process exit or the on-disk lock goes stale.
pub struct World {
    level: Level,
    dimensions: RwLock<HashMap<String, Arc<Dimension>>>,
    broadcast: Arc<Broadcast>,
    lock: SessionLock,
    path: PathBuf,
    world_age: AtomicI64,
    day_time: AtomicI64,
}

impl World {
    /// Open an existing world at the configured path, or initialize a fresh
    /// one when no readable level metadata exists.
    ///
    /// Ordered and aborting on first failure: metadata, version gate,
    /// session lock, time counters, overworld registration, config
    /// reconciliation. No partial world is ever returned.
    pub fn open(config: &ServerConfig) -> Result<Self, WorldError> {
        let path = PathBuf::from(&config.level_name);

        let mut level = match Level::open(&path) {
            Ok(level) => level,
            Err(err) => {
                tracing::info!(
                    path = %path.display(),
                    %err,
                    "no readable level metadata, initializing fresh world"
                );
                Self::prepare_level(&path, config)?
            }
        };

        if level.version() < SUPPORTED_VERSION {
            return Err(WorldError::TooOld {
                found: level.version(),
                supported: SUPPORTED_VERSION,
            });
        }
        if level.version() > SUPPORTED_VERSION {
            return Err(WorldError::TooNew {
                found: level.version(),
                supported: SUPPORTED_VERSION,
            });
        }

        let lock = SessionLock::acquire(&path)?;

        let world_age = AtomicI64::new(level.time());
        let day_time = AtomicI64::new(level.day_time());

        let broadcast = Arc::new(Broadcast::new());
        let generator = TerrainGenerator::new(level.seed());

        let overworld = Dimension::new(
            path.join("region"),
            OVERWORLD,
            OVERWORLD,
            broadcast.clone(),
            generator,
            level.clone(),
        );
        let mut dimensions = HashMap::new();
        dimensions.insert(OVERWORLD.to_string(), Arc::new(overworld));

        level.refresh(config);

        tracing::info!(name = %level.name(), seed = level.seed(), "opened world");

        Ok(Self {
            level,
            dimensions: RwLock::new(dimensions),
            broadcast,
            lock,
            path,
            world_age,
            day_time,
        })
    }

    /// Create fresh level metadata and the on-disk world skeleton.
    fn prepare_level(path: &Path, config: &ServerConfig) -> Result<Level, WorldError> {
        let level = Level::create(path, &config.level_name, config.seed)?;

        std::fs::create_dir_all(path.join("playerdata"))?;
        std::fs::create_dir_all(path.join("region"))?;
        std::fs::create_dir_all(path.join("poi"))?;
        std::fs::create_dir_all(path.join("entities"))?;

        // Region subfolders for the two built-in alternate dimensions.
        std::fs::create_dir_all(path.join("DIM-1").join("region"))?;
        std::fs::create_dir_all(path.join("DIM1").join("region"))?;

        Ok(level)
    }

    /// Look up a dimension, prefixing the default namespace on bare names.
    /// Never auto-creates.
    pub fn dimension(&self, name: &str) -> Option<Arc<Dimension>> {
        let name = namespaced(name);
        self.dimensions.read().get(&name).cloned()
    }

    /// Insert-or-overwrite a dimension under a name; last write wins.
    /// Callers serialize registrations against concurrent lookups.
    pub fn register_dimension(&self, name: impl Into<String>, dim: Arc<Dimension>) {
        self.dimensions.write().insert(name.into(), dim);
    }

    /// Advance both time counters by one tick and return the post-increment
    /// values. Driven once per tick by the tick loop; safe under concurrent
    /// callers.
    pub fn increment_time(&self) -> (i64, i64) {
        let world_age = self.world_age.fetch_add(1, Ordering::SeqCst) + 1;
        let day_time = self.day_time.fetch_add(1, Ordering::SeqCst) + 1;
        (world_age, day_time)
    }

    /// Independent atomic reads of (world age, day time); not a joint
    /// snapshot.
    pub fn time(&self) -> (i64, i64) {
        (
            self.world_age.load(Ordering::SeqCst),
            self.day_time.load(Ordering::SeqCst),
        )
    }

    /// Administrative day-time shift. No range validation.
    pub fn daytime_add(&self, delta: i64) {
        self.day_time.fetch_add(delta, Ordering::SeqCst);
    }

    /// Administrative day-time override. No range validation.
    pub fn daytime_set(&self, v: i64) {
        self.day_time.store(v, Ordering::SeqCst);
    }

    /// Administrative world-age override. No range validation.
    pub fn world_age_set(&self, v: i64) {
        self.world_age.store(v, Ordering::SeqCst);
    }

    /// Sum of loaded-chunk counts across all registered dimensions; not a
    /// consistent cross-dimension snapshot.
    pub fn loaded_chunks(&self) -> i32 {
        self.dimensions
            .read()
            .values()
            .map(|dim| dim.loaded_chunks())
            .sum()
    }

    /// The broadcast shared with every dimension and the session layer.
    pub fn broadcast(&self) -> &Arc<Broadcast> {
        &self.broadcast
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn seed(&self) -> i64 {
        self.level.seed()
    }

    pub fn name(&self) -> &str {
        self.level.name()
    }

    /// Persist every registered dimension and the level metadata, then
    /// release the session lock. The single release point: a world that is
    /// never saved leaves a stale lock blocking future opens.
    pub fn save(mut self) -> Result<(), WorldError> {
        for dim in self.dimensions.read().values() {
            dim.save()?;
        }

        let (world_age, day_time) = self.time();
        self.level.set_time(world_age, day_time);
        self.level.save()?;

        self.lock.release()?;
        tracing::info!("closed world");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_at(path: &Path) -> ServerConfig {
        ServerConfig {
            level_name: path.to_str().unwrap().to_string(),
            seed: 9001,
            ..ServerConfig::default()
        }
    }

    fn write_level_with_version(path: &Path, version: i32) {
        std::fs::create_dir_all(path).unwrap();
        let data = serde_json::json!({
            "version": version,
            "name": "world",
            "seed": 1,
            "time": 0,
            "day_time": 0,
        });
        std::fs::write(path.join("level.json"), data.to_string()).unwrap();
    }

    #[test]
    fn fresh_world_creates_skeleton() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("world");
        let world = World::open(&config_at(&root)).unwrap();

        for sub in ["playerdata", "region", "poi", "entities"] {
            assert!(root.join(sub).is_dir(), "missing {sub}");
        }
        assert!(root.join("DIM-1").join("region").is_dir());
        assert!(root.join("DIM1").join("region").is_dir());
        assert!(root.join("session.lock").is_file());
        assert_eq!(world.seed(), 9001);
    }

    #[test]
    fn overworld_registered_under_canonical_name() {
        let tmp = tempdir().unwrap();
        let world = World::open(&config_at(&tmp.path().join("world"))).unwrap();

        let bare = world.dimension("overworld").unwrap();
        let qualified = world.dimension("minecraft:overworld").unwrap();
        assert!(Arc::ptr_eq(&bare, &qualified));
        assert_eq!(bare.canonical_name(), OVERWORLD);
    }

    #[test]
    fn unknown_dimension_is_not_created() {
        let tmp = tempdir().unwrap();
        let world = World::open(&config_at(&tmp.path().join("world"))).unwrap();
        assert!(world.dimension("the_nether").is_none());
    }

    #[test]
    fn register_dimension_last_write_wins() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("world");
        let world = World::open(&config_at(&root)).unwrap();

        let first = Arc::new(Dimension::new(
            root.join("DIM-1").join("region"),
            "minecraft:the_nether",
            "minecraft:the_nether",
            world.broadcast().clone(),
            TerrainGenerator::new(world.seed()),
            world.dimension("overworld").unwrap().level().clone(),
        ));
        let second = Arc::new(Dimension::new(
            root.join("DIM-1").join("region"),
            "minecraft:the_nether",
            "minecraft:the_nether",
            world.broadcast().clone(),
            TerrainGenerator::new(world.seed()),
            world.dimension("overworld").unwrap().level().clone(),
        ));

        world.register_dimension("minecraft:the_nether", first);
        world.register_dimension("minecraft:the_nether", second.clone());

        let resolved = world.dimension("the_nether").unwrap();
        assert!(Arc::ptr_eq(&resolved, &second));
    }

    #[test]
    fn too_new_world_fails_without_mutation() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("world");
        write_level_with_version(&root, SUPPORTED_VERSION + 1);

        match World::open(&config_at(&root)) {
            Err(WorldError::TooNew { found, supported }) => {
                assert_eq!(found, SUPPORTED_VERSION + 1);
                assert_eq!(supported, SUPPORTED_VERSION);
            }
            other => panic!("expected TooNew, got {:?}", other.err()),
        }
        assert!(!root.join("region").exists());
        assert!(!root.join("session.lock").exists());
    }

    #[test]
    fn too_old_world_fails_without_mutation() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("world");
        write_level_with_version(&root, SUPPORTED_VERSION - 1);

        assert!(matches!(
            World::open(&config_at(&root)),
            Err(WorldError::TooOld { .. })
        ));
        assert!(!root.join("region").exists());
        assert!(!root.join("session.lock").exists());
    }

    #[test]
    fn second_open_fails_at_lock_acquisition() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("world");
        let config = config_at(&root);

        let first = World::open(&config).unwrap();
        assert!(matches!(World::open(&config), Err(WorldError::Lock(_))));

        first.save().unwrap();
        assert!(World::open(&config).is_ok());
    }

    #[test]
    fn save_persists_time_counters() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("world");
        let config = config_at(&root);

        let world = World::open(&config).unwrap();
        for _ in 0..50 {
            world.increment_time();
        }
        world.save().unwrap();

        let reopened = World::open(&config).unwrap();
        assert_eq!(reopened.time(), (50, 50));
        reopened.save().unwrap();
    }

    #[test]
    fn increment_time_returns_post_increment_values() {
        let tmp = tempdir().unwrap();
        let world = World::open(&config_at(&tmp.path().join("world"))).unwrap();

        assert_eq!(world.increment_time(), (1, 1));
        assert_eq!(world.increment_time(), (2, 2));
        assert_eq!(world.time(), (2, 2));
    }

    #[test]
    fn concurrent_increments_are_exact() {
        let tmp = tempdir().unwrap();
        let world = Arc::new(World::open(&config_at(&tmp.path().join("world"))).unwrap());

        const THREADS: usize = 8;
        const PER_THREAD: usize = 1000;

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let world = world.clone();
                std::thread::spawn(move || {
                    for _ in 0..PER_THREAD {
                        world.increment_time();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let expected = (THREADS * PER_THREAD) as i64;
        assert_eq!(world.time(), (expected, expected));
    }

    #[test]
    fn daytime_set_wins_over_prior_increments() {
        let tmp = tempdir().unwrap();
        let world = Arc::new(World::open(&config_at(&tmp.path().join("world"))).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let world = world.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        world.increment_time();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        world.daytime_set(1000);
        let (_, day_time) = world.time();
        assert_eq!(day_time, 1000);
    }

    #[test]
    fn daytime_add_shifts_only_day_time() {
        let tmp = tempdir().unwrap();
        let world = World::open(&config_at(&tmp.path().join("world"))).unwrap();

        world.increment_time();
        world.daytime_add(100);
        world.world_age_set(7);
        assert_eq!(world.time(), (7, 101));
    }

    #[test]
    fn loaded_chunks_sums_across_dimensions() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("world");
        let world = World::open(&config_at(&root)).unwrap();

        let overworld = world.dimension("overworld").unwrap();
        overworld.chunk_loaded();
        overworld.chunk_loaded();

        let nether = Arc::new(Dimension::new(
            root.join("DIM-1").join("region"),
            "minecraft:the_nether",
            "minecraft:the_nether",
            world.broadcast().clone(),
            TerrainGenerator::new(world.seed()),
            overworld.level().clone(),
        ));
        nether.chunk_loaded();
        world.register_dimension("minecraft:the_nether", nether);

        assert_eq!(world.loaded_chunks(), 3);
    }

    #[test]
    fn refresh_applies_configured_name_on_open() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("world");
        let config = config_at(&root);

        World::open(&config).unwrap().save().unwrap();

        // The configured level name is the path here, so a reopened world
        // reports the same reconciled name.
        let world = World::open(&config).unwrap();
        assert_eq!(world.name(), config.level_name);
    }
}
