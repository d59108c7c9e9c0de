/// Seed-bound handle to the terrain generation collaborator.
///
/// Noise, biome placement, and chunk shaping live outside this core; a
/// dimension only needs a generator carrying the world seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainGenerator {
    seed: i64,
}

impl TerrainGenerator {
    pub fn new(seed: i64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }
}
