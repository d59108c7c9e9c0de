//! World lifecycle: persisted metadata ownership, the dimension registry,
//! exclusive on-disk locking, and atomic time counters.
//!
//! # Invariants
//! - A constructed world always has the canonical overworld registered.
//! - Time counters move backwards only under explicit administrative sets.
//! - Construction yields a fully initialized world or an error, never a
//!   partial object.

pub mod dimension;
pub mod terrain;
pub mod world;

pub use dimension::Dimension;
pub use terrain::TerrainGenerator;
pub use world::{World, WorldError, OVERWORLD};
