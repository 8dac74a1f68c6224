//! Deterministic seeded generation utilities.
//!
//! Provides per-chunk RNG derivation from a world seed and chunk coordinate,
//! the biased nested sampler used for cave counts, and deterministic trig via
//! `libm` so that a seed carves the same caves on every platform.

use delve_voxel::ChunkCoord;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// Seed derivation
// ---------------------------------------------------------------------------

/// Mixes chunk coordinates into a world seed.
///
/// Two odd multipliers are drawn once from the world seed's own stream, so
/// neighbouring chunks get uncorrelated seeds while every chunk's seed stays a
/// pure function of `(world_seed, coord)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkSeeder {
    world_seed: u64,
    x_mul: u64,
    z_mul: u64,
}

impl ChunkSeeder {
    /// Prepares the multipliers for `world_seed`.
    pub fn new(world_seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(world_seed);
        let x_mul = rng.random::<u64>() | 1;
        let z_mul = rng.random::<u64>() | 1;
        Self {
            world_seed,
            x_mul,
            z_mul,
        }
    }

    /// The world seed this seeder mixes into.
    pub fn world_seed(&self) -> u64 {
        self.world_seed
    }

    /// Seed of the random stream that plans caves starting in `coord`.
    pub fn seed_for(&self, coord: ChunkCoord) -> u64 {
        let x = (coord.x as i64 as u64).wrapping_mul(self.x_mul);
        let z = (coord.z as i64 as u64).wrapping_mul(self.z_mul);
        x ^ z ^ self.world_seed
    }

    /// Random stream that plans caves starting in `coord`.
    pub fn rng_for(&self, coord: ChunkCoord) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed_for(coord))
    }
}

/// Derive a u64 seed for a chunk from the world seed and chunk coordinate.
pub fn derive_chunk_seed(world_seed: u64, coord: ChunkCoord) -> u64 {
    ChunkSeeder::new(world_seed).seed_for(coord)
}

/// Derive a deterministic RNG for a specific chunk.
///
/// The returned RNG will produce an identical sequence of random numbers
/// for the same `(world_seed, coord)` pair, regardless of thread or platform.
pub fn chunk_rng(world_seed: u64, coord: ChunkCoord) -> ChaCha8Rng {
    ChunkSeeder::new(world_seed).rng_for(coord)
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// Biased integer in `0..bound`: `depth` chained bounded draws, each bounded by
/// the previous draw plus one.
///
/// With `depth == 3` most results are 0 or 1 and large values are rare. `bound`
/// must be positive.
pub fn nested_int<R: Rng + ?Sized>(rng: &mut R, bound: i32, depth: u32) -> i32 {
    debug_assert!(bound > 0, "nested_int bound must be positive");
    let mut value = rng.random_range(0..bound);
    for _ in 1..depth {
        value = rng.random_range(0..value + 1);
    }
    value
}

/// Uniform integer in `min..=max`. `min` must not exceed `max`.
pub fn number_in_range<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    debug_assert!(min <= max, "number_in_range called with min > max");
    rng.random_range(min..=max)
}

/// Uniform float in `[0, 1)`.
#[inline]
pub fn next_f32<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>()
}

// ---------------------------------------------------------------------------
// Deterministic math (libm)
// ---------------------------------------------------------------------------

/// Deterministic single-precision sine using libm (not platform libc).
#[inline]
pub fn det_sin(x: f32) -> f32 {
    libm::sinf(x)
}

/// Deterministic single-precision cosine using libm.
#[inline]
pub fn det_cos(x: f32) -> f32 {
    libm::cosf(x)
}
