//! Per-chunk cave generation driver.
//!
//! A tunnel may start several chunks away and still cross the chunk being
//! generated. Every chunk therefore replays the plans of all source chunks in
//! its check area and carves whatever part of each walk falls inside it.

use std::ops::AddAssign;

use delve_voxel::{ChunkCoord, VoxelBuffer, VoxelTypeRegistry};
use tracing::instrument;

use crate::biome::BiomeLookup;
use crate::carver::{CarveStats, TunnelCarver};
use crate::error::CaveError;
use crate::material::MaterialPolicy;
use crate::params::CaveParams;
use crate::planner::plan_caves;
use crate::seed::ChunkSeeder;

/// Summary of one [`CaveGenerator::generate`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaveStats {
    /// Source chunks whose plans were replayed.
    pub source_chunks: u32,
    /// Root carves planned across all source chunks.
    pub requests: u32,
    /// Counters from the carver.
    pub carve: CarveStats,
}

impl AddAssign for CaveStats {
    fn add_assign(&mut self, rhs: Self) {
        self.source_chunks += rhs.source_chunks;
        self.requests += rhs.requests;
        self.carve += rhs.carve;
    }
}

/// Carves caves into chunk buffers for one world.
///
/// Holds validated parameters, the world's chunk seeder and the material
/// policy. Immutable after construction, so one generator can be shared by
/// many worker threads.
#[derive(Clone, Debug)]
pub struct CaveGenerator {
    params: CaveParams,
    seeder: ChunkSeeder,
    policy: MaterialPolicy,
}

impl CaveGenerator {
    /// Validates `params` and prepares generation for `world_seed`.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::InvalidParams`] if validation fails.
    pub fn new(
        params: CaveParams,
        world_seed: u64,
        registry: &VoxelTypeRegistry,
    ) -> Result<Self, CaveError> {
        params.validate()?;
        Ok(Self {
            params,
            seeder: ChunkSeeder::new(world_seed),
            policy: MaterialPolicy::from_registry(registry),
        })
    }

    /// The validated parameters.
    pub fn params(&self) -> &CaveParams {
        &self.params
    }

    /// The world seed.
    pub fn world_seed(&self) -> u64 {
        self.seeder.world_seed()
    }

    /// The material policy snapshotted at construction.
    pub fn policy(&self) -> &MaterialPolicy {
        &self.policy
    }

    /// Carves every cave that reaches `buffer`'s chunk.
    ///
    /// Source chunks are visited row-major, x outer, from `-r` to `r` where `r`
    /// is `check_area_size`. Disabled parameters return immediately and leave
    /// the buffer untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::BufferTooShort`] before any write if the buffer is
    /// lower than the height cap, or [`CaveError::Buffer`] if a write escapes
    /// the buffer.
    #[instrument(skip_all, fields(chunk = %buffer.coord()))]
    pub fn generate<B, L>(&self, buffer: &mut B, biomes: &L) -> Result<CaveStats, CaveError>
    where
        B: VoxelBuffer + ?Sized,
        L: BiomeLookup + ?Sized,
    {
        if self.params.is_disabled() {
            tracing::trace!("caves disabled");
            return Ok(CaveStats::default());
        }

        if buffer.height() < self.params.world_height_cap {
            let err = CaveError::BufferTooShort {
                height: buffer.height(),
                required: self.params.world_height_cap,
            };
            tracing::error!("{err}");
            return Err(err);
        }

        match self.carve_area(buffer, biomes) {
            Ok(stats) => {
                tracing::debug!(
                    "carved {} voxels from {} walks ({} forks, {} liquid skips)",
                    stats.carve.voxels_carved,
                    stats.carve.walks,
                    stats.carve.forks,
                    stats.carve.liquid_skips,
                );
                Ok(stats)
            }
            Err(err) => {
                tracing::error!("cave generation failed: {err}");
                Err(err)
            }
        }
    }

    fn carve_area<B, L>(&self, buffer: &mut B, biomes: &L) -> Result<CaveStats, CaveError>
    where
        B: VoxelBuffer + ?Sized,
        L: BiomeLookup + ?Sized,
    {
        let coord = buffer.coord();
        let carver = TunnelCarver::new(&self.params, &self.policy);
        let radius = self.params.check_area_size;

        let mut stats = CaveStats::default();
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let source = coord.offset(dx, dz);
                let mut rng = self.seeder.rng_for(source);
                let requests = plan_caves(source, &self.params, &mut rng);

                stats.source_chunks += 1;
                stats.requests += requests.len() as u32;
                for request in requests {
                    stats.carve += carver.carve(request.into_task(), buffer, biomes)?;
                }
            }
        }
        Ok(stats)
    }
}

/// Carves caves into `buffer` for chunk `coord` of the world `world_seed`.
///
/// One-shot form of [`CaveGenerator::generate`]. Hosts generating many chunks
/// should build a [`CaveGenerator`] once instead.
///
/// # Errors
///
/// Returns [`CaveError::CoordMismatch`] if `buffer` belongs to another chunk,
/// otherwise any error from [`CaveGenerator::new`] or
/// [`CaveGenerator::generate`].
pub fn generate<B, L>(
    coord: ChunkCoord,
    buffer: &mut B,
    params: &CaveParams,
    world_seed: u64,
    registry: &VoxelTypeRegistry,
    biomes: &L,
) -> Result<CaveStats, CaveError>
where
    B: VoxelBuffer + ?Sized,
    L: BiomeLookup + ?Sized,
{
    if buffer.coord() != coord {
        return Err(CaveError::CoordMismatch {
            requested: coord,
            buffer: buffer.coord(),
        });
    }
    CaveGenerator::new(params.clone(), world_seed, registry)?.generate(buffer, biomes)
}
