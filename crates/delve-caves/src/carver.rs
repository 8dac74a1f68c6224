//! Tunnel Carver: walks a wandering, radius-varying path through the volume and
//! hollows an ellipsoidal cross-section at each step.
//!
//! A tunnel may fork once into two narrower tunnels, which replace the rest of
//! the parent's path. Forks are queued on an explicit work list instead of
//! recursing; each child owns a private random stream seeded from its parent.

use std::f32::consts::{FRAC_PI_2, PI};
use std::ops::AddAssign;

use delve_voxel::{CHUNK_SIZE, ChunkCoord, VoxelBuffer, VoxelTypeId};
use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::biome::BiomeLookup;
use crate::error::CaveError;
use crate::material::MaterialPolicy;
use crate::params::{CaveParams, LiquidScan};
use crate::seed::{det_cos, det_sin, next_f32};

/// Horizontal reach, in blocks, beyond the chunk center a cross-section may sit.
const REACH_MARGIN: f64 = 16.0;
/// Network walks skip the cross-section on one step in this many.
const SKIP_ONE_IN: i32 = 4;
/// Cross-sections are flattened below this fraction of the vertical radius.
const FLOOR_CUTOFF: f64 = -0.7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WalkKind {
    /// Single step at the middle of the walk, never forks.
    Cavern,
    /// Full walk that may fork once.
    Network,
}

/// Starting state of one walk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarveTask {
    seed: u64,
    position: DVec3,
    radius_scale: f32,
    yaw: f32,
    pitch: f32,
    start_step: i32,
    /// Zero means "derive from the check area".
    step_count: i32,
    vertical_scale: f64,
    kind: WalkKind,
}

impl CarveTask {
    /// A large single-pass cavern centred on `position`.
    pub fn cavern(seed: u64, position: DVec3, radius_scale: f32) -> Self {
        Self {
            seed,
            position,
            radius_scale,
            yaw: 0.0,
            pitch: 0.0,
            start_step: 0,
            step_count: 0,
            vertical_scale: 0.5,
            kind: WalkKind::Cavern,
        }
    }

    /// A branching tunnel starting at `position`.
    pub fn tunnel(seed: u64, position: DVec3, radius_scale: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            seed,
            position,
            radius_scale,
            yaw,
            pitch,
            start_step: 0,
            step_count: 0,
            vertical_scale: 1.0,
            kind: WalkKind::Network,
        }
    }

    /// `true` for single-pass caverns.
    pub fn is_cavern(&self) -> bool {
        self.kind == WalkKind::Cavern
    }
}

/// Counters collected while carving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CarveStats {
    /// Walks processed, roots and fork children alike.
    pub walks: u32,
    /// Walks that were single-pass caverns.
    pub caverns: u32,
    /// Walks that ended in a fork.
    pub forks: u32,
    /// Walks abandoned because they could no longer reach the chunk.
    pub out_of_reach: u32,
    /// Steps whose cross-section was hollowed.
    pub carved_steps: u32,
    /// Steps skipped because liquid was found nearby.
    pub liquid_skips: u32,
    /// Voxels replaced with air.
    pub voxels_carved: u64,
    /// Surface voxels moved down into a freshly carved void.
    pub surface_migrations: u64,
}

impl AddAssign for CarveStats {
    fn add_assign(&mut self, rhs: Self) {
        self.walks += rhs.walks;
        self.caverns += rhs.caverns;
        self.forks += rhs.forks;
        self.out_of_reach += rhs.out_of_reach;
        self.carved_steps += rhs.carved_steps;
        self.liquid_skips += rhs.liquid_skips;
        self.voxels_carved += rhs.voxels_carved;
        self.surface_migrations += rhs.surface_migrations;
    }
}

/// Result of hollowing one step's cross-section.
enum Section {
    Carved,
    Skipped,
    OutOfReach,
}

/// Clamped local bounds of one cross-section.
struct SectionBounds {
    min_x: i32,
    max_x: i32,
    min_z: i32,
    max_z: i32,
    /// Exclusive lower Y.
    bottom: i32,
    /// Inclusive upper Y.
    top: i32,
}

/// Geometry of the current step.
struct Ellipsoid {
    center: DVec3,
    radius: f64,
    vertical_radius: f64,
}

/// Carves walks into one chunk's buffer.
pub struct TunnelCarver<'a> {
    params: &'a CaveParams,
    policy: &'a MaterialPolicy,
}

impl<'a> TunnelCarver<'a> {
    /// Creates a carver. `params` are assumed validated.
    pub fn new(params: &'a CaveParams, policy: &'a MaterialPolicy) -> Self {
        Self { params, policy }
    }

    /// Carves `root` and every fork it spawns into `buffer`.
    ///
    /// Children run depth-first, first child before second, so the result
    /// depends only on the root seed and the buffer's prior contents.
    ///
    /// # Errors
    ///
    /// Returns [`CaveError::Buffer`] if a write escapes the buffer; the buffer
    /// may be partially carved at that point.
    pub fn carve<B, L>(
        &self,
        root: CarveTask,
        buffer: &mut B,
        biomes: &L,
    ) -> Result<CarveStats, CaveError>
    where
        B: VoxelBuffer + ?Sized,
        L: BiomeLookup + ?Sized,
    {
        let mut stats = CarveStats::default();
        let mut pending = vec![root];
        while let Some(task) = pending.pop() {
            stats.walks += 1;
            if task.is_cavern() {
                stats.caverns += 1;
            }
            self.walk(task, buffer, biomes, &mut pending, &mut stats)?;
        }
        Ok(stats)
    }

    fn walk<B, L>(
        &self,
        task: CarveTask,
        buffer: &mut B,
        biomes: &L,
        pending: &mut Vec<CarveTask>,
        stats: &mut CarveStats,
    ) -> Result<(), CaveError>
    where
        B: VoxelBuffer + ?Sized,
        L: BiomeLookup + ?Sized,
    {
        let mut rng = ChaCha8Rng::seed_from_u64(task.seed);

        let mut step_count = task.step_count;
        if step_count <= 0 {
            let longest = self.params.max_walk_length();
            step_count = longest - rng.random_range(0..longest / 4);
        }

        let cavern = task.kind == WalkKind::Cavern;
        let start_step = if cavern {
            step_count / 2
        } else {
            task.start_step
        };

        let branch_step = rng.random_range(0..step_count / 2) + step_count / 4;
        let damping = if rng.random_range(0..6) == 0 { 0.92 } else { 0.7 };

        let radius_scale = task.radius_scale;
        let mut position = task.position;
        let mut yaw = task.yaw;
        let mut pitch = task.pitch;
        let mut yaw_velocity = 0.0_f32;
        let mut pitch_velocity = 0.0_f32;

        for step in start_step..step_count {
            let radius = 1.5
                + f64::from(det_sin(step as f32 * PI / step_count as f32))
                    * f64::from(radius_scale);
            let vertical_radius = radius * task.vertical_scale;

            let horizontal = det_cos(pitch);
            position.x += f64::from(det_cos(yaw) * horizontal);
            position.y += f64::from(det_sin(pitch));
            position.z += f64::from(det_sin(yaw) * horizontal);

            pitch *= damping;
            pitch += pitch_velocity * 0.1;
            yaw += yaw_velocity * 0.1;

            pitch_velocity *= 0.9;
            yaw_velocity *= 0.75;
            pitch_velocity += (next_f32(&mut rng) - next_f32(&mut rng)) * next_f32(&mut rng) * 2.0;
            yaw_velocity += (next_f32(&mut rng) - next_f32(&mut rng)) * next_f32(&mut rng) * 4.0;

            if !cavern && step == branch_step && radius_scale > 1.0 {
                let first_seed = rng.random::<u64>();
                let first_radius = next_f32(&mut rng) * 0.5 + 0.5;
                let second_seed = rng.random::<u64>();
                let second_radius = next_f32(&mut rng) * 0.5 + 0.5;

                let child = |seed, radius_scale, yaw| CarveTask {
                    seed,
                    position,
                    radius_scale,
                    yaw,
                    pitch: pitch / 3.0,
                    start_step: step,
                    step_count,
                    vertical_scale: 1.0,
                    kind: WalkKind::Network,
                };
                // LIFO: the first child is popped first.
                pending.push(child(second_seed, second_radius, yaw + FRAC_PI_2));
                pending.push(child(first_seed, first_radius, yaw - FRAC_PI_2));
                stats.forks += 1;
                return Ok(());
            }

            if !cavern && rng.random_range(0..SKIP_ONE_IN) == 0 {
                continue;
            }

            let section = Ellipsoid {
                center: position,
                radius,
                vertical_radius,
            };
            let remaining = f64::from(step_count - step);
            match self.hollow(&section, radius_scale, remaining, buffer, biomes, stats)? {
                Section::OutOfReach => {
                    stats.out_of_reach += 1;
                    return Ok(());
                }
                Section::Carved => stats.carved_steps += 1,
                Section::Skipped => {}
            }

            if cavern {
                break;
            }
        }

        Ok(())
    }

    /// Runs the reach, bounding-box and liquid checks for one cross-section and
    /// hollows it if they all pass.
    fn hollow<B, L>(
        &self,
        section: &Ellipsoid,
        radius_scale: f32,
        remaining_steps: f64,
        buffer: &mut B,
        biomes: &L,
        stats: &mut CarveStats,
    ) -> Result<Section, CaveError>
    where
        B: VoxelBuffer + ?Sized,
        L: BiomeLookup + ?Sized,
    {
        let coord = buffer.coord();
        let center_x = f64::from(coord.block_x_center());
        let center_z = f64::from(coord.block_z_center());
        let DVec3 { x, z, .. } = section.center;

        let dx = x - center_x;
        let dz = z - center_z;
        let reach = f64::from(radius_scale) + 2.0 + REACH_MARGIN;
        if dx * dx + dz * dz - remaining_steps * remaining_steps > reach * reach {
            return Ok(Section::OutOfReach);
        }

        let slack = REACH_MARGIN + section.radius * 2.0;
        if x < center_x - slack
            || z < center_z - slack
            || x > center_x + slack
            || z > center_z + slack
        {
            return Ok(Section::Skipped);
        }

        let bounds = self.bounds(section, coord);
        if self.liquid_nearby(&bounds, buffer) {
            stats.liquid_skips += 1;
            return Ok(Section::Skipped);
        }

        self.carve_section(section, &bounds, buffer, biomes, stats)?;
        Ok(Section::Carved)
    }

    fn bounds(&self, section: &Ellipsoid, coord: ChunkCoord) -> SectionBounds {
        let DVec3 { x, y, z } = section.center;
        let floor = |v: f64| v.floor() as i32;
        SectionBounds {
            min_x: (floor(x - section.radius) - coord.block_x() - 1).max(0),
            max_x: (floor(x + section.radius) - coord.block_x() + 1).min(CHUNK_SIZE),
            min_z: (floor(z - section.radius) - coord.block_z() - 1).max(0),
            max_z: (floor(z + section.radius) - coord.block_z() + 1).min(CHUNK_SIZE),
            bottom: (floor(y - section.vertical_radius) - 1).max(1),
            top: (floor(y + section.vertical_radius) + 1).min(self.params.world_height_cap - 8),
        }
    }

    /// Liquid guard. In [`LiquidScan::Sampled`] mode interior columns only have
    /// their top and bottom voxels checked.
    fn liquid_nearby<B>(&self, b: &SectionBounds, buffer: &B) -> bool
    where
        B: VoxelBuffer + ?Sized,
    {
        let sampled = self.params.liquid_scan == LiquidScan::Sampled;
        let cap = self.params.world_height_cap;
        for lx in b.min_x..b.max_x {
            for lz in b.min_z..b.max_z {
                let interior = lx != b.min_x
                    && lx != b.max_x - 1
                    && lz != b.min_z
                    && lz != b.max_z - 1;
                let mut ly = b.top + 1;
                while ly >= b.bottom - 1 {
                    if (0..cap).contains(&ly) {
                        if self.policy.is_liquid(buffer.get(lx, ly, lz)) {
                            return true;
                        }
                        if sampled && interior && ly != b.bottom - 1 {
                            ly = b.bottom;
                        }
                    }
                    ly -= 1;
                }
            }
        }
        false
    }

    fn carve_section<B, L>(
        &self,
        section: &Ellipsoid,
        b: &SectionBounds,
        buffer: &mut B,
        biomes: &L,
        stats: &mut CarveStats,
    ) -> Result<(), CaveError>
    where
        B: VoxelBuffer + ?Sized,
        L: BiomeLookup + ?Sized,
    {
        let coord = buffer.coord();
        let (origin_x, origin_z) = (coord.block_x(), coord.block_z());

        for lx in b.min_x..b.max_x {
            let nx = (f64::from(lx + origin_x) + 0.5 - section.center.x) / section.radius;
            for lz in b.min_z..b.max_z {
                let nz = (f64::from(lz + origin_z) + 0.5 - section.center.z) / section.radius;
                if nx * nx + nz * nz >= 1.0 {
                    continue;
                }
                let biome = biomes.biome_at(lx + origin_x, lz + origin_z);

                let mut surface_found = false;
                for ly in (b.bottom + 1..=b.top).rev() {
                    let ny = (f64::from(ly - 1) + 0.5 - section.center.y) / section.vertical_radius;
                    if ny <= FLOOR_CUTOFF || nx * nx + ny * ny + nz * nz >= 1.0 {
                        continue;
                    }

                    let material = buffer.get(lx, ly, lz);
                    let above = buffer.get(lx, ly + 1, lz);
                    if material == biome.surface {
                        surface_found = true;
                    }
                    if !self.policy.is_carveable(material, above, &biome) {
                        continue;
                    }

                    buffer.set(lx, ly, lz, VoxelTypeId::AIR)?;
                    stats.voxels_carved += 1;

                    let below = buffer.get(lx, ly - 1, lz);
                    if surface_found && !self.policy.is_liquid(below) && !self.policy.is_boundary(below)
                    {
                        buffer.set(lx, ly - 1, lz, biome.surface)?;
                        stats.surface_migrations += 1;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::biome::BiomeMaterials;
    use delve_voxel::{ChunkBuffer, StandardMaterials, VoxelTypeRegistry};

    struct World {
        registry: VoxelTypeRegistry,
        m: StandardMaterials,
        biome: BiomeMaterials,
    }

    fn world() -> World {
        let registry = VoxelTypeRegistry::with_standard_materials();
        let m = StandardMaterials::resolve(&registry).unwrap();
        let biome = BiomeMaterials {
            stone: m.stone,
            ground: m.dirt,
            surface: m.grass,
        };
        World { registry, m, biome }
    }

    fn stone_buffer(w: &World) -> ChunkBuffer {
        let mut buffer = ChunkBuffer::new(ChunkCoord::new(0, 0), 128);
        let stone = w.m.stone;
        let bedrock = w.m.bedrock;
        buffer.fill_with(|_, y, _| if y == 0 { bedrock } else { stone });
        buffer
    }

    fn params() -> CaveParams {
        CaveParams {
            world_height_cap: 128,
            ..Default::default()
        }
    }

    #[test]
    fn test_cavern_is_single_walk_without_forks() {
        let w = world();
        let params = params();
        let policy = MaterialPolicy::from_registry(&w.registry);
        let carver = TunnelCarver::new(&params, &policy);
        let mut buffer = stone_buffer(&w);

        let task = CarveTask::cavern(5, DVec3::new(8.0, 40.0, 8.0), 6.0);
        let stats = carver.carve(task, &mut buffer, &w.biome).unwrap();

        assert_eq!(stats.walks, 1);
        assert_eq!(stats.caverns, 1);
        assert_eq!(stats.forks, 0);
        assert!(stats.carved_steps <= 1);
        assert!(stats.voxels_carved > 0, "a cavern at the chunk center must carve");
    }

    #[test]
    fn test_wide_tunnel_forks_into_two_children() {
        let w = world();
        let params = params();
        let policy = MaterialPolicy::from_registry(&w.registry);
        let carver = TunnelCarver::new(&params, &policy);

        // Any walk with radius > 1 that survives to its branch step forks.
        let forked = (0..64).any(|seed| {
            let mut buffer = stone_buffer(&w);
            let task = CarveTask::tunnel(seed, DVec3::new(8.0, 40.0, 8.0), 2.5, 0.3, 0.0);
            let stats = carver.carve(task, &mut buffer, &w.biome).unwrap();
            assert!(stats.forks <= 1, "children never fork again");
            if stats.forks == 1 {
                assert_eq!(stats.walks, 3);
            }
            stats.forks == 1
        });
        assert!(forked);
    }

    #[test]
    fn test_narrow_tunnel_never_forks() {
        let w = world();
        let params = params();
        let policy = MaterialPolicy::from_registry(&w.registry);
        let carver = TunnelCarver::new(&params, &policy);
        for seed in 0..16 {
            let mut buffer = stone_buffer(&w);
            let task = CarveTask::tunnel(seed, DVec3::new(8.0, 40.0, 8.0), 0.9, 1.0, 0.0);
            let stats = carver.carve(task, &mut buffer, &w.biome).unwrap();
            assert_eq!(stats.walks, 1);
            assert_eq!(stats.forks, 0);
        }
    }

    #[test]
    fn test_carving_is_deterministic() {
        let w = world();
        let params = params();
        let policy = MaterialPolicy::from_registry(&w.registry);
        let carver = TunnelCarver::new(&params, &policy);
        let task = CarveTask::tunnel(77, DVec3::new(4.0, 50.0, 12.0), 2.0, 2.0, 0.05);

        let mut a = stone_buffer(&w);
        let mut b = stone_buffer(&w);
        let stats_a = carver.carve(task, &mut a, &w.biome).unwrap();
        let stats_b = carver.carve(task, &mut b, &w.biome).unwrap();
        assert_eq!(stats_a, stats_b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_writes_stay_in_home_chunk_and_vertical_range() {
        let w = world();
        let params = params();
        let policy = MaterialPolicy::from_registry(&w.registry);
        let carver = TunnelCarver::new(&params, &policy);
        let mut buffer = stone_buffer(&w);
        let before = buffer.clone();

        for seed in 0..8 {
            let task = CarveTask::tunnel(seed, DVec3::new(8.0, 20.0, 8.0), 2.8, seed as f32, -0.1);
            carver.carve(task, &mut buffer, &w.biome).unwrap();
        }

        for y in 0..128 {
            for z in -16..32 {
                for x in -16..32 {
                    if buffer.get(x, y, z) != before.get(x, y, z) {
                        assert!((0..16).contains(&x) && (0..16).contains(&z), "({x},{y},{z})");
                        assert!((1..=120).contains(&y), "({x},{y},{z})");
                    }
                }
            }
        }
    }

    #[test]
    fn test_walk_far_from_chunk_is_abandoned() {
        let w = world();
        let params = params();
        let policy = MaterialPolicy::from_registry(&w.registry);
        let carver = TunnelCarver::new(&params, &policy);
        let mut buffer = stone_buffer(&w);
        let before = buffer.clone();

        let task = CarveTask::tunnel(1, DVec3::new(2000.0, 40.0, 2000.0), 2.0, 0.0, 0.0);
        let stats = carver.carve(task, &mut buffer, &w.biome).unwrap();

        assert_eq!(stats.voxels_carved, 0);
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_liquid_blocks_cross_section() {
        let w = world();
        let params = params();
        let policy = MaterialPolicy::from_registry(&w.registry);
        let carver = TunnelCarver::new(&params, &policy);
        let mut buffer = ChunkBuffer::new(ChunkCoord::new(0, 0), 128);
        let (stone, water) = (w.m.stone, w.m.water);
        buffer.fill_with(|_, y, _| if y >= 30 && y < 50 { water } else { stone });
        let before = buffer.clone();

        let task = CarveTask::cavern(3, DVec3::new(8.0, 40.0, 8.0), 6.0);
        let stats = carver.carve(task, &mut buffer, &w.biome).unwrap();

        assert_eq!(stats.liquid_skips, 1);
        assert_eq!(stats.voxels_carved, 0);
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_exhaustive_scan_finds_interior_pocket() {
        let w = world();
        let policy = MaterialPolicy::from_registry(&w.registry);
        let mut buffer = stone_buffer(&w);
        buffer.set(8, 40, 8, w.m.water).unwrap();

        let bounds = SectionBounds {
            min_x: 4,
            max_x: 12,
            min_z: 4,
            max_z: 12,
            bottom: 35,
            top: 45,
        };

        let sampled = params();
        let carver = TunnelCarver::new(&sampled, &policy);
        assert!(!carver.liquid_nearby(&bounds, &buffer), "sampled scan skips the interior");

        let exhaustive = CaveParams {
            liquid_scan: LiquidScan::Exhaustive,
            ..params()
        };
        let carver = TunnelCarver::new(&exhaustive, &policy);
        assert!(carver.liquid_nearby(&bounds, &buffer));
    }

    #[test]
    fn test_sampled_scan_checks_edges_fully() {
        let w = world();
        let params = params();
        let policy = MaterialPolicy::from_registry(&w.registry);
        let carver = TunnelCarver::new(&params, &policy);
        let mut buffer = stone_buffer(&w);
        buffer.set(4, 40, 8, w.m.water).unwrap();

        let bounds = SectionBounds {
            min_x: 4,
            max_x: 12,
            min_z: 4,
            max_z: 12,
            bottom: 35,
            top: 45,
        };
        assert!(carver.liquid_nearby(&bounds, &buffer));
    }

    #[test]
    fn test_sampled_scan_checks_interior_top_and_bottom() {
        let w = world();
        let params = params();
        let policy = MaterialPolicy::from_registry(&w.registry);
        let carver = TunnelCarver::new(&params, &policy);
        let bounds = SectionBounds {
            min_x: 4,
            max_x: 12,
            min_z: 4,
            max_z: 12,
            bottom: 35,
            top: 45,
        };

        for y in [46, 34] {
            let mut buffer = stone_buffer(&w);
            buffer.set(8, y, 8, w.m.water).unwrap();
            assert!(carver.liquid_nearby(&bounds, &buffer), "y={y}");
        }
    }

    #[test]
    fn test_surface_migrates_to_cave_floor() {
        let w = world();
        let params = params();
        let policy = MaterialPolicy::from_registry(&w.registry);
        let carver = TunnelCarver::new(&params, &policy);
        let (stone, dirt, grass, bedrock) = (w.m.stone, w.m.dirt, w.m.grass, w.m.bedrock);

        // Grass at y = 42 sits inside the cavern's upper half.
        let mut buffer = ChunkBuffer::new(ChunkCoord::new(0, 0), 128);
        buffer.fill_with(|_, y, _| match y {
            0 => bedrock,
            1..=39 => stone,
            40..=41 => dirt,
            42 => grass,
            _ => VoxelTypeId::AIR,
        });

        let task = CarveTask::cavern(11, DVec3::new(8.0, 40.0, 8.0), 6.0);
        let stats = carver.carve(task, &mut buffer, &w.biome).unwrap();
        assert!(stats.voxels_carved > 0);
        assert!(stats.surface_migrations > 0);

        // Every column that lost its grass has grass again directly under its void.
        for x in 0..16 {
            for z in 0..16 {
                if buffer.get(x, 42, z) == VoxelTypeId::AIR {
                    let floor = (1..42)
                        .rev()
                        .find(|&y| buffer.get(x, y, z) != VoxelTypeId::AIR)
                        .unwrap();
                    assert_eq!(buffer.get(x, floor, z), grass, "column ({x}, {z})");
                }
            }
        }
    }

    #[test]
    fn test_bedrock_and_placed_blocks_survive() {
        let w = world();
        let params = params();
        let policy = MaterialPolicy::from_registry(&w.registry);
        let carver = TunnelCarver::new(&params, &policy);
        let (planks, bedrock) = (w.m.planks, w.m.bedrock);

        let mut buffer = ChunkBuffer::new(ChunkCoord::new(0, 0), 128);
        buffer.fill_with(|_, y, _| if y < 4 { bedrock } else { planks });
        let before = buffer.clone();

        let task = CarveTask::cavern(2, DVec3::new(8.0, 6.0, 8.0), 6.0);
        let stats = carver.carve(task, &mut buffer, &w.biome).unwrap();
        assert_eq!(stats.voxels_carved, 0);
        assert_eq!(buffer, before);
    }

    /// Six-connected components among the air voxels of the home chunk between y 20 and 42.
    fn air_components(buffer: &ChunkBuffer) -> usize {
        let mut air: HashSet<(i32, i32, i32)> = HashSet::new();
        for y in 20..42 {
            for z in 0..16 {
                for x in 0..16 {
                    if buffer.get(x, y, z) == VoxelTypeId::AIR {
                        air.insert((x, y, z));
                    }
                }
            }
        }

        let mut components = 0;
        while let Some(&start) = air.iter().next() {
            air.remove(&start);
            components += 1;
            let mut stack = vec![start];
            while let Some((x, y, z)) = stack.pop() {
                for n in [
                    (x + 1, y, z),
                    (x - 1, y, z),
                    (x, y + 1, z),
                    (x, y - 1, z),
                    (x, y, z + 1),
                    (x, y, z - 1),
                ] {
                    if air.remove(&n) {
                        stack.push(n);
                    }
                }
            }
        }
        components
    }

    #[test]
    fn test_narrowest_sections_join_across_one_skipped_step() {
        use std::f64::consts::{FRAC_PI_4, PI as PI_64};

        let w = world();
        let params = params();
        let policy = MaterialPolicy::from_registry(&w.registry);
        let carver = TunnelCarver::new(&params, &policy);
        let pristine = stone_buffer(&w);
        let offsets = [
            DVec3::ZERO,
            DVec3::new(0.25, 0.5, 0.75),
            DVec3::new(0.9, 0.1, 0.3),
        ];

        // Steps are one block long, so two carved steps with a single skip between
        // them are at most two blocks apart. Two skips in a row can split a walk.
        for (gap, joins) in [(1.0, true), (2.0, true), (4.0, false)] {
            for i in 0..8 {
                for j in 0..7 {
                    for offset in offsets {
                        let yaw = f64::from(i) * FRAC_PI_4;
                        let pitch = (f64::from(j) / 6.0 - 0.5) * PI_64 * 0.98;
                        let first = DVec3::new(8.0, 30.0, 8.0) + offset;
                        let heading = DVec3::new(
                            yaw.cos() * pitch.cos(),
                            pitch.sin(),
                            yaw.sin() * pitch.cos(),
                        );
                        let second = first + heading * gap;

                        let mut buffer = pristine.clone();
                        let mut stats = CarveStats::default();
                        for center in [first, second] {
                            let section = Ellipsoid {
                                center,
                                radius: 1.5,
                                vertical_radius: 1.5,
                            };
                            let bounds = carver.bounds(&section, buffer.coord());
                            carver
                                .carve_section(&section, &bounds, &mut buffer, &w.biome, &mut stats)
                                .unwrap();
                        }

                        assert_eq!(
                            air_components(&buffer) == 1,
                            joins,
                            "gap {gap}, yaw {yaw:.2}, pitch {pitch:.2}, offset {offset}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_stats_accumulate() {
        let mut total = CarveStats::default();
        total += CarveStats {
            walks: 2,
            voxels_carved: 10,
            ..Default::default()
        };
        total += CarveStats {
            walks: 1,
            forks: 1,
            ..Default::default()
        };
        assert_eq!(total.walks, 3);
        assert_eq!(total.forks, 1);
        assert_eq!(total.voxels_carved, 10);
    }
}
