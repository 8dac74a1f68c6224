//! Flat layered test terrain: a plains world with a desert stripe and a lake.

use delve_caves::{BiomeLookup, BiomeMaterials};
use delve_voxel::{ChunkBuffer, ChunkCoord, StandardMaterials, VoxelTypeId};

/// Top solid layer.
pub const SURFACE_Y: i32 = 63;
/// Layers of ground material under the surface.
const GROUND_DEPTH: i32 = 3;
/// Desert occupies world X in `DESERT_MIN_X..DESERT_MAX_X`.
const DESERT_MIN_X: i32 = 32;
const DESERT_MAX_X: i32 = 64;
/// Lake centre (world X, Z), radius and depth.
const LAKE_CENTER: (i32, i32) = (-24, -24);
const LAKE_RADIUS: i32 = 14;
const LAKE_DEPTH: i32 = 6;

/// Materials and biome layout of the test world.
#[derive(Clone, Copy, Debug)]
pub struct TestTerrain {
    m: StandardMaterials,
    plains: BiomeMaterials,
    desert: BiomeMaterials,
}

impl TestTerrain {
    pub fn new(m: StandardMaterials) -> Self {
        Self {
            m,
            plains: BiomeMaterials {
                stone: m.stone,
                ground: m.dirt,
                surface: m.grass,
            },
            desert: BiomeMaterials {
                stone: m.stone,
                ground: m.sandstone,
                surface: m.sand,
            },
        }
    }

    fn in_lake(world_x: i32, world_z: i32) -> bool {
        let dx = world_x - LAKE_CENTER.0;
        let dz = world_z - LAKE_CENTER.1;
        dx * dx + dz * dz < LAKE_RADIUS * LAKE_RADIUS
    }

    /// Material of one world voxel before carving.
    pub fn voxel_at(&self, world_x: i32, y: i32, world_z: i32) -> VoxelTypeId {
        let biome = self.biome_at(world_x, world_z);
        if y == 0 {
            return self.m.bedrock;
        }
        if Self::in_lake(world_x, world_z) && y > SURFACE_Y - LAKE_DEPTH {
            return if y <= SURFACE_Y {
                self.m.water
            } else {
                VoxelTypeId::AIR
            };
        }
        match y {
            y if y < SURFACE_Y - GROUND_DEPTH => biome.stone,
            y if y < SURFACE_Y => biome.ground,
            SURFACE_Y => biome.surface,
            _ => VoxelTypeId::AIR,
        }
    }

    /// A filled buffer for `coord`.
    pub fn chunk(&self, coord: ChunkCoord, height: u32) -> ChunkBuffer {
        let mut buffer = ChunkBuffer::new(coord, height);
        buffer.fill_with(|x, y, z| self.voxel_at(x, y, z));
        buffer
    }

    /// Single-character rendering of a voxel for the ASCII slice.
    pub fn glyph(&self, voxel: VoxelTypeId) -> char {
        let m = &self.m;
        match voxel {
            VoxelTypeId::AIR => ' ',
            v if v == m.water => '~',
            v if v == m.bedrock => '=',
            v if v == m.grass || v == m.sand => '"',
            v if v == m.dirt || v == m.sandstone => ':',
            _ => '#',
        }
    }
}

impl BiomeLookup for TestTerrain {
    fn biome_at(&self, world_x: i32, _world_z: i32) -> BiomeMaterials {
        if (DESERT_MIN_X..DESERT_MAX_X).contains(&world_x) {
            self.desert
        } else {
            self.plains
        }
    }
}
