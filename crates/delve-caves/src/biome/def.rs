//! Biome definition: the materials a biome's terrain is built from.

use delve_voxel::VoxelTypeId;

/// Materials the Material Policy treats as natural terrain in a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BiomeMaterials {
    /// Bulk rock (e.g. stone).
    pub stone: VoxelTypeId,
    /// Layers immediately below the surface (e.g. dirt, sand).
    pub ground: VoxelTypeId,
    /// Top layer (e.g. grass, snow). Carving migrates it down into the void.
    pub surface: VoxelTypeId,
}

