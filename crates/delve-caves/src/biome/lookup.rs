//! Column-wise biome queries.

use super::BiomeMaterials;

/// Answers which biome materials make up the column at a world position.
pub trait BiomeLookup {
    /// Materials of the column at `(world_x, world_z)`.
    fn biome_at(&self, world_x: i32, world_z: i32) -> BiomeMaterials;
}

/// A single biome everywhere.
impl BiomeLookup for BiomeMaterials {
    fn biome_at(&self, _world_x: i32, _world_z: i32) -> BiomeMaterials {
        *self
    }
}

impl<F> BiomeLookup for F
where
    F: Fn(i32, i32) -> BiomeMaterials,
{
    fn biome_at(&self, world_x: i32, world_z: i32) -> BiomeMaterials {
        self(world_x, world_z)
    }
}
