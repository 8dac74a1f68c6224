//! Biome materials: which stone, ground and surface a column is made of.
//!
//! The carver asks per column and never assumes one biome for the whole chunk.

mod def;
mod lookup;

pub use def::BiomeMaterials;
pub use lookup::BiomeLookup;
