//! Procedural cave carving: placement planning, recursive tunnel walks, and
//! material-aware hollowing of a chunk's voxel buffer.

mod async_generation;
mod carver;
mod error;
mod generator;
mod material;
mod params;
mod planner;

pub mod biome;
pub mod seed;

pub use async_generation::{AsyncCaveGenerator, CarvedChunk, SharedBiomes};
pub use biome::{BiomeLookup, BiomeMaterials};
pub use carver::{CarveStats, CarveTask, TunnelCarver};
pub use error::{CaveError, CaveParamsError};
pub use generator::{CaveGenerator, CaveStats, generate};
pub use material::MaterialPolicy;
pub use params::{CaveParams, LiquidScan};
pub use planner::{CarveRequest, CarveShape, plan_caves};
