//! Voxel storage for cave generation: material registry, chunk coordinates, and
//! the margin-aware chunk buffer that carvers write through.

pub mod buffer;
pub mod coord;
pub mod registry;

pub use buffer::{BufferError, ChunkBuffer, VoxelBuffer};
pub use coord::{CHUNK_MARGIN, CHUNK_SIZE, ChunkCoord};
pub use registry::{RegistryError, StandardMaterials, VoxelTypeDef, VoxelTypeId, VoxelTypeRegistry};
