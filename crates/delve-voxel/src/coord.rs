//! Chunk coordinates: the identity of one generation unit.

use serde::{Deserialize, Serialize};

/// Horizontal side length of a chunk in blocks.
pub const CHUNK_SIZE: i32 = 16;

/// Blocks of neighbouring chunks a buffer holds on every horizontal side.
pub const CHUNK_MARGIN: i32 = 16;

/// Chunk coordinate (identifies a chunk column in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Z coordinate (in chunks, not blocks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Converts world block coordinates to the chunk containing them.
    #[inline]
    pub const fn from_block_pos(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x.div_euclid(CHUNK_SIZE),
            z: block_z.div_euclid(CHUNK_SIZE),
        }
    }

    /// World X of the chunk's origin corner.
    #[inline]
    pub const fn block_x(self) -> i32 {
        self.x * CHUNK_SIZE
    }

    /// World Z of the chunk's origin corner.
    #[inline]
    pub const fn block_z(self) -> i32 {
        self.z * CHUNK_SIZE
    }

    /// World X of the chunk's center line.
    #[inline]
    pub const fn block_x_center(self) -> i32 {
        self.block_x() + CHUNK_SIZE / 2
    }

    /// World Z of the chunk's center line.
    #[inline]
    pub const fn block_z_center(self) -> i32 {
        self.block_z() + CHUNK_SIZE / 2
    }

    /// The chunk `dx`, `dz` chunks away.
    #[inline]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}
