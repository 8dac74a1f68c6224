//! Writable window into block storage for one generation unit.
//!
//! A [`ChunkBuffer`] covers the home chunk plus [`CHUNK_MARGIN`] blocks of each
//! horizontal neighbour. Local coordinates run `0..16` inside the home chunk and
//! `-16..32` across the whole window; the vertical range is `0..height`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::coord::{CHUNK_MARGIN, CHUNK_SIZE, ChunkCoord};
use crate::registry::VoxelTypeId;

/// Side length of the buffered window in blocks (home chunk plus both margins).
const SPAN: i32 = CHUNK_SIZE + 2 * CHUNK_MARGIN;

/// Errors raised by buffer writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// A write landed outside the buffered window.
    #[error("write at local ({x}, {y}, {z}) is outside the buffered margin")]
    OutOfMargin {
        /// Local X.
        x: i32,
        /// Y level.
        y: i32,
        /// Local Z.
        z: i32,
    },
}

/// The voxel access a carver needs.
///
/// Coordinates are chunk-local: `(0, y, 0)` is the home chunk's origin column.
pub trait VoxelBuffer {
    /// The unit this buffer belongs to.
    fn coord(&self) -> ChunkCoord;

    /// Exclusive upper bound of the vertical range.
    fn height(&self) -> i32;

    /// Returns the material at a local position. Positions outside the buffered
    /// window read as air.
    fn get(&self, x: i32, y: i32, z: i32) -> VoxelTypeId;

    /// Replaces the material at a local position.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfMargin`] if the position lies outside the
    /// buffered window.
    fn set(&mut self, x: i32, y: i32, z: i32, voxel: VoxelTypeId) -> Result<(), BufferError>;
}

/// Dense storage for one chunk and its neighbour margin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkBuffer {
    coord: ChunkCoord,
    height: i32,
    /// Indexed as `[y][z][x]` with the margin folded into the horizontal axes.
    voxels: Vec<VoxelTypeId>,
}

impl ChunkBuffer {
    /// Creates an all-air buffer for `coord` with `height` vertical levels.
    pub fn new(coord: ChunkCoord, height: u32) -> Self {
        let height = height as i32;
        Self {
            coord,
            height,
            voxels: vec![VoxelTypeId::AIR; (SPAN * SPAN * height.max(0)) as usize],
        }
    }

    /// Returns `true` if the local position lies inside the buffered window.
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        (-CHUNK_MARGIN..CHUNK_SIZE + CHUNK_MARGIN).contains(&x)
            && (-CHUNK_MARGIN..CHUNK_SIZE + CHUNK_MARGIN).contains(&z)
            && (0..self.height).contains(&y)
    }

    #[inline]
    fn index(x: i32, y: i32, z: i32) -> usize {
        let lx = x + CHUNK_MARGIN;
        let lz = z + CHUNK_MARGIN;
        ((y * SPAN + lz) * SPAN + lx) as usize
    }

    /// Fills every buffered voxel from a function of its world position.
    pub fn fill_with(&mut self, mut f: impl FnMut(i32, i32, i32) -> VoxelTypeId) {
        let (bx, bz) = (self.coord.block_x(), self.coord.block_z());
        for y in 0..self.height {
            for z in -CHUNK_MARGIN..CHUNK_SIZE + CHUNK_MARGIN {
                for x in -CHUNK_MARGIN..CHUNK_SIZE + CHUNK_MARGIN {
                    self.voxels[Self::index(x, y, z)] = f(bx + x, y, bz + z);
                }
            }
        }
    }

    /// Number of buffered voxels holding `voxel`.
    pub fn count(&self, voxel: VoxelTypeId) -> usize {
        self.voxels.iter().filter(|&&v| v == voxel).count()
    }

    /// Iterates a local column bottom-up.
    pub fn column(&self, x: i32, z: i32) -> impl Iterator<Item = VoxelTypeId> + '_ {
        (0..self.height).map(move |y| self.get(x, y, z))
    }

    /// Digest of the buffer contents, for determinism comparisons.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.coord.hash(&mut hasher);
        for voxel in &self.voxels {
            voxel.0.hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl VoxelBuffer for ChunkBuffer {
    fn coord(&self) -> ChunkCoord {
        self.coord
    }

    fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn get(&self, x: i32, y: i32, z: i32) -> VoxelTypeId {
        if !self.in_bounds(x, y, z) {
            return VoxelTypeId::AIR;
        }
        self.voxels[Self::index(x, y, z)]
    }

    #[inline]
    fn set(&mut self, x: i32, y: i32, z: i32, voxel: VoxelTypeId) -> Result<(), BufferError> {
        if !self.in_bounds(x, y, z) {
            tracing::warn!("ChunkBuffer::set out of margin: ({}, {}, {})", x, y, z);
            return Err(BufferError::OutOfMargin { x, y, z });
        }
        self.voxels[Self::index(x, y, z)] = voxel;
        Ok(())
    }
}
