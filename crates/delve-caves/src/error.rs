//! Cave generation error types.

use delve_voxel::{BufferError, ChunkCoord};

/// A parameter outside its documented range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaveParamsError {
    /// A count or frequency below zero.
    #[error("{name} must not be negative (got {value})")]
    Negative {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: i32,
    },

    /// A chance outside `0..=100`.
    #[error("{name} must be a percentage in 0..=100 (got {value})")]
    NotAPercentage {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: i32,
    },

    /// An altitude outside `[0, world_height_cap]`.
    #[error("{name} = {value} lies outside the world (0..={cap})")]
    AltitudeOutOfWorld {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: i32,
        /// Configured height cap.
        cap: i32,
    },

    /// A min/max pair with min above max.
    #[error("{min_name} ({min}) is greater than its maximum ({max})")]
    InvertedRange {
        /// Name of the lower bound.
        min_name: &'static str,
        /// Lower bound.
        min: i32,
        /// Upper bound.
        max: i32,
    },

    /// Height cap outside `16..=4096`.
    #[error("world_height_cap must be in 16..=4096 (got {0})")]
    HeightCap(i32),

    /// Check area outside `2..=32`.
    #[error("check_area_size must be in 2..=32 (got {0})")]
    CheckArea(i32),
}

/// Errors that abort cave generation for a unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaveError {
    /// The parameters failed validation.
    #[error("invalid cave parameters: {0}")]
    InvalidParams(#[from] CaveParamsError),

    /// The buffer cannot hold every level below the height cap.
    #[error("chunk buffer holds {height} levels but world_height_cap is {required}")]
    BufferTooShort {
        /// Levels in the buffer.
        height: i32,
        /// Configured height cap.
        required: i32,
    },

    /// The buffer belongs to a different unit than the one requested.
    #[error("buffer for chunk {buffer} passed to generate chunk {requested}")]
    CoordMismatch {
        /// Unit the caller asked for.
        requested: ChunkCoord,
        /// Unit the buffer covers.
        buffer: ChunkCoord,
    },

    /// A carve write fell outside the unit's buffer.
    #[error("carve escaped the chunk buffer: {0}")]
    Buffer(#[from] BufferError),
}
