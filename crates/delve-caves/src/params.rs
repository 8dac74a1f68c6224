//! Tunable cave generation parameters.

use serde::{Deserialize, Serialize};

use crate::error::CaveParamsError;

/// Accepted `check_area_size` values.
const CHECK_AREA_RANGE: std::ops::RangeInclusive<i32> = 2..=32;

/// How the liquid guard searches a cross-section's bounding volume.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquidScan {
    /// Edge columns are scanned top to bottom; interior columns only have their
    /// top and bottom voxels checked. Matches worlds generated by earlier versions.
    #[default]
    Sampled,
    /// Every voxel of the volume is checked.
    Exhaustive,
}

/// Configuration for carved cave systems.
///
/// Percentages are in `0..=100`; altitudes are absolute block heights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveParams {
    /// Upper bound for the number of cave starts per chunk. The actual count is
    /// heavily biased towards small values unless `even_cave_distribution` is set.
    pub cave_frequency: i32,
    /// Chance that a chunk gets any cave starts at all.
    pub cave_rarity: i32,
    /// Use exactly `cave_frequency` starts and uniform start altitudes.
    pub even_cave_distribution: bool,
    /// Lowest start altitude.
    pub cave_min_altitude: i32,
    /// Highest start altitude.
    pub cave_max_altitude: i32,
    /// Chance that a start spawns one large single cavern.
    pub individual_cave_rarity: i32,
    /// Tunnel networks spawned at every start.
    pub cave_system_frequency: i32,
    /// Chance of extra pocket tunnels at a start without a cavern.
    pub cave_system_pocket_chance: i32,
    /// Smallest number of extra pocket tunnels.
    pub cave_system_pocket_min_size: i32,
    /// Largest number of extra pocket tunnels.
    pub cave_system_pocket_max_size: i32,
    /// Exclusive top of the world.
    pub world_height_cap: i32,
    /// Radius in chunks of the neighbourhood whose cave systems can reach a chunk.
    /// Also bounds walk length, so it must lie in `2..=32`.
    pub check_area_size: i32,
    /// Liquid guard search mode.
    pub liquid_scan: LiquidScan,
}

impl Default for CaveParams {
    fn default() -> Self {
        Self {
            cave_frequency: 40,
            cave_rarity: 7,
            even_cave_distribution: false,
            cave_min_altitude: 8,
            cave_max_altitude: 128,
            individual_cave_rarity: 25,
            cave_system_frequency: 1,
            cave_system_pocket_chance: 0,
            cave_system_pocket_min_size: 0,
            cave_system_pocket_max_size: 4,
            world_height_cap: 256,
            check_area_size: 8,
            liquid_scan: LiquidScan::Sampled,
        }
    }
}

impl CaveParams {
    /// `true` when the parameters can never start a cave.
    pub fn is_disabled(&self) -> bool {
        self.cave_frequency <= 0 || self.cave_rarity <= 0
    }

    /// Maximum walk length derived from the check area, before the random shrink.
    pub fn max_walk_length(&self) -> i32 {
        self.check_area_size * 16 - 16
    }

    /// Checks every value against its documented range.
    ///
    /// # Errors
    ///
    /// Returns the first [`CaveParamsError`] found.
    pub fn validate(&self) -> Result<(), CaveParamsError> {
        for (name, value) in [
            ("cave_frequency", self.cave_frequency),
            ("cave_system_frequency", self.cave_system_frequency),
            ("cave_system_pocket_min_size", self.cave_system_pocket_min_size),
            ("cave_system_pocket_max_size", self.cave_system_pocket_max_size),
        ] {
            if value < 0 {
                return Err(CaveParamsError::Negative { name, value });
            }
        }

        for (name, value) in [
            ("cave_rarity", self.cave_rarity),
            ("individual_cave_rarity", self.individual_cave_rarity),
            ("cave_system_pocket_chance", self.cave_system_pocket_chance),
        ] {
            if !(0..=100).contains(&value) {
                return Err(CaveParamsError::NotAPercentage { name, value });
            }
        }

        if !(16..=4096).contains(&self.world_height_cap) {
            return Err(CaveParamsError::HeightCap(self.world_height_cap));
        }

        for (name, value) in [
            ("cave_min_altitude", self.cave_min_altitude),
            ("cave_max_altitude", self.cave_max_altitude),
        ] {
            if !(0..=self.world_height_cap).contains(&value) {
                return Err(CaveParamsError::AltitudeOutOfWorld {
                    name,
                    value,
                    cap: self.world_height_cap,
                });
            }
        }

        if self.cave_min_altitude > self.cave_max_altitude {
            return Err(CaveParamsError::InvertedRange {
                min_name: "cave_min_altitude",
                min: self.cave_min_altitude,
                max: self.cave_max_altitude,
            });
        }
        if self.cave_system_pocket_min_size > self.cave_system_pocket_max_size {
            return Err(CaveParamsError::InvertedRange {
                min_name: "cave_system_pocket_min_size",
                min: self.cave_system_pocket_min_size,
                max: self.cave_system_pocket_max_size,
            });
        }

        if !CHECK_AREA_RANGE.contains(&self.check_area_size) {
            return Err(CaveParamsError::CheckArea(self.check_area_size));
        }

        Ok(())
    }
}
