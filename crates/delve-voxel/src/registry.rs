//! Material registry: maps compact [`VoxelTypeId`] values to [`VoxelTypeDef`] metadata.
//!
//! The registry is built once before generation starts. Air is always ID 0 so
//! that zero-initialized buffer memory represents empty space.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Compact identifier stored inside every voxel cell (2 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoxelTypeId(pub u16);

impl VoxelTypeId {
    /// The empty material. Carving replaces voxels with this.
    pub const AIR: Self = Self(0);
}

/// Full descriptor for a material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoxelTypeDef {
    /// Human-readable name (e.g. "stone", "grass", "water").
    pub name: String,
    /// Whether entities collide with this voxel.
    pub solid: bool,
    /// Liquids stop tunnels: a cross-section touching one is never carved.
    pub liquid: bool,
    /// Gravity-affected materials (sand, gravel).
    pub falls: bool,
    /// Boundary materials that nothing may replace (bedrock).
    pub indestructible: bool,
}

impl VoxelTypeDef {
    /// A plain solid material with no special behaviour.
    pub fn solid(name: &str) -> Self {
        Self {
            name: name.to_string(),
            solid: true,
            liquid: false,
            falls: false,
            indestructible: false,
        }
    }

    /// A non-solid liquid material.
    pub fn liquid(name: &str) -> Self {
        Self {
            solid: false,
            liquid: true,
            ..Self::solid(name)
        }
    }

    /// A solid, gravity-affected material.
    pub fn falling(name: &str) -> Self {
        Self {
            falls: true,
            ..Self::solid(name)
        }
    }

    /// A solid material that can never be replaced.
    pub fn indestructible(name: &str) -> Self {
        Self {
            indestructible: true,
            ..Self::solid(name)
        }
    }
}

/// Errors that can occur during material registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A type with the same name has already been registered.
    #[error("duplicate voxel type name: {0}")]
    DuplicateName(String),
    /// All 65 535 user-defined slots have been consumed.
    #[error("voxel type registry is full (max 65536 types)")]
    RegistryFull,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Maps [`VoxelTypeId`] → [`VoxelTypeDef`] with O(1) lookup by index and
/// O(1) reverse lookup by name.
#[derive(Clone, Debug)]
pub struct VoxelTypeRegistry {
    /// Dense array where `index == VoxelTypeId.0`.
    types: Vec<VoxelTypeDef>,
    /// Reverse lookup: name → ID.
    name_to_id: FxHashMap<String, VoxelTypeId>,
}

impl VoxelTypeRegistry {
    /// Creates a new registry with Air pre-registered as ID 0.
    pub fn new() -> Self {
        let air = VoxelTypeDef {
            name: "air".to_string(),
            solid: false,
            liquid: false,
            falls: false,
            indestructible: false,
        };

        let mut name_to_id = FxHashMap::default();
        name_to_id.insert("air".to_string(), VoxelTypeId::AIR);

        Self {
            types: vec![air],
            name_to_id,
        }
    }

    /// Creates a registry holding the stock terrain materials.
    ///
    /// Use [`StandardMaterials::resolve`] to get their IDs back.
    pub fn with_standard_materials() -> Self {
        let mut registry = Self::new();
        for def in [
            VoxelTypeDef::solid("stone"),
            VoxelTypeDef::solid("dirt"),
            VoxelTypeDef::solid("grass"),
            VoxelTypeDef::falling("sand"),
            VoxelTypeDef::falling("gravel"),
            VoxelTypeDef::liquid("water"),
            VoxelTypeDef::liquid("lava"),
            VoxelTypeDef::indestructible("bedrock"),
            VoxelTypeDef::solid("sandstone"),
            VoxelTypeDef::solid("red_sandstone"),
            VoxelTypeDef::solid("hardened_clay"),
            VoxelTypeDef::solid("snow"),
            VoxelTypeDef::solid("planks"),
        ] {
            let registered = registry.register(def);
            debug_assert!(registered.is_ok(), "stock material rejected: {registered:?}");
        }
        registry
    }

    /// Registers a new material and returns its assigned ID.
    ///
    /// IDs are assigned sequentially starting from 1 (0 is Air).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if a type with the same name
    /// already exists, or [`RegistryError::RegistryFull`] if all 65 536 slots
    /// are consumed.
    pub fn register(&mut self, def: VoxelTypeDef) -> Result<VoxelTypeId, RegistryError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        if self.types.len() > u16::MAX as usize {
            return Err(RegistryError::RegistryFull);
        }

        let id = VoxelTypeId(self.types.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.types.push(def);
        Ok(id)
    }

    /// Returns the definition for a given ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range. IDs are only produced by the registry itself.
    pub fn get(&self, id: VoxelTypeId) -> &VoxelTypeDef {
        &self.types[id.0 as usize]
    }

    /// Returns the ID for a named material, or `None` if not found.
    pub fn lookup_by_name(&self, name: &str) -> Option<VoxelTypeId> {
        self.name_to_id.get(name).copied()
    }

    /// Iterates over every registered `(id, def)` pair in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (VoxelTypeId, &VoxelTypeDef)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, def)| (VoxelTypeId(i as u16), def))
    }

    /// Returns the total number of registered types (including Air).
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if only Air is registered.
    pub fn is_empty(&self) -> bool {
        self.types.len() <= 1
    }

    /// Returns `true` if the given voxel type is air (ID 0).
    pub fn is_air(&self, id: VoxelTypeId) -> bool {
        id == VoxelTypeId::AIR
    }

    /// Returns `true` if the given voxel type is a liquid. Unknown IDs are not.
    pub fn is_liquid(&self, id: VoxelTypeId) -> bool {
        self.types.get(id.0 as usize).is_some_and(|def| def.liquid)
    }

    /// Returns `true` if the given voxel type is affected by gravity.
    pub fn can_fall(&self, id: VoxelTypeId) -> bool {
        self.types.get(id.0 as usize).is_some_and(|def| def.falls)
    }

    /// Returns `true` if the given voxel type can never be replaced.
    pub fn is_indestructible(&self, id: VoxelTypeId) -> bool {
        self.types
            .get(id.0 as usize)
            .is_some_and(|def| def.indestructible)
    }
}

impl Default for VoxelTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// IDs of the stock materials registered by
/// [`VoxelTypeRegistry::with_standard_materials`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StandardMaterials {
    pub stone: VoxelTypeId,
    pub dirt: VoxelTypeId,
    pub grass: VoxelTypeId,
    pub sand: VoxelTypeId,
    pub gravel: VoxelTypeId,
    pub water: VoxelTypeId,
    pub lava: VoxelTypeId,
    pub bedrock: VoxelTypeId,
    pub sandstone: VoxelTypeId,
    pub red_sandstone: VoxelTypeId,
    pub hardened_clay: VoxelTypeId,
    pub snow: VoxelTypeId,
    pub planks: VoxelTypeId,
}

impl StandardMaterials {
    /// Looks up every stock material by name. Returns `None` if any is missing.
    pub fn resolve(registry: &VoxelTypeRegistry) -> Option<Self> {
        let id = |name: &str| registry.lookup_by_name(name);
        Some(Self {
            stone: id("stone")?,
            dirt: id("dirt")?,
            grass: id("grass")?,
            sand: id("sand")?,
            gravel: id("gravel")?,
            water: id("water")?,
            lava: id("lava")?,
            bedrock: id("bedrock")?,
            sandstone: id("sandstone")?,
            red_sandstone: id("red_sandstone")?,
            hardened_clay: id("hardened_clay")?,
            snow: id("snow")?,
            planks: id("planks")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
