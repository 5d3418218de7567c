//! Configuration: space topologies, item metadata and loot tables
//!
//! Everything here is plain `serde` data. [`InventoryConfig`] can be loaded
//! from TOML:
//!
//! ```toml
//! [items.iron_sword]
//! weight = 3.5
//!
//! [containers.backpack]
//! weight_limit = 40.0
//! space = { space_type = "grid", grid_width = 4, grid_height = 5 }
//!
//! [[loot_tables.chest]]
//! config = "gold_coin"
//! drop_chance = 0.5
//! min_count = 1
//! max_count = 3
//! ```

use crate::error::{InventoryError, Result};
use crate::space::grid_slot_count;
use crate::types::ItemConfigId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use void_core::Tag;

/// Space strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceType {
    /// No slots, only a capacity
    #[default]
    Unordered,
    /// Fixed, tagged slots
    Fixed,
    /// 2D grid, row-major
    Grid,
}

fn unbounded() -> i32 {
    -1
}

fn one() -> i32 {
    1
}

/// Immutable topology descriptor supplied at container creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceConfig {
    /// Which strategy manages the slots
    #[serde(default)]
    pub space_type: SpaceType,
    /// Item capacity for unordered spaces (-1 = unbounded)
    #[serde(default = "unbounded")]
    pub capacity: i32,
    /// Slot-type tags, one per slot, for fixed spaces
    #[serde(default)]
    pub fixed_slot_types: Vec<Tag>,
    /// Grid width for grid spaces
    #[serde(default = "one")]
    pub grid_width: i32,
    /// Grid height for grid spaces
    #[serde(default = "one")]
    pub grid_height: i32,
}

impl SpaceConfig {
    /// Unordered space with a capacity (-1 = unbounded)
    pub fn unordered(capacity: i32) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Unordered space without a capacity limit
    pub fn unbounded() -> Self {
        Self::unordered(-1)
    }

    /// Fixed space with one slot per tag, in order
    pub fn fixed<I, T>(slot_types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        Self {
            space_type: SpaceType::Fixed,
            fixed_slot_types: slot_types.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Grid space of `width` x `height`
    pub fn grid(width: i32, height: i32) -> Self {
        Self {
            space_type: SpaceType::Grid,
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Strict validation. Space construction normalizes grid dimensions
    /// instead of failing; this reports them.
    pub fn validate(&self) -> Result<()> {
        match self.space_type {
            SpaceType::Unordered => Ok(()),
            SpaceType::Fixed if self.fixed_slot_types.is_empty() => Err(
                InventoryError::invalid_topology("fixed space has no slot types"),
            ),
            SpaceType::Fixed => Ok(()),
            SpaceType::Grid if self.grid_width <= 0 || self.grid_height <= 0 => {
                Err(InventoryError::invalid_topology(format!(
                    "grid dimensions must be positive, got {}x{}",
                    self.grid_width, self.grid_height
                )))
            }
            SpaceType::Grid if grid_slot_count(self.grid_width, self.grid_height).is_none() => {
                Err(InventoryError::invalid_topology(format!(
                    "grid {}x{} has too many slots",
                    self.grid_width, self.grid_height
                )))
            }
            SpaceType::Grid => Ok(()),
        }
    }
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            space_type: SpaceType::Unordered,
            capacity: -1,
            fixed_slot_types: Vec::new(),
            grid_width: 1,
            grid_height: 1,
        }
    }
}

/// Item metadata resolved from a config id. The core never interprets it;
/// it is only consulted by admission hooks such as bag weight limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Weight of one item
    #[serde(default)]
    pub weight: f32,
    /// Maximum stack size
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
}

fn default_max_stack() -> u32 {
    1
}

impl Default for ItemMetadata {
    fn default() -> Self {
        Self {
            name: String::new(),
            weight: 0.0,
            max_stack: 1,
        }
    }
}

/// Resolves item config ids to metadata
pub trait ItemConfigSource: Send + Sync {
    /// Look up metadata for a config id
    fn resolve(&self, config: &ItemConfigId) -> Option<ItemMetadata>;

    /// Weight of one item; unknown configs weigh nothing
    fn weight_of(&self, config: &ItemConfigId) -> f32 {
        self.resolve(config).map_or(0.0, |meta| meta.weight)
    }
}

/// In-memory [`ItemConfigSource`]
#[derive(Debug, Clone, Default)]
pub struct StaticItemConfigs {
    items: HashMap<ItemConfigId, ItemMetadata>,
}

impl StaticItemConfigs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata for a config id
    pub fn with_item(mut self, config: impl Into<ItemConfigId>, meta: ItemMetadata) -> Self {
        self.items.insert(config.into(), meta);
        self
    }

    pub fn insert(&mut self, config: impl Into<ItemConfigId>, meta: ItemMetadata) {
        self.items.insert(config.into(), meta);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemConfigSource for StaticItemConfigs {
    fn resolve(&self, config: &ItemConfigId) -> Option<ItemMetadata> {
        self.items.get(config).cloned()
    }
}

/// One row of a loot table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    /// Item template to create
    pub config: ItemConfigId,
    /// Chance in `0.0..=1.0` that this row drops
    #[serde(default = "always")]
    pub drop_chance: f32,
    /// Minimum items created when the row drops
    #[serde(default = "one_u32")]
    pub min_count: u32,
    /// Maximum items created when the row drops
    #[serde(default = "one_u32")]
    pub max_count: u32,
}

fn always() -> f32 {
    1.0
}

fn one_u32() -> u32 {
    1
}

fn normalize_chance(chance: f32) -> f32 {
    if chance.is_nan() {
        0.0
    } else {
        chance.clamp(0.0, 1.0)
    }
}

impl LootEntry {
    /// A row that always drops exactly one item
    pub fn new(config: impl Into<ItemConfigId>) -> Self {
        Self {
            config: config.into(),
            drop_chance: 1.0,
            min_count: 1,
            max_count: 1,
        }
    }

    pub fn with_chance(mut self, chance: f32) -> Self {
        self.drop_chance = normalize_chance(chance);
        self
    }

    /// Drop chance as a probability. Values outside `0.0..=1.0` are clamped
    /// and NaN never drops.
    pub fn probability(&self) -> f64 {
        f64::from(normalize_chance(self.drop_chance))
    }

    pub fn with_count(mut self, min: u32, max: u32) -> Self {
        self.min_count = min.max(1);
        self.max_count = max.max(self.min_count);
        self
    }
}

/// Named container preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerPreset {
    /// Space topology
    #[serde(default)]
    pub space: SpaceConfig,
    /// Optional weight limit (bags only)
    #[serde(default)]
    pub weight_limit: Option<f32>,
}

/// Top-level inventory configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Item metadata by config id
    #[serde(default)]
    pub items: HashMap<ItemConfigId, ItemMetadata>,
    /// Container presets by name
    #[serde(default)]
    pub containers: HashMap<String, ContainerPreset>,
    /// Loot tables by name
    #[serde(default)]
    pub loot_tables: HashMap<String, Vec<LootEntry>>,
}

impl InventoryConfig {
    /// Parse from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: InventoryConfig = toml::from_str(source)?;
        for (name, preset) in &config.containers {
            if let Err(err) = preset.space.validate() {
                log::warn!("Container preset '{}' is not strictly valid: {}", name, err);
            }
        }
        for (name, table) in &config.loot_tables {
            for entry in table.iter().filter(|entry| entry.drop_chance.is_nan()) {
                log::warn!("Loot table '{}' row {} has a NaN drop chance, it will never drop", name, entry.config);
            }
        }
        log::debug!(
            "Loaded inventory config: {} items, {} container presets, {} loot tables",
            config.items.len(),
            config.containers.len(),
            config.loot_tables.len()
        );
        Ok(config)
    }

    /// Look up a container preset
    pub fn container(&self, name: &str) -> Option<&ContainerPreset> {
        self.containers.get(name)
    }

    /// Look up a loot table
    pub fn loot_table(&self, name: &str) -> Option<&[LootEntry]> {
        self.loot_tables.get(name).map(Vec::as_slice)
    }

    /// Item metadata as an [`ItemConfigSource`]
    pub fn item_source(&self) -> StaticItemConfigs {
        StaticItemConfigs {
            items: self.items.clone(),
        }
    }
}
