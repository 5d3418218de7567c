//! Void Inventory - Item location and container system
//!
//! Every item lives in exactly one container at one slot. Containers are
//! registered with an [`ItemRegistry`], which is the only way to create,
//! move or remove items and which validates a move completely before
//! committing it.
//!
//! # Features
//!
//! - Space strategies: unordered (capacity only), fixed tagged slots, 2D grid
//! - Containers: void, base, bag (weight limit, slot locking), equipment, loot
//! - Atomic move protocol with container notifications
//! - Change events on a [`void_event::EventBus`]
//! - TOML configuration for item metadata, container presets and loot tables
//!
//! # Example
//!
//! ```ignore
//! use void_inventory::prelude::*;
//!
//! let mut registry = ItemRegistry::new();
//! let bag = registry.register_container(BagContainer::grid(4, 5))?;
//! let sword = registry.create_item("iron_sword", ItemLocation::new(bag, 0))?;
//! registry.move_item(sword, ItemLocation::new(bag, 19))?;
//! ```

pub mod config;
pub mod container;
pub mod error;
pub mod event;
pub mod registry;
pub mod shared;
pub mod space;
pub mod types;

pub mod prelude {
    pub use crate::config::{
        ContainerPreset, InventoryConfig, ItemConfigSource, ItemMetadata, LootEntry, SpaceConfig,
        SpaceType, StaticItemConfigs,
    };
    pub use crate::container::{
        slot_types, BagContainer, BaseContainer, Container, EquipmentContainer, EquipmentSlot,
        LootContainer, VoidContainer,
    };
    pub use crate::error::{InventoryError, Result};
    pub use crate::event::InventoryEvent;
    pub use crate::registry::{ItemRegistry, TakeAllReport};
    pub use crate::shared::SharedItemRegistry;
    pub use crate::space::{FixedSlotSpace, GridSpace, SpaceManager, UnorderedSpace};
    pub use crate::types::{
        ContainerId, ContainerKind, ItemConfigId, ItemId, ItemLocation, ItemRecord, SlotIndex,
        SlotState,
    };
    pub use void_core::Tag;
}

pub use prelude::*;
