//! Change notifications published on the registry's event bus

use crate::types::{ContainerId, ItemId};
use serde::{Deserialize, Serialize};
use void_core::Tag;

/// Inventory change notifications, delivered in call order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InventoryEvent {
    /// A container's contents changed
    ContainerChanged { container: ContainerId },
    /// An equipment slot changed; `item` is the new occupant, `None` when emptied
    EquipmentChanged {
        container: ContainerId,
        slot_type: Tag,
        slot_index: u32,
        item: Option<ItemId>,
    },
    /// A loot container's contents changed
    LootChanged { container: ContainerId },
}

impl InventoryEvent {
    /// Container the event is about
    pub fn container(&self) -> ContainerId {
        match self {
            InventoryEvent::ContainerChanged { container }
            | InventoryEvent::EquipmentChanged { container, .. }
            | InventoryEvent::LootChanged { container } => *container,
        }
    }
}
