//! Equipment container: tagged, enable-able slots backed by a fixed space

use super::{Container, ContainerCore};
use crate::config::SpaceConfig;
use crate::error::Result;
use crate::event::InventoryEvent;
use crate::types::{
    ContainerId, ContainerKind, ItemConfigId, ItemId, ItemLocation, ItemRecord, SlotIndex,
};
use serde::{Deserialize, Serialize};
use void_core::Tag;
use void_event::EventBus;

/// Tags of the default equipment layout
pub mod slot_types {
    pub const HEAD: &str = "Equipment.Head";
    pub const BODY: &str = "Equipment.Body";
    pub const HANDS: &str = "Equipment.Hands";
    pub const LEGS: &str = "Equipment.Legs";
    pub const FEET: &str = "Equipment.Feet";
    pub const MAIN_HAND: &str = "Equipment.MainHand";
    pub const OFF_HAND: &str = "Equipment.OffHand";
    /// Appears twice in the default layout
    pub const ACCESSORY: &str = "Equipment.Accessory";

    /// Default layout, in slot order
    pub const DEFAULT_LAYOUT: [&str; 9] = [
        HEAD, BODY, HANDS, LEGS, FEET, MAIN_HAND, OFF_HAND, ACCESSORY, ACCESSORY,
    ];
}

/// One equipment slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSlot {
    pub slot_type: Tag,
    /// Ordinal among slots sharing `slot_type`
    pub index: u32,
    pub enabled: bool,
    pub equipped: Option<ItemId>,
    /// Item configs this slot takes; empty takes anything
    #[serde(default)]
    pub allowed: Vec<ItemConfigId>,
}

impl EquipmentSlot {
    pub fn accepts(&self, config: &ItemConfigId) -> bool {
        self.allowed.is_empty() || self.allowed.contains(config)
    }
}

/// Equipment slots addressed by (slot type, index)
#[derive(Debug, Clone)]
pub struct EquipmentContainer {
    core: ContainerCore,
    /// Same order as the fixed space's slots
    slots: Vec<EquipmentSlot>,
}

impl EquipmentContainer {
    /// Container without slots; add them with [`EquipmentContainer::with_slot`]
    pub fn new() -> Self {
        Self {
            core: ContainerCore::new(SpaceConfig::fixed(Vec::<Tag>::new())),
            slots: Vec::new(),
        }
    }

    /// Head, body, hands, legs, feet, both hands and two accessories
    pub fn with_default_slots() -> Self {
        slot_types::DEFAULT_LAYOUT
            .iter()
            .fold(Self::new(), |equipment, slot_type| equipment.with_slot(*slot_type))
    }

    /// Append a slot. Its index is the number of earlier slots of that type.
    pub fn with_slot(mut self, slot_type: impl Into<Tag>) -> Self {
        let slot_type = slot_type.into();
        let index = self
            .slots
            .iter()
            .filter(|slot| slot.slot_type == slot_type)
            .count() as u32;
        self.slots.push(EquipmentSlot {
            slot_type,
            index,
            enabled: true,
            equipped: None,
            allowed: Vec::new(),
        });
        self
    }

    pub fn slots(&self) -> &[EquipmentSlot] {
        &self.slots
    }

    /// Space slot index and slot for (type, index)
    pub fn find_slot(&self, slot_type: &Tag, index: u32) -> Option<(SlotIndex, &EquipmentSlot)> {
        self.slots
            .iter()
            .enumerate()
            .find(|(_, slot)| slot.slot_type == *slot_type && slot.index == index)
            .map(|(i, slot)| (SlotIndex::from(i), slot))
    }

    /// First slot of a type
    pub fn slot_by_type(&self, slot_type: &Tag) -> Option<&EquipmentSlot> {
        self.slots.iter().find(|slot| slot.slot_type == *slot_type)
    }

    pub fn slot_at(&self, slot: SlotIndex) -> Option<&EquipmentSlot> {
        slot.offset().and_then(|i| self.slots.get(i))
    }

    pub fn equipped_item(&self, slot_type: &Tag, index: u32) -> Option<ItemId> {
        self.find_slot(slot_type, index)
            .and_then(|(_, slot)| slot.equipped)
    }

    pub fn is_item_equipped(&self, item: ItemId) -> bool {
        self.slots.iter().any(|slot| slot.equipped == Some(item))
    }

    /// Enable or disable a slot. Disabled slots refuse new items; an
    /// equipped item stays. Returns false for an unknown slot.
    pub fn set_slot_enabled(&mut self, slot_type: &Tag, index: u32, enabled: bool) -> bool {
        match self
            .slots
            .iter_mut()
            .find(|slot| slot.slot_type == *slot_type && slot.index == index)
        {
            Some(slot) => {
                slot.enabled = enabled;
                true
            }
            None => {
                log::warn!("No equipment slot {} #{} to toggle", slot_type, index);
                false
            }
        }
    }

    /// Limit a slot to the given item configs; an empty list lifts the
    /// limit. Returns false for an unknown slot.
    pub fn restrict_slot<I, C>(&mut self, slot_type: &Tag, index: u32, allowed: I) -> bool
    where
        I: IntoIterator<Item = C>,
        C: Into<ItemConfigId>,
    {
        match self
            .slots
            .iter_mut()
            .find(|slot| slot.slot_type == *slot_type && slot.index == index)
        {
            Some(slot) => {
                slot.allowed = allowed.into_iter().map(Into::into).collect();
                true
            }
            None => {
                log::warn!("No equipment slot {} #{} to restrict", slot_type, index);
                false
            }
        }
    }

    fn slot_admits(&self, item: &ItemRecord, slot: SlotIndex) -> bool {
        self.slot_at(slot)
            .is_some_and(|slot| slot.enabled && slot.accepts(&item.config))
    }

    fn set_equipped(
        &mut self,
        location: ItemLocation,
        item: Option<ItemId>,
        events: &EventBus,
    ) {
        let Some(container) = self.core.id() else {
            return;
        };
        let Some(slot) = location.slot.offset().and_then(|i| self.slots.get_mut(i)) else {
            log::error!("Equipment {} has no slot {}", container, location.slot);
            return;
        };
        slot.equipped = item;
        events.publish(InventoryEvent::EquipmentChanged {
            container,
            slot_type: slot.slot_type.clone(),
            slot_index: slot.index,
            item,
        });
    }
}

impl Default for EquipmentContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for EquipmentContainer {
    fn core(&self) -> &ContainerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ContainerCore {
        &mut self.core
    }

    fn kind(&self) -> ContainerKind {
        ContainerKind::Equipment
    }

    fn init_container(&mut self, id: ContainerId) -> Result<()> {
        let slot_types = self.slots.iter().map(|slot| slot.slot_type.clone());
        self.core.set_config(SpaceConfig::fixed(slot_types));
        self.core.init(id)
    }

    fn can_add_item(&self, item: &ItemRecord, slot: SlotIndex) -> bool {
        self.core.can_add_item(slot) && self.slot_admits(item, slot)
    }

    fn can_move_item(&self, item: &ItemRecord, slot: SlotIndex) -> bool {
        self.core.can_move_item(slot) && self.slot_admits(item, slot)
    }

    fn on_item_added(&mut self, item: &ItemRecord, events: &EventBus) {
        if self.core.track_added(item) {
            self.set_equipped(item.location, Some(item.id), events);
        }
    }

    fn on_item_moved(&mut self, old_location: ItemLocation, item: &ItemRecord, events: &EventBus) {
        if self.core.track_moved(old_location, item) {
            self.set_equipped(old_location, None, events);
            self.set_equipped(item.location, Some(item.id), events);
        }
    }

    fn on_item_removed(&mut self, item: &ItemRecord, events: &EventBus) {
        if self.core.track_removed(item) {
            self.set_equipped(item.location, None, events);
        }
    }

    fn on_reset(&mut self) {
        for slot in &mut self.slots {
            slot.equipped = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemConfigId;

    fn equipment() -> EquipmentContainer {
        let mut equipment = EquipmentContainer::with_default_slots();
        equipment.init_container(ContainerId(2)).unwrap();
        equipment
    }

    fn record(id: u32, slot: i32) -> ItemRecord {
        ItemRecord::new(
            ItemId(id),
            ItemConfigId::new("gear"),
            ItemLocation::new(ContainerId(2), slot),
        )
    }

    #[test]
    fn test_default_layout() {
        let equipment = equipment();
        assert_eq!(equipment.slots().len(), 9);
        assert_eq!(equipment.space().capacity(), Some(9));

        let accessory = Tag::new(slot_types::ACCESSORY);
        let (first, _) = equipment.find_slot(&accessory, 0).unwrap();
        let (second, _) = equipment.find_slot(&accessory, 1).unwrap();
        assert_eq!((first, second), (SlotIndex(7), SlotIndex(8)));
        assert!(equipment.find_slot(&accessory, 2).is_none());
        assert_eq!(
            equipment.space().slot_type(SlotIndex(0)).unwrap(),
            Some(Tag::new(slot_types::HEAD))
        );
    }

    #[test]
    fn test_empty_equipment_fails_to_initialize() {
        let mut equipment = EquipmentContainer::new();
        assert!(equipment.init_container(ContainerId(2)).is_err());
    }

    #[test]
    fn test_disabled_slot_refuses_items() {
        let mut equipment = equipment();
        let head = Tag::new(slot_types::HEAD);
        assert!(equipment.set_slot_enabled(&head, 0, false));
        assert!(!equipment.can_add_item(&record(1, 0), SlotIndex(0)));
        assert!(equipment.can_add_item(&record(1, 1), SlotIndex(1)));
        assert!(!equipment.set_slot_enabled(&head, 3, false));
    }

    #[test]
    fn test_restricted_slot_checks_item_config() {
        let mut equipment = equipment();
        let head = Tag::new(slot_types::HEAD);
        assert!(equipment.restrict_slot(&head, 0, ["iron_helm"]));

        let helm = ItemRecord::new(ItemId(1), ItemConfigId::new("iron_helm"), ItemLocation::void());
        let sword = ItemRecord::new(ItemId(2), ItemConfigId::new("sword"), ItemLocation::void());
        assert!(equipment.can_add_item(&helm, SlotIndex(0)));
        assert!(!equipment.can_add_item(&sword, SlotIndex(0)));
        assert!(equipment.can_add_item(&sword, SlotIndex(5)));

        assert!(equipment.restrict_slot(&head, 0, Vec::<ItemConfigId>::new()));
        assert!(equipment.can_add_item(&sword, SlotIndex(0)));
        assert!(!equipment.restrict_slot(&head, 4, ["iron_helm"]));
    }

    #[test]
    fn test_notifications_track_equipped_items() {
        let events = EventBus::new();
        let mut equipment = equipment();
        let helmet = record(5, 0);

        equipment.on_item_added(&helmet, &events);
        assert_eq!(equipment.equipped_item(&Tag::new(slot_types::HEAD), 0), Some(ItemId(5)));
        assert!(equipment.is_item_equipped(ItemId(5)));

        let moved = helmet.relocated(ItemLocation::new(ContainerId(2), 1));
        equipment.on_item_moved(helmet.location, &moved, &events);
        assert_eq!(equipment.equipped_item(&Tag::new(slot_types::HEAD), 0), None);
        assert_eq!(equipment.equipped_item(&Tag::new(slot_types::BODY), 0), Some(ItemId(5)));

        equipment.on_item_removed(&moved, &events);
        assert!(!equipment.is_item_equipped(ItemId(5)));
        assert_eq!(events.published_count(), 4);
    }
}
