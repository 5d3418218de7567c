use super::{publish, Container, ContainerCore};
use crate::config::{ContainerPreset, ItemConfigSource, SpaceConfig};
use crate::error::{InventoryError, Result};
use crate::types::{ContainerKind, ItemRecord, SlotIndex, SlotState};
use std::fmt;
use std::sync::Arc;
use void_event::EventBus;

/// Character bag: a grid or unordered space with optional weight limit
/// and per-slot locking
pub struct BagContainer {
    core: ContainerCore,
    weight_limit: Option<f32>,
    current_weight: f32,
    item_source: Option<Arc<dyn ItemConfigSource>>,
}

impl BagContainer {
    pub fn new(config: SpaceConfig) -> Self {
        Self {
            core: ContainerCore::new(config),
            weight_limit: None,
            current_weight: 0.0,
            item_source: None,
        }
    }

    /// Grid bag of `width` x `height` slots
    pub fn grid(width: i32, height: i32) -> Self {
        Self::new(SpaceConfig::grid(width, height))
    }

    /// Build from a named preset
    pub fn from_preset(preset: &ContainerPreset, items: Arc<dyn ItemConfigSource>) -> Self {
        let bag = Self::new(preset.space.clone()).with_item_source(items);
        match preset.weight_limit {
            Some(limit) => bag.with_weight_limit(limit),
            None => bag,
        }
    }

    /// Refuse items that would push the carried weight past `limit`
    pub fn with_weight_limit(mut self, limit: f32) -> Self {
        self.weight_limit = Some(limit.max(0.0));
        self
    }

    /// Metadata source used to weigh items
    pub fn with_item_source(mut self, items: Arc<dyn ItemConfigSource>) -> Self {
        self.item_source = Some(items);
        self
    }

    pub fn weight_limit(&self) -> Option<f32> {
        self.weight_limit
    }

    pub fn current_weight(&self) -> f32 {
        self.current_weight
    }

    /// Remaining weight budget, `None` when unlimited
    pub fn remaining_weight(&self) -> Option<f32> {
        self.weight_limit
            .map(|limit| (limit - self.current_weight).max(0.0))
    }

    /// Lock or unlock a slot. A locked slot refuses new items; an item
    /// already in it stays put.
    pub fn set_slot_locked(&mut self, slot: SlotIndex, locked: bool) -> Result<()> {
        let space = self.core.space();
        let Some(mut state) = space.slot_state(slot) else {
            return Err(match space.space_type() {
                crate::config::SpaceType::Unordered => {
                    InventoryError::unsupported("set_slot_locked", space.space_type())
                }
                _ => InventoryError::invalid_topology(format!("slot {} is out of range", slot)),
            });
        };
        state.set(SlotState::LOCKED, locked);
        self.core.space_mut().update_slot_state(slot, state);
        log::debug!("Bag {:?} slot {} locked={}", self.core.id(), slot, locked);
        Ok(())
    }

    pub fn is_slot_locked(&self, slot: SlotIndex) -> bool {
        self.core
            .space()
            .slot_state(slot)
            .is_some_and(SlotState::is_locked)
    }

    /// First free slot, `None` when full
    pub fn find_available_slot(&self) -> Option<SlotIndex> {
        self.core.space().recommended_slot_index().ok().flatten()
    }

    fn weight_of(&self, item: &ItemRecord) -> f32 {
        self.item_source
            .as_ref()
            .map_or(0.0, |items| items.weight_of(&item.config))
    }

    fn fits_weight(&self, item: &ItemRecord) -> bool {
        match self.weight_limit {
            Some(limit) => self.current_weight + self.weight_of(item) <= limit,
            None => true,
        }
    }
}

impl fmt::Debug for BagContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BagContainer")
            .field("core", &self.core)
            .field("weight_limit", &self.weight_limit)
            .field("current_weight", &self.current_weight)
            .finish_non_exhaustive()
    }
}

impl Container for BagContainer {
    fn core(&self) -> &ContainerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ContainerCore {
        &mut self.core
    }

    fn kind(&self) -> ContainerKind {
        ContainerKind::Bag
    }

    fn can_add_item(&self, item: &ItemRecord, slot: SlotIndex) -> bool {
        self.core.can_add_item(slot) && self.fits_weight(item)
    }

    fn on_item_added(&mut self, item: &ItemRecord, events: &EventBus) {
        if self.core.track_added(item) {
            self.current_weight += self.weight_of(item);
            publish(self.changed_event(), events);
        }
    }

    fn on_item_removed(&mut self, item: &ItemRecord, events: &EventBus) {
        if self.core.track_removed(item) {
            self.current_weight = (self.current_weight - self.weight_of(item)).max(0.0);
            publish(self.changed_event(), events);
        }
    }

    fn on_reset(&mut self) {
        self.current_weight = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ItemMetadata, StaticItemConfigs};
    use crate::types::{ContainerId, ItemConfigId, ItemId, ItemLocation};

    fn items() -> Arc<dyn ItemConfigSource> {
        Arc::new(
            StaticItemConfigs::new()
                .with_item(
                    "anvil",
                    ItemMetadata {
                        weight: 30.0,
                        ..Default::default()
                    },
                )
                .with_item(
                    "feather",
                    ItemMetadata {
                        weight: 0.5,
                        ..Default::default()
                    },
                ),
        )
    }

    fn record(id: u32, config: &str, slot: i32) -> ItemRecord {
        ItemRecord::new(
            ItemId(id),
            ItemConfigId::new(config),
            ItemLocation::new(ContainerId(3), slot),
        )
    }

    #[test]
    fn test_weight_limit_refuses_heavy_items() {
        let events = EventBus::new();
        let mut bag = BagContainer::grid(2, 2)
            .with_item_source(items())
            .with_weight_limit(40.0);
        bag.init_container(ContainerId(3)).unwrap();

        let anvil = record(1, "anvil", 0);
        assert!(bag.can_add_item(&anvil, SlotIndex(0)));
        bag.on_item_added(&anvil, &events);
        assert_eq!(bag.current_weight(), 30.0);
        assert_eq!(bag.remaining_weight(), Some(10.0));

        assert!(!bag.can_add_item(&record(2, "anvil", 1), SlotIndex(1)));
        assert!(bag.can_add_item(&record(3, "feather", 1), SlotIndex(1)));

        bag.on_item_removed(&anvil, &events);
        assert_eq!(bag.current_weight(), 0.0);
    }

    #[test]
    fn test_locked_slot_refuses_items() {
        let mut bag = BagContainer::grid(2, 1);
        bag.init_container(ContainerId(3)).unwrap();

        bag.set_slot_locked(SlotIndex(1), true).unwrap();
        assert!(bag.is_slot_locked(SlotIndex(1)));
        assert!(!bag.can_add_item(&record(1, "feather", 1), SlotIndex(1)));
        assert_eq!(bag.find_available_slot(), Some(SlotIndex(0)));

        bag.set_slot_locked(SlotIndex(1), false).unwrap();
        assert!(bag.can_add_item(&record(1, "feather", 1), SlotIndex(1)));
    }

    #[test]
    fn test_unlocking_keeps_occupancy() {
        let events = EventBus::new();
        let mut bag = BagContainer::grid(1, 1);
        bag.init_container(ContainerId(3)).unwrap();
        bag.on_item_added(&record(1, "feather", 0), &events);

        bag.set_slot_locked(SlotIndex(0), true).unwrap();
        bag.set_slot_locked(SlotIndex(0), false).unwrap();
        assert_eq!(bag.space().slot_state(SlotIndex(0)), Some(SlotState::OCCUPIED));
    }

    #[test]
    fn test_locking_needs_slots() {
        let mut bag = BagContainer::new(SpaceConfig::unordered(5));
        bag.init_container(ContainerId(3)).unwrap();
        assert!(matches!(
            bag.set_slot_locked(SlotIndex(0), true),
            Err(InventoryError::UnsupportedOperation { .. })
        ));

        let mut bag = BagContainer::grid(2, 2);
        bag.init_container(ContainerId(3)).unwrap();
        assert!(matches!(
            bag.set_slot_locked(SlotIndex(9), true),
            Err(InventoryError::InvalidTopology(_))
        ));
    }
}
