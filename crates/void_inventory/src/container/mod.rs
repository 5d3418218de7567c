//! Containers
//!
//! A container binds a [`SpaceManager`] to the set of items it currently
//! holds and decides admission. Containers never own item data: the
//! [`ItemRegistry`](crate::registry::ItemRegistry) passes [`ItemRecord`]s into
//! the notification callbacks, and containers only keep the ids.
//!
//! All shared bookkeeping lives in [`ContainerCore`]; the trait's default
//! methods delegate to it, so a specialization overrides only what differs.

mod bag;
mod equipment;
mod loot;
mod void;

pub use bag::BagContainer;
pub use equipment::{slot_types, EquipmentContainer, EquipmentSlot};
pub use loot::LootContainer;
pub use void::VoidContainer;

use crate::config::SpaceConfig;
use crate::error::{InventoryError, Result};
use crate::event::InventoryEvent;
use crate::space::SpaceManager;
use crate::types::{ContainerId, ContainerKind, ItemId, ItemLocation, ItemRecord, SlotIndex};
use indexmap::IndexSet;
use std::any::Any;
use void_event::EventBus;

/// Upcast to `Any` for typed access to concrete containers
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Shared container state: id, space, and held item ids
#[derive(Debug, Clone)]
pub struct ContainerCore {
    id: Option<ContainerId>,
    config: SpaceConfig,
    space: SpaceManager,
    /// Held items in insertion order
    items: IndexSet<ItemId>,
}

impl ContainerCore {
    /// Create an uninitialized core; the space is built by [`ContainerCore::init`]
    pub fn new(config: SpaceConfig) -> Self {
        Self {
            id: None,
            config,
            space: SpaceManager::Unordered(Default::default()),
            items: IndexSet::new(),
        }
    }

    /// Assign the id and build the space. Runs exactly once.
    pub fn init(&mut self, id: ContainerId) -> Result<()> {
        if let Some(existing) = self.id {
            return Err(InventoryError::ContainerAlreadyInitialized(existing));
        }
        self.space = SpaceManager::from_config(&self.config)?;
        self.id = Some(id);
        Ok(())
    }

    /// Replace the config before initialization
    pub(crate) fn set_config(&mut self, config: SpaceConfig) {
        self.config = config;
    }

    /// Drop all held items and reset the space, keeping the id
    pub fn reset(&mut self) -> Result<()> {
        self.space.initialize(&self.config)?;
        self.items.clear();
        Ok(())
    }

    pub fn id(&self) -> Option<ContainerId> {
        self.id
    }

    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    pub fn space(&self) -> &SpaceManager {
        &self.space
    }

    pub(crate) fn space_mut(&mut self) -> &mut SpaceManager {
        &mut self.space
    }

    pub fn items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().copied()
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Capacity left and the slot free
    pub fn can_add_item(&self, slot: SlotIndex) -> bool {
        if let Some(capacity) = self.space.capacity() {
            if self.items.len() >= capacity {
                return false;
            }
        }
        self.space.is_slot_available(slot)
    }

    /// The item is already counted, so only the slot matters
    pub fn can_move_item(&self, slot: SlotIndex) -> bool {
        self.space.is_slot_available(slot)
    }

    /// Start tracking an item. Returns false if it was already tracked.
    pub fn track_added(&mut self, item: &ItemRecord) -> bool {
        if !self.items.insert(item.id) {
            return false;
        }
        self.space.set_occupied(item.location.slot, true);
        true
    }

    /// Relocate a tracked item: free the old slot, then occupy the new one
    pub fn track_moved(&mut self, old_location: ItemLocation, item: &ItemRecord) -> bool {
        if !self.items.contains(&item.id) {
            log::warn!(
                "Container {:?} asked to move untracked item {}, tracking it",
                self.id,
                item.id
            );
            return self.track_added(item);
        }
        self.space.set_occupied(old_location.slot, false);
        self.space.set_occupied(item.location.slot, true);
        true
    }

    /// Stop tracking an item. Returns false if it was not tracked.
    pub fn track_removed(&mut self, item: &ItemRecord) -> bool {
        if !self.items.shift_remove(&item.id) {
            return false;
        }
        self.space.set_occupied(item.location.slot, false);
        true
    }
}

/// Capability interface implemented by every container kind
pub trait Container: AsAny + Send {
    fn core(&self) -> &ContainerCore;

    fn core_mut(&mut self) -> &mut ContainerCore;

    fn kind(&self) -> ContainerKind;

    /// Assign the id and build the space; called once by the registry
    fn init_container(&mut self, id: ContainerId) -> Result<()> {
        self.core_mut().init(id)
    }

    fn container_id(&self) -> Option<ContainerId> {
        self.core().id()
    }

    /// Admission for items arriving from another container
    fn can_add_item(&self, _item: &ItemRecord, slot: SlotIndex) -> bool {
        self.core().can_add_item(slot)
    }

    /// Admission for relocation inside this container
    fn can_move_item(&self, _item: &ItemRecord, slot: SlotIndex) -> bool {
        self.core().can_move_item(slot)
    }

    /// Event published after any content change, if any
    fn changed_event(&self) -> Option<InventoryEvent> {
        self.container_id()
            .map(|container| InventoryEvent::ContainerChanged { container })
    }

    /// Idempotent
    fn on_item_added(&mut self, item: &ItemRecord, events: &EventBus) {
        if self.core_mut().track_added(item) {
            publish(self.changed_event(), events);
        }
    }

    /// Called only for relocation inside this container
    fn on_item_moved(&mut self, old_location: ItemLocation, item: &ItemRecord, events: &EventBus) {
        if self.core_mut().track_moved(old_location, item) {
            publish(self.changed_event(), events);
        }
    }

    /// Idempotent
    fn on_item_removed(&mut self, item: &ItemRecord, events: &EventBus) {
        if self.core_mut().track_removed(item) {
            publish(self.changed_event(), events);
        }
    }

    /// Clear specialization state before a resync
    fn on_reset(&mut self) {}

    /// Rebuild held items and slot flags from the registry's records
    fn resync(&mut self, items: &[ItemRecord], events: &EventBus) -> Result<()> {
        self.core_mut().reset()?;
        self.on_reset();
        for item in items {
            self.on_item_added(item, events);
        }
        Ok(())
    }

    /// Held items in insertion order
    fn all_items(&self) -> Vec<ItemId> {
        self.core().items().collect()
    }

    fn contains_item(&self, item: ItemId) -> bool {
        self.core().contains(item)
    }

    fn item_count(&self) -> usize {
        self.core().item_count()
    }

    fn space(&self) -> &SpaceManager {
        self.core().space()
    }
}

pub(crate) fn publish(event: Option<InventoryEvent>, events: &EventBus) {
    if let Some(event) = event {
        events.publish(event);
    }
}

/// Plain container over any space configuration
#[derive(Debug, Clone)]
pub struct BaseContainer {
    core: ContainerCore,
}

impl BaseContainer {
    pub fn new(config: SpaceConfig) -> Self {
        Self {
            core: ContainerCore::new(config),
        }
    }
}

impl Container for BaseContainer {
    fn core(&self) -> &ContainerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ContainerCore {
        &mut self.core
    }

    fn kind(&self) -> ContainerKind {
        ContainerKind::Base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemConfigId, SlotState};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn record(id: u32, container: ContainerId, slot: i32) -> ItemRecord {
        ItemRecord::new(
            ItemId(id),
            ItemConfigId::new("test"),
            ItemLocation::new(container, slot),
        )
    }

    fn grid_container() -> BaseContainer {
        let mut container = BaseContainer::new(SpaceConfig::grid(2, 2));
        container.init_container(ContainerId(1)).unwrap();
        container
    }

    #[test]
    fn test_init_runs_once() {
        let mut container = grid_container();
        assert_eq!(container.container_id(), Some(ContainerId(1)));
        assert!(matches!(
            container.init_container(ContainerId(2)),
            Err(InventoryError::ContainerAlreadyInitialized(ContainerId(1)))
        ));
    }

    #[test]
    fn test_added_and_removed_are_idempotent() {
        let events = EventBus::new();
        let mut container = grid_container();
        let item = record(1, ContainerId(1), 2);

        container.on_item_added(&item, &events);
        container.on_item_added(&item, &events);
        assert_eq!(container.all_items(), vec![ItemId(1)]);
        assert_eq!(container.space().occupied_slots(), vec![SlotIndex(2)]);

        container.on_item_removed(&item, &events);
        container.on_item_removed(&item, &events);
        assert!(container.all_items().is_empty());
        assert!(container.space().occupied_slots().is_empty());
        assert_eq!(events.published_count(), 2);
    }

    #[test]
    fn test_moved_frees_then_occupies() {
        let events = EventBus::new();
        let mut container = grid_container();
        let item = record(1, ContainerId(1), 0);
        container.on_item_added(&item, &events);

        let moved = item.relocated(ItemLocation::new(ContainerId(1), 3));
        container.on_item_moved(item.location, &moved, &events);

        assert_eq!(container.space().slot_state(SlotIndex(0)), Some(SlotState::empty()));
        assert_eq!(container.space().occupied_slots(), vec![SlotIndex(3)]);
        assert_eq!(container.item_count(), 1);
    }

    #[test]
    fn test_admission_respects_capacity_and_slots() {
        let events = EventBus::new();
        let mut container = BaseContainer::new(SpaceConfig::unordered(1));
        container.init_container(ContainerId(4)).unwrap();
        let item = record(1, ContainerId(4), -1);

        assert!(container.can_add_item(&item, SlotIndex::ANY));
        container.on_item_added(&item, &events);
        assert!(!container.can_add_item(&record(2, ContainerId(9), -1), SlotIndex::ANY));

        let grid = grid_container();
        assert!(grid.can_add_item(&item, SlotIndex(3)));
        assert!(!grid.can_add_item(&item, SlotIndex(4)));
        assert!(!grid.can_add_item(&item, SlotIndex::ANY));
    }

    #[test]
    fn test_all_items_keeps_insertion_order() {
        let events = EventBus::new();
        let mut container = grid_container();
        for (id, slot) in [(7, 3), (2, 0), (5, 1)] {
            container.on_item_added(&record(id, ContainerId(1), slot), &events);
        }
        container.on_item_removed(&record(2, ContainerId(1), 0), &events);
        assert_eq!(container.all_items(), vec![ItemId(7), ItemId(5)]);
    }

    #[test]
    fn test_changes_are_published() {
        let events = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        events.subscribe(move |e: &InventoryEvent| sink.lock().push(e.clone()));

        let mut container = grid_container();
        container.on_item_added(&record(1, ContainerId(1), 0), &events);

        assert_eq!(
            seen.lock().as_slice(),
            &[InventoryEvent::ContainerChanged { container: ContainerId(1) }]
        );
    }

    #[test]
    fn test_resync_rebuilds_state() {
        let events = EventBus::new();
        let mut container = grid_container();
        container.on_item_added(&record(1, ContainerId(1), 0), &events);

        let records = vec![record(4, ContainerId(1), 1), record(6, ContainerId(1), 2)];
        container.resync(&records, &events).unwrap();

        assert_eq!(container.all_items(), vec![ItemId(4), ItemId(6)]);
        assert_eq!(container.space().occupied_slots(), vec![SlotIndex(1), SlotIndex(2)]);
    }
}
