//! Item registry
//!
//! The registry is the single source of truth for item locations. It owns
//! every [`ItemRecord`] and every registered container, hands out ids, and
//! runs the move protocol:
//!
//! 1. the item must exist
//! 2. the target container must be registered
//! 3. the target slot must be valid and the target container must admit
//!    the item: `can_move_item` inside one container, `can_add_item` across
//!    containers
//! 4. only then is the record's location rewritten
//! 5. containers are notified: `on_item_moved` for a relocation inside one
//!    container, otherwise `on_item_removed` on the source (if still
//!    registered) followed by `on_item_added` on the target
//!
//! A refused move returns an error and leaves records, slot flags and
//! container contents exactly as they were.

mod equip;
mod loot;

pub use loot::TakeAllReport;

use crate::container::{Container, VoidContainer};
use crate::error::{InventoryError, Result};
use crate::space::SpaceType;
use crate::types::{ContainerId, ItemConfigId, ItemId, ItemLocation, ItemRecord, SlotIndex};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use void_core::IdGenerator;
use void_event::EventBus;

/// Owner of all items and containers
pub struct ItemRegistry {
    items: BTreeMap<ItemId, ItemRecord>,
    containers: HashMap<ContainerId, Box<dyn Container>>,
    item_ids: IdGenerator,
    container_ids: IdGenerator,
    events: Arc<EventBus>,
}

impl ItemRegistry {
    /// Registry with only the void container
    pub fn new() -> Self {
        Self::with_event_bus(Arc::new(EventBus::new()))
    }

    /// Registry publishing on an existing bus
    pub fn with_event_bus(events: Arc<EventBus>) -> Self {
        let mut registry = Self {
            items: BTreeMap::new(),
            containers: HashMap::new(),
            item_ids: IdGenerator::starting_at(ItemId::NONE.0 as u64 + 1),
            container_ids: IdGenerator::starting_at(ContainerId::VOID.0 as u64),
            events,
        };
        match registry.register_container(VoidContainer::new()) {
            Ok(id) => debug_assert!(id.is_void()),
            Err(err) => log::error!("Failed to register the void container: {}", err),
        }
        registry
    }

    /// Bus on which containers publish [`InventoryEvent`](crate::event::InventoryEvent)s
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    // ---- containers ----

    /// Assign the next container id and initialize the container. Nothing
    /// is registered if initialization fails.
    pub fn register_container<C: Container + 'static>(&mut self, container: C) -> Result<ContainerId> {
        self.register_boxed(Box::new(container))
    }

    pub fn register_boxed(&mut self, mut container: Box<dyn Container>) -> Result<ContainerId> {
        let id = ContainerId(self.container_ids.peek() as u32);
        container.init_container(id)?;
        self.container_ids.next();
        log::debug!(
            "Registered container {} ({:?}, {:?} space)",
            id,
            container.kind(),
            container.space().space_type()
        );
        self.containers.insert(id, container);
        Ok(id)
    }

    /// Remove a container. Items still inside are parked in the void
    /// container. The void container itself cannot be removed.
    pub fn unregister_container(&mut self, id: ContainerId) -> Result<Box<dyn Container>> {
        if id.is_void() {
            return Err(InventoryError::VoidContainerProtected);
        }
        let container = self.containers.remove(&id).ok_or_else(|| {
            log::error!("Cannot unregister unknown container {}", id);
            InventoryError::ContainerNotFound(id)
        })?;

        let mut parked = 0usize;
        for record in self.items.values_mut() {
            if record.location.container != id {
                continue;
            }
            record.location = ItemLocation::void();
            if let Some(void) = self.containers.get_mut(&ContainerId::VOID) {
                void.on_item_added(record, &self.events);
            }
            parked += 1;
        }
        if parked > 0 {
            log::warn!("Unregistered container {} still held {} items, parked in the void", id, parked);
        } else {
            log::debug!("Unregistered container {}", id);
        }
        Ok(container)
    }

    pub fn is_registered(&self, id: ContainerId) -> bool {
        self.containers.contains_key(&id)
    }

    pub fn container(&self, id: ContainerId) -> Option<&dyn Container> {
        self.containers.get(&id).map(|container| container.as_ref())
    }

    /// Typed access to a registered container
    pub fn container_as<T: Container + 'static>(&self, id: ContainerId) -> Option<&T> {
        let container = self.containers.get(&id)?;
        (**container).as_any().downcast_ref::<T>()
    }

    /// Typed mutable access, for configuration such as locking bag slots.
    /// Contents must only change through the registry.
    pub fn container_as_mut<T: Container + 'static>(&mut self, id: ContainerId) -> Option<&mut T> {
        let container = self.containers.get_mut(&id)?;
        (**container).as_any_mut().downcast_mut::<T>()
    }

    /// Registered container ids, ascending
    pub fn container_ids(&self) -> Vec<ContainerId> {
        let mut ids: Vec<_> = self.containers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    // ---- items ----

    /// Create an item and notify its container
    pub fn create_item(
        &mut self,
        config: impl Into<ItemConfigId>,
        location: ItemLocation,
    ) -> Result<ItemId> {
        self.create_item_with(config, location, true)
    }

    /// Create an item. The target slot must be free in the container's
    /// space. An `ANY` slot on a slotted space resolves to the recommended
    /// slot.
    ///
    /// With `notify == false` the container is not told about the item;
    /// the caller must follow up with [`ItemRegistry::resync_container`]
    /// before further moves into that container. Used for bulk restores.
    pub fn create_item_with(
        &mut self,
        config: impl Into<ItemConfigId>,
        location: ItemLocation,
        notify: bool,
    ) -> Result<ItemId> {
        let config = config.into();
        let container = self.containers.get(&location.container).ok_or_else(|| {
            log::error!("Cannot create {} in unknown container {}", config, location.container);
            InventoryError::ContainerNotFound(location.container)
        })?;

        let space = container.space();
        let slot = if location.slot.is_any() && space.space_type() != SpaceType::Unordered {
            space.recommended_slot_index()?.unwrap_or(SlotIndex::ANY)
        } else {
            location.slot
        };
        if !space.can_add_item_to_slot(slot) {
            log::warn!("Container {} has no room for {} at slot {}", location.container, config, slot);
            return Err(InventoryError::AdmissionDenied {
                item: ItemId::NONE,
                container: location.container,
                slot,
            });
        }

        let id = ItemId(self.item_ids.next() as u32);
        let record = ItemRecord::new(id, config, ItemLocation::new(location.container, slot));
        if notify {
            if let Some(container) = self.containers.get_mut(&location.container) {
                container.on_item_added(&record, &self.events);
            }
        }
        log::debug!("Created item {} ({}) at {}", id, record.config, record.location);
        self.items.insert(id, record);
        Ok(id)
    }

    /// Forget an item and notify its container
    pub fn remove_item(&mut self, item: ItemId) -> Result<ItemRecord> {
        let record = self
            .items
            .remove(&item)
            .ok_or(InventoryError::ItemNotFound(item))?;
        if let Some(container) = self.containers.get_mut(&record.location.container) {
            container.on_item_removed(&record, &self.events);
        }
        log::debug!("Removed item {} from {}", item, record.location);
        Ok(record)
    }

    pub fn item(&self, item: ItemId) -> Option<&ItemRecord> {
        self.items.get(&item)
    }

    pub fn item_location(&self, item: ItemId) -> Option<ItemLocation> {
        self.items.get(&item).map(|record| record.location)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// All records in id order
    pub fn items(&self) -> impl Iterator<Item = &ItemRecord> {
        self.items.values()
    }

    /// Ids of items located in a container, ascending
    pub fn items_in_container(&self, container: ContainerId) -> Vec<ItemId> {
        self.items
            .values()
            .filter(|record| record.location.container == container)
            .map(|record| record.id)
            .collect()
    }

    /// Item occupying an exact slot. `ANY` never matches.
    pub fn item_at(&self, location: ItemLocation) -> Option<ItemId> {
        if location.slot.is_any() {
            return None;
        }
        self.items
            .values()
            .find(|record| record.location == location)
            .map(|record| record.id)
    }

    // ---- moves ----

    /// Run every move check without changing anything. Returns the current
    /// record on success.
    pub fn check_move(&self, item: ItemId, target: ItemLocation) -> Result<&ItemRecord> {
        let record = self
            .items
            .get(&item)
            .ok_or(InventoryError::ItemNotFound(item))?;
        let container = self
            .containers
            .get(&target.container)
            .ok_or(InventoryError::ContainerNotFound(target.container))?;

        let valid = container.space().is_valid_slot_index(target.slot);
        if record.location.container == target.container {
            if !valid || !container.can_move_item(record, target.slot) {
                return Err(InventoryError::MoveDenied {
                    item,
                    container: target.container,
                    slot: target.slot,
                });
            }
        } else if !valid || !container.can_add_item(record, target.slot) {
            return Err(InventoryError::AdmissionDenied {
                item,
                container: target.container,
                slot: target.slot,
            });
        }
        Ok(record)
    }

    /// Move an item. On error nothing has changed.
    pub fn move_item(&mut self, item: ItemId, target: ItemLocation) -> Result<()> {
        let old = match self.check_move(item, target) {
            Ok(record) => record.clone(),
            Err(err) => {
                match &err {
                    InventoryError::ContainerNotFound(id) => {
                        log::error!("Move of item {} refused: container {} is not registered", item, id)
                    }
                    _ => log::warn!("Move of item {} to {} refused: {}", item, target, err),
                }
                return Err(err);
            }
        };

        let updated = old.relocated(target);
        self.items.insert(item, updated.clone());

        let events = &self.events;
        if old.location.container == target.container {
            if let Some(container) = self.containers.get_mut(&target.container) {
                container.on_item_moved(old.location, &updated, events);
            }
        } else {
            if let Some(source) = self.containers.get_mut(&old.location.container) {
                source.on_item_removed(&old, events);
            }
            if let Some(destination) = self.containers.get_mut(&target.container) {
                destination.on_item_added(&updated, events);
            }
        }
        log::debug!("Moved item {} from {} to {}", item, old.location, target);
        Ok(())
    }

    /// Move an item to the target container's recommended slot. Returns
    /// the chosen slot.
    pub fn move_item_anywhere(&mut self, item: ItemId, container: ContainerId) -> Result<SlotIndex> {
        let space = self
            .containers
            .get(&container)
            .ok_or(InventoryError::ContainerNotFound(container))?
            .space();
        let slot = space
            .recommended_slot_index()?
            .ok_or(InventoryError::AdmissionDenied {
                item,
                container,
                slot: SlotIndex::ANY,
            })?;
        self.move_item(item, ItemLocation::new(container, slot))?;
        Ok(slot)
    }

    /// Rebuild a container's contents and slot flags from the records
    pub fn resync_container(&mut self, id: ContainerId) -> Result<()> {
        let records: Vec<ItemRecord> = self
            .items
            .values()
            .filter(|record| record.location.container == id)
            .cloned()
            .collect();
        let container = self
            .containers
            .get_mut(&id)
            .ok_or(InventoryError::ContainerNotFound(id))?;
        container.resync(&records, &self.events)?;
        log::debug!("Resynced container {} with {} items", id, records.len());
        Ok(())
    }
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ItemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemRegistry")
            .field("items", &self.items.len())
            .field("containers", &self.container_ids())
            .finish()
    }
}
