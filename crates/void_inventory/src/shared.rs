//! Thread-safe registry handle
//!
//! The registry is single-threaded; [`SharedItemRegistry`] serializes
//! access through one mutex held for the whole of each operation, so a
//! move is never observed half-applied.
//!
//! Event handlers run while the lock is held and must not call back into
//! the same handle.

use crate::container::Container;
use crate::error::Result;
use crate::registry::ItemRegistry;
use crate::types::{ContainerId, ItemConfigId, ItemId, ItemLocation};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use void_event::EventBus;

/// Cloneable handle to a registry behind a mutex
#[derive(Clone, Default)]
pub struct SharedItemRegistry {
    inner: Arc<Mutex<ItemRegistry>>,
}

impl SharedItemRegistry {
    pub fn new(registry: ItemRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Lock for a sequence of operations that must not interleave
    pub fn lock(&self) -> MutexGuard<'_, ItemRegistry> {
        self.inner.lock()
    }

    /// Run `f` with exclusive access
    pub fn with<R>(&self, f: impl FnOnce(&mut ItemRegistry) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn events(&self) -> Arc<EventBus> {
        self.inner.lock().events().clone()
    }

    pub fn register_container<C: Container + 'static>(&self, container: C) -> Result<ContainerId> {
        self.inner.lock().register_container(container)
    }

    pub fn create_item(&self, config: impl Into<ItemConfigId>, location: ItemLocation) -> Result<ItemId> {
        self.inner.lock().create_item(config, location)
    }

    pub fn move_item(&self, item: ItemId, target: ItemLocation) -> Result<()> {
        self.inner.lock().move_item(item, target)
    }

    pub fn item_location(&self, item: ItemId) -> Option<ItemLocation> {
        self.inner.lock().item_location(item)
    }
}

impl From<ItemRegistry> for SharedItemRegistry {
    fn from(registry: ItemRegistry) -> Self {
        Self::new(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpaceConfig;
    use crate::container::BaseContainer;
    use std::thread;

    #[test]
    fn test_concurrent_moves_keep_slots_consistent() {
        let shared = SharedItemRegistry::default();
        let grid = shared
            .register_container(BaseContainer::new(SpaceConfig::grid(4, 4)))
            .unwrap();
        let items: Vec<ItemId> = (0..8)
            .map(|_| shared.create_item("token", ItemLocation::void()).unwrap())
            .collect();

        // Every thread races for the same four slots
        let handles: Vec<_> = items
            .into_iter()
            .map(|item| {
                let shared = shared.clone();
                thread::spawn(move || {
                    (0..4).any(|slot| shared.move_item(item, ItemLocation::new(grid, slot)).is_ok())
                })
            })
            .collect();
        let placed = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|placed| *placed)
            .count();

        assert_eq!(placed, 4);
        shared.with(|registry| {
            let container = registry.container(grid).unwrap();
            assert_eq!(container.item_count(), 4);
            assert_eq!(container.space().occupied_count(), 4);
            assert_eq!(registry.items_in_container(grid).len(), 4);
        });
    }
}
