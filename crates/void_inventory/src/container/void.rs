use super::{Container, ContainerCore};
use crate::config::SpaceConfig;
use crate::event::InventoryEvent;
use crate::types::{ContainerKind, ItemRecord, SlotIndex};

/// The "no location" container. Always id 0, always admits, never notifies.
#[derive(Debug, Clone)]
pub struct VoidContainer {
    core: ContainerCore,
}

impl VoidContainer {
    pub fn new() -> Self {
        Self {
            core: ContainerCore::new(SpaceConfig::unbounded()),
        }
    }
}

impl Default for VoidContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for VoidContainer {
    fn core(&self) -> &ContainerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ContainerCore {
        &mut self.core
    }

    fn kind(&self) -> ContainerKind {
        ContainerKind::Void
    }

    fn can_add_item(&self, _item: &ItemRecord, _slot: SlotIndex) -> bool {
        true
    }

    fn can_move_item(&self, _item: &ItemRecord, _slot: SlotIndex) -> bool {
        true
    }

    fn changed_event(&self) -> Option<InventoryEvent> {
        None
    }
}
