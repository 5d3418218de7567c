use super::{Container, ContainerCore};
use crate::config::{LootEntry, SpaceConfig};
use crate::event::InventoryEvent;
use crate::types::{ContainerKind, ItemRecord, SlotIndex};

/// World loot: filled from a loot table by the registry, never accepts
/// items from other containers
#[derive(Debug, Clone)]
pub struct LootContainer {
    core: ContainerCore,
    table: Vec<LootEntry>,
    generated: bool,
}

impl LootContainer {
    pub fn new() -> Self {
        Self::with_table(Vec::new())
    }

    pub fn with_table(table: Vec<LootEntry>) -> Self {
        Self {
            core: ContainerCore::new(SpaceConfig::unbounded()),
            table,
            generated: false,
        }
    }

    pub fn add_loot_entry(&mut self, entry: LootEntry) {
        self.table.push(entry);
    }

    /// Drop all table rows. Generated items are untouched.
    pub fn clear_loot_entries(&mut self) {
        self.table.clear();
    }

    pub fn loot_table(&self) -> &[LootEntry] {
        &self.table
    }

    /// Whether the table has been rolled since the last clear
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub(crate) fn set_generated(&mut self, generated: bool) {
        self.generated = generated;
    }

    pub fn loot_item_count(&self) -> usize {
        self.core.item_count()
    }
}

impl Default for LootContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for LootContainer {
    fn core(&self) -> &ContainerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ContainerCore {
        &mut self.core
    }

    fn kind(&self) -> ContainerKind {
        ContainerKind::Loot
    }

    fn can_add_item(&self, _item: &ItemRecord, _slot: SlotIndex) -> bool {
        false
    }

    fn changed_event(&self) -> Option<InventoryEvent> {
        self.core
            .id()
            .map(|container| InventoryEvent::LootChanged { container })
    }
}
