//! Unordered space: a capacity and nothing else

use crate::config::SpaceConfig;
use crate::types::{SlotIndex, SlotState};

/// Space that does not care where items sit, only how many there are
#[derive(Debug, Clone)]
pub struct UnorderedSpace {
    /// Capacity limit (-1 = unbounded)
    capacity: i32,
    /// Items currently counted, maintained by the owning container
    item_count: usize,
}

impl UnorderedSpace {
    pub fn new() -> Self {
        Self {
            capacity: -1,
            item_count: 0,
        }
    }

    /// Reset from a config. Any negative capacity means unbounded.
    pub fn initialize(&mut self, config: &SpaceConfig) {
        self.capacity = config.capacity.max(-1);
        self.item_count = 0;
    }

    /// Capacity, or `None` when unbounded
    pub fn capacity(&self) -> Option<usize> {
        usize::try_from(self.capacity).ok()
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    fn has_room(&self) -> bool {
        self.capacity().map_or(true, |cap| self.item_count < cap)
    }

    /// `ANY` and every non-negative index address the same shared space
    pub fn is_valid_slot_index(&self, slot: SlotIndex) -> bool {
        slot.get() >= -1
    }

    /// Ignores the slot; true while capacity remains
    pub fn is_slot_available(&self, _slot: SlotIndex) -> bool {
        self.has_room()
    }

    pub fn can_add_item_to_slot(&self, slot: SlotIndex) -> bool {
        self.is_valid_slot_index(slot) && self.is_slot_available(slot)
    }

    /// Slot 0 while capacity remains
    pub fn recommended_slot_index(&self) -> Option<SlotIndex> {
        self.has_room().then_some(SlotIndex(0))
    }

    /// Occupying a slot counts one item in, anything else counts one out
    pub(crate) fn update_slot_state(&mut self, _slot: SlotIndex, state: SlotState) {
        if state.is_occupied() {
            self.item_count += 1;
        } else {
            self.item_count = self.item_count.saturating_sub(1);
        }
    }
}

impl Default for UnorderedSpace {
    fn default() -> Self {
        Self::new()
    }
}
