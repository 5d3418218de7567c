//! Fixed slot space: a predefined list of tagged slots
//!
//! UI mapping: every slot widget carries its slot-type tag; when an item is
//! dropped on it, look up the index with [`FixedSlotSpace::slot_index_by_tag`]
//! and hand the resulting location to the registry.

use crate::config::SpaceConfig;
use crate::error::{InventoryError, Result};
use crate::types::{SlotIndex, SlotState};
use void_core::Tag;

/// Space with one slot per configured tag. Several slots may share a tag.
#[derive(Debug, Clone, Default)]
pub struct FixedSlotSpace {
    /// Slot type by index
    slot_types: Vec<Tag>,
    /// Slot state by index, only updated through the owning container
    flags: Vec<SlotState>,
}

impl FixedSlotSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset from a config; an empty slot list is rejected
    pub fn initialize(&mut self, config: &SpaceConfig) -> Result<()> {
        if config.fixed_slot_types.is_empty() {
            return Err(InventoryError::invalid_topology(
                "fixed space needs at least one slot type",
            ));
        }
        self.slot_types = config.fixed_slot_types.clone();
        self.flags = vec![SlotState::empty(); self.slot_types.len()];
        Ok(())
    }

    /// Capacity is the slot count
    pub fn capacity(&self) -> usize {
        self.slot_types.len()
    }

    pub fn slot_count(&self) -> usize {
        self.slot_types.len()
    }

    pub fn is_valid_slot_index(&self, slot: SlotIndex) -> bool {
        slot.offset().is_some_and(|i| i < self.slot_types.len())
    }

    pub fn is_slot_available(&self, slot: SlotIndex) -> bool {
        self.slot_state(slot).is_some_and(SlotState::is_free)
    }

    pub fn can_add_item_to_slot(&self, slot: SlotIndex) -> bool {
        self.is_valid_slot_index(slot) && self.is_slot_available(slot)
    }

    /// First slot with this tag
    pub fn slot_index_by_tag(&self, tag: &Tag) -> Option<SlotIndex> {
        self.slot_index_by_tag_nth(tag, 0)
    }

    /// The `n`th slot (0-based) carrying this tag
    pub fn slot_index_by_tag_nth(&self, tag: &Tag, n: usize) -> Option<SlotIndex> {
        self.slot_types
            .iter()
            .enumerate()
            .filter(|(_, slot_type)| *slot_type == tag)
            .nth(n)
            .map(|(i, _)| SlotIndex::from(i))
    }

    /// Reverse lookup: the tag of a slot
    pub fn slot_type(&self, slot: SlotIndex) -> Option<&Tag> {
        slot.offset().and_then(|i| self.slot_types.get(i))
    }

    pub fn slot_types(&self) -> &[Tag] {
        &self.slot_types
    }

    pub fn slot_state(&self, slot: SlotIndex) -> Option<SlotState> {
        slot.offset().and_then(|i| self.flags.get(i).copied())
    }

    pub fn occupied_slots(&self) -> Vec<SlotIndex> {
        occupied(&self.flags)
    }

    pub(crate) fn update_slot_state(&mut self, slot: SlotIndex, state: SlotState) {
        match slot.offset().and_then(|i| self.flags.get_mut(i)) {
            Some(flag) => *flag = state,
            None => log::error!("Slot index {} not found in fixed slot space", slot),
        }
    }
}

pub(crate) fn occupied(flags: &[SlotState]) -> Vec<SlotIndex> {
    flags
        .iter()
        .enumerate()
        .filter(|(_, state)| state.is_occupied())
        .map(|(i, _)| SlotIndex::from(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space(tags: &[&str]) -> FixedSlotSpace {
        let mut space = FixedSlotSpace::new();
        space.initialize(&SpaceConfig::fixed(tags.iter().copied())).unwrap();
        space
    }

    #[test]
    fn test_tag_lookup() {
        let space = space(&["Head", "Body"]);
        assert_eq!(space.capacity(), 2);
        assert_eq!(space.slot_index_by_tag(&Tag::new("Body")), Some(SlotIndex(1)));
        assert_eq!(space.slot_index_by_tag(&Tag::new("Feet")), None);
        assert_eq!(space.slot_type(SlotIndex(0)), Some(&Tag::new("Head")));
        assert_eq!(space.slot_type(SlotIndex(2)), None);
    }

    #[test]
    fn test_shared_tags() {
        let space = space(&["Ring", "Neck", "Ring"]);
        let ring = Tag::new("Ring");
        assert_eq!(space.slot_index_by_tag_nth(&ring, 0), Some(SlotIndex(0)));
        assert_eq!(space.slot_index_by_tag_nth(&ring, 1), Some(SlotIndex(2)));
        assert_eq!(space.slot_index_by_tag_nth(&ring, 2), None);
    }

    #[test]
    fn test_occupancy() {
        let mut space = space(&["Head", "Body"]);
        assert!(space.can_add_item_to_slot(SlotIndex(1)));
        space.update_slot_state(SlotIndex(1), SlotState::OCCUPIED);
        assert!(!space.is_slot_available(SlotIndex(1)));
        assert_eq!(space.occupied_slots(), vec![SlotIndex(1)]);
        assert!(!space.can_add_item_to_slot(SlotIndex::ANY));
        assert!(!space.can_add_item_to_slot(SlotIndex(9)));
    }

    #[test]
    fn test_empty_slot_list_rejected() {
        let mut space = FixedSlotSpace::new();
        let err = space.initialize(&SpaceConfig::fixed(Vec::<Tag>::new()));
        assert!(matches!(err, Err(InventoryError::InvalidTopology(_))));
    }
}
