//! Slot-space strategies
//!
//! A [`SpaceManager`] answers every slot-topology question for one container:
//! which indices exist, which are free, where an unplaced item should go, and
//! how UI addresses (tags, grid coordinates) map to indices. It knows nothing
//! about items; it only holds per-slot [`SlotState`] flags, and only the owning
//! container changes them.

mod fixed;
mod grid;
mod unordered;

pub use crate::config::{SpaceConfig, SpaceType};
pub use fixed::FixedSlotSpace;
pub use grid::{GridSpace, MAX_GRID_SLOTS};
pub(crate) use grid::slot_count as grid_slot_count;
pub use unordered::UnorderedSpace;

use crate::error::{InventoryError, Result};
use crate::types::{SlotIndex, SlotState};
use void_core::Tag;

/// Closed set of space strategies
#[derive(Debug, Clone)]
pub enum SpaceManager {
    Unordered(UnorderedSpace),
    Fixed(FixedSlotSpace),
    Grid(GridSpace),
}

impl SpaceManager {
    /// Build and initialize the strategy selected by `config`
    pub fn from_config(config: &SpaceConfig) -> Result<Self> {
        let mut space = match config.space_type {
            SpaceType::Unordered => SpaceManager::Unordered(UnorderedSpace::new()),
            SpaceType::Fixed => SpaceManager::Fixed(FixedSlotSpace::new()),
            SpaceType::Grid => SpaceManager::Grid(GridSpace::new()),
        };
        space.initialize(config)?;
        Ok(space)
    }

    /// Reset all state from `config`. Switching strategy is not allowed.
    pub fn initialize(&mut self, config: &SpaceConfig) -> Result<()> {
        if config.space_type != self.space_type() {
            return Err(InventoryError::invalid_topology(format!(
                "cannot initialize a {:?} space from a {:?} config",
                self.space_type(),
                config.space_type
            )));
        }
        match self {
            SpaceManager::Unordered(space) => space.initialize(config),
            SpaceManager::Fixed(space) => space.initialize(config)?,
            SpaceManager::Grid(space) => space.initialize(config)?,
        }
        Ok(())
    }

    pub fn space_type(&self) -> SpaceType {
        match self {
            SpaceManager::Unordered(_) => SpaceType::Unordered,
            SpaceManager::Fixed(_) => SpaceType::Fixed,
            SpaceManager::Grid(_) => SpaceType::Grid,
        }
    }

    /// Total slot count, `None` when unbounded
    pub fn capacity(&self) -> Option<usize> {
        match self {
            SpaceManager::Unordered(space) => space.capacity(),
            SpaceManager::Fixed(space) => Some(space.capacity()),
            SpaceManager::Grid(space) => Some(space.capacity()),
        }
    }

    pub fn is_valid_slot_index(&self, slot: SlotIndex) -> bool {
        match self {
            SpaceManager::Unordered(space) => space.is_valid_slot_index(slot),
            SpaceManager::Fixed(space) => space.is_valid_slot_index(slot),
            SpaceManager::Grid(space) => space.is_valid_slot_index(slot),
        }
    }

    /// Valid and free. Unordered spaces ignore the slot and check capacity.
    pub fn is_slot_available(&self, slot: SlotIndex) -> bool {
        match self {
            SpaceManager::Unordered(space) => space.is_slot_available(slot),
            SpaceManager::Fixed(space) => space.is_slot_available(slot),
            SpaceManager::Grid(space) => space.is_slot_available(slot),
        }
    }

    pub fn can_add_item_to_slot(&self, slot: SlotIndex) -> bool {
        self.is_valid_slot_index(slot) && self.is_slot_available(slot)
    }

    /// Slot for callers that do not pick one. `Ok(None)` means full.
    ///
    /// Fixed spaces have no sensible general answer and report
    /// [`InventoryError::UnsupportedOperation`].
    pub fn recommended_slot_index(&self) -> Result<Option<SlotIndex>> {
        match self {
            SpaceManager::Unordered(space) => Ok(space.recommended_slot_index()),
            SpaceManager::Fixed(_) => Err(self.unsupported("recommended_slot_index")),
            SpaceManager::Grid(space) => Ok(space.recommended_slot_index()),
        }
    }

    /// First slot carrying `tag` (fixed spaces only)
    pub fn slot_index_by_tag(&self, tag: &Tag) -> Result<Option<SlotIndex>> {
        match self {
            SpaceManager::Fixed(space) => Ok(space.slot_index_by_tag(tag)),
            _ => Err(self.unsupported("slot_index_by_tag")),
        }
    }

    /// Tag of a slot (fixed spaces only)
    pub fn slot_type(&self, slot: SlotIndex) -> Result<Option<Tag>> {
        match self {
            SpaceManager::Fixed(space) => Ok(space.slot_type(slot).cloned()),
            _ => Err(self.unsupported("slot_type")),
        }
    }

    /// Slot at grid coordinate (grid spaces only)
    pub fn slot_index_by_xy(&self, x: i32, y: i32) -> Result<Option<SlotIndex>> {
        match self {
            SpaceManager::Grid(space) => Ok(space.slot_index_by_xy(x, y)),
            _ => Err(self.unsupported("slot_index_by_xy")),
        }
    }

    /// Grid coordinate of a slot (grid spaces only)
    pub fn index_to_coordinate(&self, slot: SlotIndex) -> Result<Option<(i32, i32)>> {
        match self {
            SpaceManager::Grid(space) => Ok(space.index_to_coordinate(slot)),
            _ => Err(self.unsupported("index_to_coordinate")),
        }
    }

    /// Per-slot state. Unordered spaces have no per-slot state.
    pub fn slot_state(&self, slot: SlotIndex) -> Option<SlotState> {
        match self {
            SpaceManager::Unordered(_) => None,
            SpaceManager::Fixed(space) => space.slot_state(slot),
            SpaceManager::Grid(space) => space.slot_state(slot),
        }
    }

    /// Sorted list of slots whose occupancy flag is set
    pub fn occupied_slots(&self) -> Vec<SlotIndex> {
        match self {
            SpaceManager::Unordered(_) => Vec::new(),
            SpaceManager::Fixed(space) => space.occupied_slots(),
            SpaceManager::Grid(space) => space.occupied_slots(),
        }
    }

    /// Number of occupied positions
    pub fn occupied_count(&self) -> usize {
        match self {
            SpaceManager::Unordered(space) => space.item_count(),
            SpaceManager::Fixed(space) => space.occupied_slots().len(),
            SpaceManager::Grid(space) => space.occupied_slots().len(),
        }
    }

    pub fn as_fixed(&self) -> Option<&FixedSlotSpace> {
        match self {
            SpaceManager::Fixed(space) => Some(space),
            _ => None,
        }
    }

    pub fn as_grid(&self) -> Option<&GridSpace> {
        match self {
            SpaceManager::Grid(space) => Some(space),
            _ => None,
        }
    }

    /// Overwrite a slot's state. Only containers call this.
    pub(crate) fn update_slot_state(&mut self, slot: SlotIndex, state: SlotState) {
        match self {
            SpaceManager::Unordered(space) => space.update_slot_state(slot, state),
            SpaceManager::Fixed(space) => space.update_slot_state(slot, state),
            SpaceManager::Grid(space) => space.update_slot_state(slot, state),
        }
    }

    /// Set or clear the occupancy bit, keeping other bits
    pub(crate) fn set_occupied(&mut self, slot: SlotIndex, occupied: bool) {
        let mut state = self.slot_state(slot).unwrap_or_default();
        state.set(SlotState::OCCUPIED, occupied);
        self.update_slot_state(slot, state);
    }

    fn unsupported(&self, operation: &'static str) -> InventoryError {
        log::error!("{} is not supported by {:?} space", operation, self.space_type());
        InventoryError::unsupported(operation, self.space_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_selects_strategy() {
        let space = SpaceManager::from_config(&SpaceConfig::grid(3, 2)).unwrap();
        assert_eq!(space.space_type(), SpaceType::Grid);
        assert_eq!(space.capacity(), Some(6));

        let space = SpaceManager::from_config(&SpaceConfig::unbounded()).unwrap();
        assert_eq!(space.capacity(), None);

        let space = SpaceManager::from_config(&SpaceConfig::fixed(["Head"])).unwrap();
        assert_eq!(space.capacity(), Some(1));
    }

    #[test]
    fn test_unsupported_addressing() {
        let grid = SpaceManager::from_config(&SpaceConfig::grid(2, 2)).unwrap();
        assert!(matches!(
            grid.slot_index_by_tag(&Tag::new("Head")),
            Err(InventoryError::UnsupportedOperation { space: SpaceType::Grid, .. })
        ));
        assert_eq!(grid.slot_index_by_xy(1, 1).unwrap(), Some(SlotIndex(3)));

        let fixed = SpaceManager::from_config(&SpaceConfig::fixed(["Head", "Body"])).unwrap();
        assert!(fixed.recommended_slot_index().is_err());
        assert!(fixed.slot_index_by_xy(0, 0).is_err());
        assert!(fixed.index_to_coordinate(SlotIndex(0)).is_err());

        let unordered = SpaceManager::from_config(&SpaceConfig::unordered(1)).unwrap();
        assert!(unordered.slot_index_by_tag(&Tag::new("Head")).is_err());
        assert!(unordered.slot_type(SlotIndex(0)).is_err());
        assert_eq!(unordered.recommended_slot_index().unwrap(), Some(SlotIndex(0)));
    }

    #[test]
    fn test_set_occupied_keeps_lock_bit() {
        let mut space = SpaceManager::from_config(&SpaceConfig::grid(2, 1)).unwrap();
        space.update_slot_state(SlotIndex(0), SlotState::LOCKED);
        space.set_occupied(SlotIndex(0), true);
        assert_eq!(
            space.slot_state(SlotIndex(0)),
            Some(SlotState::LOCKED | SlotState::OCCUPIED)
        );
        space.set_occupied(SlotIndex(0), false);
        assert_eq!(space.slot_state(SlotIndex(0)), Some(SlotState::LOCKED));
    }

    #[test]
    fn test_reinitialize_resets_flags() {
        let mut space = SpaceManager::from_config(&SpaceConfig::grid(2, 1)).unwrap();
        space.set_occupied(SlotIndex(1), true);
        space.initialize(&SpaceConfig::grid(2, 1)).unwrap();
        assert!(space.occupied_slots().is_empty());
        assert!(space.initialize(&SpaceConfig::unbounded()).is_err());
    }

    #[test]
    fn test_invalid_fixed_topology() {
        let result = SpaceManager::from_config(&SpaceConfig::fixed(Vec::<Tag>::new()));
        assert!(matches!(result, Err(InventoryError::InvalidTopology(_))));
    }

    #[test]
    fn test_oversized_grid_preset_is_an_error() {
        let preset: crate::config::ContainerPreset = toml::from_str(
            "space = { space_type = \"grid\", grid_width = 65536, grid_height = 65536 }",
        )
        .unwrap();
        assert!(matches!(
            SpaceManager::from_config(&preset.space),
            Err(InventoryError::InvalidTopology(_))
        ));
        assert!(preset.space.validate().is_err());
    }
}
