//! Grid space: a width x height grid addressed row-major

use super::fixed::occupied;
use crate::config::SpaceConfig;
use crate::error::{InventoryError, Result};
use crate::types::{SlotIndex, SlotState};

/// Largest number of cells a grid may have
pub const MAX_GRID_SLOTS: usize = 1 << 20;

/// Cell count for clamped dimensions, `None` past [`MAX_GRID_SLOTS`]
pub(crate) fn slot_count(width: i32, height: i32) -> Option<usize> {
    let width = usize::try_from(width.max(1)).ok()?;
    let height = usize::try_from(height.max(1)).ok()?;
    width
        .checked_mul(height)
        .filter(|count| *count <= MAX_GRID_SLOTS)
}

/// 2D grid of slots, `index = y * width + x`
#[derive(Debug, Clone)]
pub struct GridSpace {
    width: i32,
    height: i32,
    /// Slot state by index, only updated through the owning container
    flags: Vec<SlotState>,
}

impl GridSpace {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            flags: Vec::new(),
        }
    }

    /// Reset from a config. Non-positive dimensions are clamped to 1; grids
    /// over [`MAX_GRID_SLOTS`] cells are rejected and leave the space as it was.
    pub fn initialize(&mut self, config: &SpaceConfig) -> Result<()> {
        let count = slot_count(config.grid_width, config.grid_height).ok_or_else(|| {
            InventoryError::invalid_topology(format!(
                "grid {}x{} exceeds {} slots",
                config.grid_width, config.grid_height, MAX_GRID_SLOTS
            ))
        })?;
        if config.grid_width <= 0 || config.grid_height <= 0 {
            log::warn!(
                "Grid dimensions {}x{} are not positive, clamping to at least 1",
                config.grid_width,
                config.grid_height
            );
        }
        self.width = config.grid_width.max(1);
        self.height = config.grid_height.max(1);
        self.flags = vec![SlotState::empty(); count];
        Ok(())
    }

    /// Grid size as (width, height)
    pub fn grid_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn capacity(&self) -> usize {
        self.flags.len()
    }

    pub fn is_valid_slot_index(&self, slot: SlotIndex) -> bool {
        slot.offset().is_some_and(|i| i < self.flags.len())
    }

    pub fn is_slot_available(&self, slot: SlotIndex) -> bool {
        self.slot_state(slot).is_some_and(SlotState::is_free)
    }

    pub fn can_add_item_to_slot(&self, slot: SlotIndex) -> bool {
        self.is_valid_slot_index(slot) && self.is_slot_available(slot)
    }

    /// First free slot in index order
    pub fn recommended_slot_index(&self) -> Option<SlotIndex> {
        self.flags
            .iter()
            .position(|state| state.is_free())
            .map(SlotIndex::from)
    }

    /// Convert (x, y) to a slot index; `None` outside the grid
    pub fn coordinate_to_index(&self, x: i32, y: i32) -> Option<SlotIndex> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some(SlotIndex(y * self.width + x))
    }

    /// Convert a slot index to (x, y); `None` for invalid indices
    pub fn index_to_coordinate(&self, slot: SlotIndex) -> Option<(i32, i32)> {
        if !self.is_valid_slot_index(slot) {
            return None;
        }
        Some((slot.get() % self.width, slot.get() / self.width))
    }

    pub fn slot_index_by_xy(&self, x: i32, y: i32) -> Option<SlotIndex> {
        self.coordinate_to_index(x, y)
    }

    pub fn slot_state(&self, slot: SlotIndex) -> Option<SlotState> {
        slot.offset().and_then(|i| self.flags.get(i).copied())
    }

    pub fn occupied_slots(&self) -> Vec<SlotIndex> {
        occupied(&self.flags)
    }

    pub(crate) fn update_slot_state(&mut self, slot: SlotIndex, state: SlotState) {
        if let Some(flag) = slot.offset().and_then(|i| self.flags.get_mut(i)) {
            *flag = state;
        }
    }
}

impl Default for GridSpace {
    fn default() -> Self {
        Self::new()
    }
}
