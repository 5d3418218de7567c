//! Identity and location types shared by every inventory module

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use void_core::Tag;

/// Unique item identifier. `0` means "no item"; issued ids start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl ItemId {
    /// The reserved "no item" id
    pub const NONE: ItemId = ItemId(0);

    /// Whether this id names a real item
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unique container identifier. `ContainerId::VOID` is the void container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(pub u32);

impl ContainerId {
    /// The void container, registered first by every registry
    pub const VOID: ContainerId = ContainerId(0);

    /// Whether this is the void container
    #[inline]
    pub fn is_void(self) -> bool {
        self == Self::VOID
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Slot offset within a container's space. `-1` means "no specific slot".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotIndex(pub i32);

impl SlotIndex {
    /// No specific slot (valid for unordered spaces)
    pub const ANY: SlotIndex = SlotIndex(-1);

    #[inline]
    pub const fn new(index: i32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn is_any(self) -> bool {
        self.0 == -1
    }

    #[inline]
    pub fn get(self) -> i32 {
        self.0
    }

    /// The slot as an array offset, if non-negative
    #[inline]
    pub fn offset(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl Default for SlotIndex {
    fn default() -> Self {
        Self::ANY
    }
}

impl From<i32> for SlotIndex {
    fn from(index: i32) -> Self {
        Self(index)
    }
}

impl From<usize> for SlotIndex {
    fn from(index: usize) -> Self {
        Self(i32::try_from(index).unwrap_or(i32::MAX))
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            write!(f, "any")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Where an item lives: a container plus a slot in that container's space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemLocation {
    pub container: ContainerId,
    pub slot: SlotIndex,
}

impl ItemLocation {
    pub fn new(container: ContainerId, slot: impl Into<SlotIndex>) -> Self {
        Self {
            container,
            slot: slot.into(),
        }
    }

    /// A location in `container` without a specific slot
    pub fn anywhere(container: ContainerId) -> Self {
        Self {
            container,
            slot: SlotIndex::ANY,
        }
    }

    /// The void container, no slot
    pub fn void() -> Self {
        Self::anywhere(ContainerId::VOID)
    }
}

impl Default for ItemLocation {
    fn default() -> Self {
        Self::void()
    }
}

impl fmt::Display for ItemLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.container, self.slot)
    }
}

/// Opaque reference to an item template (data table row, asset id, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemConfigId(pub String);

impl ItemConfigId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemConfigId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemConfigId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ItemConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The registry's authoritative record for one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub config: ItemConfigId,
    pub location: ItemLocation,
}

impl ItemRecord {
    pub fn new(id: ItemId, config: ItemConfigId, location: ItemLocation) -> Self {
        Self {
            id,
            config,
            location,
        }
    }

    /// Copy of this record placed somewhere else
    pub fn relocated(&self, location: ItemLocation) -> Self {
        Self {
            location,
            ..self.clone()
        }
    }
}

bitflags! {
    /// Per-slot state byte. Empty means free.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SlotState: u8 {
        /// Slot is locked and refuses items
        const LOCKED = 0b0000_0001;
        /// An item is located in this slot
        const OCCUPIED = 0b0000_0010;
    }
}

impl SlotState {
    /// Free slots accept items
    #[inline]
    pub fn is_free(self) -> bool {
        self.is_empty()
    }

    #[inline]
    pub fn is_occupied(self) -> bool {
        self.contains(SlotState::OCCUPIED)
    }

    #[inline]
    pub fn is_locked(self) -> bool {
        self.contains(SlotState::LOCKED)
    }
}

/// Container categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    /// The "no location" container
    Void,
    /// Plain container over an arbitrary space
    Base,
    /// Character bag
    Bag,
    /// Equipment slots
    Equipment,
    /// Generated loot
    Loot,
}

impl ContainerKind {
    /// Hierarchical tag for this kind (`Inventory.Container.Bag`, ...)
    pub fn tag(&self) -> Tag {
        let leaf = match self {
            Self::Void => "Empty",
            Self::Base => "World",
            Self::Bag => "Bag",
            Self::Equipment => "Equipment",
            Self::Loot => "Loot",
        };
        Tag::new("Inventory.Container").child(leaf)
    }
}
