//! Error types for the inventory system

use crate::space::SpaceType;
use crate::types::{ContainerId, ContainerKind, ItemId, SlotIndex};
use thiserror::Error;
use void_core::Tag;

/// Result type for inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Errors that can occur in the inventory system
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Operation referenced an unknown item
    #[error("Item {0} not found")]
    ItemNotFound(ItemId),

    /// Operation referenced an unregistered container
    #[error("Container {0} not found")]
    ContainerNotFound(ContainerId),

    /// Target container refused a cross-container add
    #[error("Container {container} refused item {item} at slot {slot}")]
    AdmissionDenied {
        item: ItemId,
        container: ContainerId,
        slot: SlotIndex,
    },

    /// Target container refused an intra-container relocation
    #[error("Container {container} refused to move item {item} to slot {slot}")]
    MoveDenied {
        item: ItemId,
        container: ContainerId,
        slot: SlotIndex,
    },

    /// A space strategy was asked an addressing question it cannot answer
    #[error("{operation} is not supported by {space:?} space")]
    UnsupportedOperation {
        operation: &'static str,
        space: SpaceType,
    },

    /// A space configuration describes no usable slots
    #[error("Invalid space topology: {0}")]
    InvalidTopology(String),

    /// Equipment slot does not exist
    #[error("Container {container} has no {slot_type} slot #{index}")]
    SlotNotFound {
        container: ContainerId,
        slot_type: Tag,
        index: u32,
    },

    /// Equipment slot exists but is disabled
    #[error("Slot {slot_type} #{index} of container {container} is disabled")]
    SlotDisabled {
        container: ContainerId,
        slot_type: Tag,
        index: u32,
    },

    /// Equipment slot holds nothing
    #[error("Slot {slot_type} #{index} of container {container} is empty")]
    SlotEmpty {
        container: ContainerId,
        slot_type: Tag,
        index: u32,
    },

    /// Container exists but is not of the expected kind
    #[error("Container {container} is not a {expected:?} container")]
    ContainerKindMismatch {
        container: ContainerId,
        expected: ContainerKind,
    },

    /// `init_container` was called on an already initialized container
    #[error("Container is already initialized with id {0}")]
    ContainerAlreadyInitialized(ContainerId),

    /// The void container cannot be unregistered
    #[error("The void container cannot be unregistered")]
    VoidContainerProtected,

    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

impl InventoryError {
    /// Create an unsupported operation error
    pub fn unsupported(operation: &'static str, space: SpaceType) -> Self {
        InventoryError::UnsupportedOperation { operation, space }
    }

    /// Create an invalid topology error
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        InventoryError::InvalidTopology(message.into())
    }

    /// Whether this error leaves all state untouched and may be retried by the caller
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            InventoryError::AdmissionDenied { .. } | InventoryError::MoveDenied { .. }
        )
    }
}
