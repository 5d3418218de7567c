//! # void_core - Void Engine Core
//!
//! Small foundational primitives shared by the inventory crates:
//! - **Ids**: monotonically increasing id generation
//! - **Tags**: hierarchical dotted tags (`Equipment.Hand.Main`) with a
//!   precomputed hash, used as slot-type and category labels
//!
//! The only optional dependency is `serde`, behind the `serde` feature.

pub mod id;
pub mod tag;

pub use id::*;
pub use tag::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::id::IdGenerator;
    pub use crate::tag::Tag;
}
