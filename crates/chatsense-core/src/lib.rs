//! ChatSense Core
//!
//! Core types and error handling shared across ChatSense components.
//!
//! This crate provides:
//! - The parsed [`Message`] representation and its derived counts
//! - The closed set of [`RelationshipType`] categories and [`ConfidenceLevel`] buckets
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ConfidenceLevel, Message, RelationshipType, SYSTEM_SENDER};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ConfidenceLevel, Message, RelationshipType, SYSTEM_SENDER};
}
