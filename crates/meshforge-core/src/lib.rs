//! Meshforge Core Library
//!
//! This crate provides the shared types, the flattened scene snapshot
//! contract, and error handling used across all meshforge components.

pub mod error;
pub mod snapshot;
pub mod types;

pub use error::{Error, Result};
pub use snapshot::{MeshObject, SceneSnapshot, SourceFace};
pub use types::*;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::snapshot::{MeshObject, SceneSnapshot, SourceFace};
    pub use crate::types::*;
}
