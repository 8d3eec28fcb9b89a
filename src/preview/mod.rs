//! Preview handle module
//!
//! This module handles:
//! - Turning stored image bytes into renderable preview handles
//! - Resolving a handle back to its bytes (for the viewer)
//! - Revoking handles once the catalog load that issued them is superseded

pub mod registry;

pub use registry::{PreviewId, PreviewRegistry};
