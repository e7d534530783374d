//! Engine data structures: meshes, textures, transforms and shared handles.
//!
//! - `handle` contains the swappable slot textures are published through
//! - `mesh` contains the static mesh descriptions uploaded at startup
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `transform` holds per-object placement and model matrix composition

pub mod handle;
pub mod mesh;
pub mod texture;
pub mod transform;
