//! Engine data structures: meshes, materials, textures, instances.
//!
//! - `model` contains vertex layouts, mesh/material/model containers
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `instance` holds per-instance transformation data for prop clones

pub mod instance;
pub mod model;
pub mod texture;
