//! nightmeadow
//!
//! A procedurally generated night-meadow vignette: a grass field of a
//! hundred thousand synthesized blades, a seeded-deterministic mountain
//! ring, a starry sky dome and loaded OBJ props, rendered through a bloom
//! pass and driven by a single per-frame coordinator.
//!
//! High-level modules
//! - `gen`: procedural geometry (PRNG, blades, field, mountains, primitives)
//! - `coordinator`: the per-frame phase machine and shader uniform set
//! - `loading`: the counted asset-readiness gate
//! - `camera`: orbit camera, zoom controller and the dolly animation
//! - `vignette`: the assembled scene
//! - `context`: GPU and window context owning device/queue/pipelines
//! - `flow`: the winit event loop driving one scene
//! - `pipelines`, `render`, `resources`, `data_structures`: render plumbing
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod data_structures;
pub mod flow;
pub mod r#gen;
pub mod loading;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod vignette;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use wgpu::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
