//! GPU-side data models for the sample scene.
//!
//! - `mesh` contains the vertex format, GPU mesh buffers and the procedural cube
//! - `texture` contains the GPU texture wrapper, samplers and bind groups

pub mod mesh;
pub mod texture;
