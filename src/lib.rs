//! minimal-scene
//!
//! A minimal sample application built on wgpu. It demonstrates the usual
//! wiring of a small fixed scene: compile shader pipelines, create meshes
//! (procedural and OBJ-imported), upload textures, fill per-frame and
//! per-draw uniform buffers and issue a handful of instanced draw calls,
//! with a debug-draw overlay and an egui slider panel on top.
//!
//! High-level modules
//! - `app`: lifecycle trait and the winit event loop driving it
//! - `camera`: camera, projection, controller and view/projection uniforms
//! - `context`: central GPU and window context that owns device/queue/surface
//! - `data_structures`: GPU-side data models (meshes, textures)
//! - `debug_draw`: immediate-mode line primitives and projected labels
//! - `gui`: egui glue and the editor HUD
//! - `pipelines`: render pipeline definitions (mesh, debug lines)
//! - `resources`: helpers to read geometry and textures from asset files
//! - `uniforms`: per-frame/per-draw uniform blocks and buffer helpers

pub mod app;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod debug_draw;
pub mod gui;
pub mod pipelines;
pub mod resources;
pub mod uniforms;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::dpi::PhysicalPosition;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
