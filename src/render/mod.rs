//! Rendering module root.
//!
//! The `render` module owns the window/event-loop integration and the GPU side of
//! drawing. Game logic reaches it only through `canvas::Canvas`.
//!
//! Entrypoints: `render::app::run()` / `render::app::run_with_config(..)`.

pub mod app;

/// The drawing seam (`Canvas`) and its wgpu implementation.
pub mod canvas;

/// Device, queue and surface management.
pub mod gpu;

/// Filled circles: one shared mesh, per-circle uniforms.
pub mod circle_renderer;
