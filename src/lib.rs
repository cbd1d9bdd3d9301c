//! `clawball` library crate root.
//!
//! A window with a dot you steer with the arrow keys and grow/shrink with Z/X, plus an
//! optional "claw" that only grows and shrinks. The binary stays thin and calls
//! `run_app`; the pieces are public so demos can assemble their own configuration.
//!
//! Layout:
//! - `config`: immutable `GameConfig` and its validation
//! - `input`: window events -> held keys -> per-frame `Intent`
//! - `scene`: shapes, the update step, camera and colors
//! - `game`: loop phases and the per-frame sequence
//! - `clock`: frame-rate cap
//! - `render`: winit event loop and the wgpu canvas

pub mod clock;
pub mod config;
pub mod game;
pub mod input;
pub mod render;
pub mod scene;
pub mod tessellate;

/// Run the default game (single dot).
///
/// Note: This function does **not** initialize logging; callers decide their own
/// logging setup.
pub fn run_app() -> anyhow::Result<()> {
    render::app::run()
}
