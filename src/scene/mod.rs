//! Scene-level types shared by the game loop and the renderer.
//!
//! The scene lives in **window pixels**: origin at the top-left corner, x to the
//! right, y downwards. This matches the way input moves shapes (up is negative y)
//! and keeps the clamping arithmetic in `shape` free of any projection math.
//!
//! Nothing in here depends on wgpu or winit; the renderer consumes these types
//! through `render::canvas::Canvas`.

pub mod shape;

pub use shape::{Playfield, RadiusRange, Shape, ShapeKind};

/// Simple RGBA color, stored linear (the renderer writes into an sRGB view).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// Build an opaque color from 8-bit sRGB components, e.g. `(255, 0, 0)`.
    pub fn from_srgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: srgb_to_linear(r),
            g: srgb_to_linear(g),
            b: srgb_to_linear(b),
            a: 1.0,
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// A renderer-agnostic triangle mesh (2D positions, u16 indices).
#[derive(Debug, Clone, Default)]
pub struct Mesh2D {
    pub positions: Vec<[f32; 2]>,
    pub indices: Vec<u16>,
}

impl Mesh2D {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }
}

/// One filled circle queued for drawing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CircleItem {
    pub center: [f32; 2],
    pub radius: f32,
    pub fill: Rgba,
}

impl CircleItem {
    /// `world_from_local` for a unit circle mesh: scale by radius, then move to center.
    pub fn world_from_local(&self) -> glam::Mat4 {
        glam::Mat4::from_translation(glam::vec3(self.center[0], self.center[1], 0.0))
            * glam::Mat4::from_scale(glam::vec3(self.radius, self.radius, 1.0))
    }
}

/// Camera mapping window pixels to clip space.
///
/// The mapping is a plain orthographic projection:
/// - `(0, 0)` (top-left) maps to clip `(-1, 1)`
/// - `(width, height)` (bottom-right) maps to clip `(1, -1)`
///
/// The viewport is the configured playfield, not the physical surface size, so
/// HiDPI scaling stretches the picture instead of revealing more of the world.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera2D {
    pub viewport: [f32; 2],
}

impl Camera2D {
    #[inline]
    pub fn pixels(width: f32, height: f32) -> Self {
        Self {
            viewport: [width.max(1.0), height.max(1.0)],
        }
    }

    pub fn clip_from_world(&self) -> glam::Mat4 {
        glam::Mat4::orthographic_rh(0.0, self.viewport[0], self.viewport[1], 0.0, -1.0, 1.0)
    }
}
