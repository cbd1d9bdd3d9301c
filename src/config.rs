//! Immutable game configuration.
//!
//! `GameConfig::default()` is the single-dot game: a red dot in a 640x400 window that
//! moves with the arrow keys and grows/shrinks with Z/X, capped at 60 fps.
//! `GameConfig::with_claw()` is the two-shape variant used by the `claw` demo.
//!
//! The config is validated once, when the game is created; nothing mutates it after.

use glam::Vec2;
use thiserror::Error;

use crate::input::KeyBindings;
use crate::scene::{Playfield, RadiusRange, Rgba, Shape, ShapeKind};

pub const WINDOW_WIDTH: u32 = 640;
pub const WINDOW_HEIGHT: u32 = 400;
pub const FPS_CAP: u32 = 60;

pub const DOT_COLOR: (u8, u8, u8) = (255, 0, 0);
pub const DOT_RADIUS_START: f32 = 10.0;
pub const DOT_RADIUS_MIN: f32 = 2.0;
pub const DOT_RADIUS_MAX: f32 = 40.0;
pub const DOT_SPEED: f32 = 5.0;
pub const DOT_RADIUS_STEP: f32 = 1.0;

pub const CLAW_COLOR: (u8, u8, u8) = (0, 150, 255);
pub const CLAW_POSITION: [f32; 2] = [500.0, 200.0];
pub const CLAW_RADIUS_START: f32 = 20.0;
pub const CLAW_RADIUS_MIN: f32 = 5.0;
pub const CLAW_RADIUS_MAX: f32 = 80.0;
pub const CLAW_RADIUS_STEP: f32 = 2.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("window size must be non-zero, got {width}x{height}")]
    EmptyWindow { width: u32, height: u32 },

    #[error("fps cap must be at least 1")]
    ZeroFps,

    #[error("shape `{name}`: radius range [{min}, {max}] is empty or not positive")]
    BadRadiusRange { name: String, min: f32, max: f32 },

    #[error("shape `{name}`: max radius {max} does not fit a {width}x{height} window")]
    RadiusTooLarge {
        name: String,
        max: f32,
        width: u32,
        height: u32,
    },

    #[error("shape `{name}`: initial radius {radius} is outside [{min}, {max}]")]
    InitialRadiusOutOfRange {
        name: String,
        radius: f32,
        min: f32,
        max: f32,
    },

    #[error("shape `{name}`: speed and growth step must be finite and non-negative")]
    BadStep { name: String },
}

/// Static description of one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeConfig {
    pub name: String,
    pub kind: ShapeKind,
    /// Initial center. `None` centers the shape in the window.
    pub position: Option<[f32; 2]>,
    pub radius: f32,
    pub range: RadiusRange,
    pub color: Rgba,
}

impl ShapeConfig {
    /// The red dot: moves and grows.
    pub fn dot() -> Self {
        let (r, g, b) = DOT_COLOR;
        Self {
            name: "dot".to_string(),
            kind: ShapeKind::Roaming {
                speed: DOT_SPEED,
                step: DOT_RADIUS_STEP,
            },
            position: None,
            radius: DOT_RADIUS_START,
            range: RadiusRange::new(DOT_RADIUS_MIN, DOT_RADIUS_MAX),
            color: Rgba::from_srgb8(r, g, b),
        }
    }

    /// The bluish claw: stays put, grows and shrinks.
    pub fn claw() -> Self {
        let (r, g, b) = CLAW_COLOR;
        Self {
            name: "claw".to_string(),
            kind: ShapeKind::Growing {
                step: CLAW_RADIUS_STEP,
            },
            position: Some(CLAW_POSITION),
            radius: CLAW_RADIUS_START,
            range: RadiusRange::new(CLAW_RADIUS_MIN, CLAW_RADIUS_MAX),
            color: Rgba::from_srgb8(r, g, b),
        }
    }

    fn validate(&self, width: u32, height: u32) -> Result<(), ConfigError> {
        let RadiusRange { min, max } = self.range;
        if !(min > 0.0 && min <= max) {
            return Err(ConfigError::BadRadiusRange {
                name: self.name.clone(),
                min,
                max,
            });
        }
        if 2.0 * max > width.min(height) as f32 {
            return Err(ConfigError::RadiusTooLarge {
                name: self.name.clone(),
                max,
                width,
                height,
            });
        }
        if !self.range.contains(self.radius) {
            return Err(ConfigError::InitialRadiusOutOfRange {
                name: self.name.clone(),
                radius: self.radius,
                min,
                max,
            });
        }

        let steps = [self.kind.speed(), self.kind.growth_step()];
        if steps
            .into_iter()
            .flatten()
            .any(|s| !s.is_finite() || s < 0.0)
        {
            return Err(ConfigError::BadStep {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Build the runtime shape for a playfield.
    pub fn build(&self, field: Playfield) -> Shape {
        let position = self
            .position
            .map(Vec2::from_array)
            .unwrap_or_else(|| field.center());
        Shape::new(
            self.name.clone(),
            self.kind,
            position,
            self.radius,
            self.range,
            self.color,
            field,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub fps_cap: u32,
    pub background: Rgba,
    pub keys: KeyBindings,
    /// Drawn in order; later shapes paint over earlier ones.
    pub shapes: Vec<ShapeConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "clawball".to_string(),
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            fps_cap: FPS_CAP,
            background: Rgba::BLACK,
            keys: KeyBindings::default(),
            shapes: vec![ShapeConfig::dot()],
        }
    }
}

impl GameConfig {
    /// Two shapes: a dot that only moves, and a claw that only grows/shrinks.
    pub fn with_claw() -> Self {
        let mut dot = ShapeConfig::dot();
        dot.kind = ShapeKind::Translating { speed: DOT_SPEED };

        Self {
            title: "clawball: claw".to_string(),
            shapes: vec![dot, ShapeConfig::claw()],
            ..Default::default()
        }
    }

    #[inline]
    pub fn playfield(&self) -> Playfield {
        Playfield::new(self.window_width as f32, self.window_height as f32)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::EmptyWindow {
                width: self.window_width,
                height: self.window_height,
            });
        }
        if self.fps_cap == 0 {
            return Err(ConfigError::ZeroFps);
        }
        for shape in &self.shapes {
            shape.validate(self.window_width, self.window_height)?;
        }
        Ok(())
    }
}
