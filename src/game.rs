//! The game loop's state machine and per-frame sequence.
//!
//! `Game` knows nothing about winit or wgpu: events come in as `InputEvent`s and
//! pixels go out through a `Canvas`. `render::app` drives it from the real event
//! loop; tests drive it directly.
//!
//! Phases:
//! ```text
//! Initializing --start()--> Running --close event / render error--> ShuttingDown
//!      |                                                                |
//!      +--init_failed()--> Terminated <-----------finish()--------------+
//! ```

use log::{debug, info, trace};

use crate::config::{ConfigError, GameConfig};
use crate::input::{self, InputEvent, KeyState};
use crate::render::canvas::Canvas;
use crate::scene::{Playfield, Shape};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopPhase {
    Initializing,
    Running,
    ShuttingDown,
    Terminated,
}

/// What the caller should do after `run_frame`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A frame was rendered; keep looping.
    Continue,
    /// The loop left `Running`; release resources and call `finish()`.
    Exit,
}

pub struct Game {
    config: GameConfig,
    field: Playfield,
    shapes: Vec<Shape>,
    keys: KeyState,
    phase: LoopPhase,
    frame: u64,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let field = config.playfield();
        let shapes = config.shapes.iter().map(|s| s.build(field)).collect();

        Ok(Self {
            config,
            field,
            shapes,
            keys: KeyState::new(),
            phase: LoopPhase::Initializing,
            frame: 0,
        })
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    #[inline]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Number of frames rendered so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The window and surface are up.
    pub fn start(&mut self) {
        if self.phase == LoopPhase::Initializing {
            info!(
                "running: {}x{} @ {} fps, {} shape(s)",
                self.config.window_width,
                self.config.window_height,
                self.config.fps_cap,
                self.shapes.len()
            );
            self.phase = LoopPhase::Running;
        }
    }

    /// The window or surface could not be created; skip straight to `Terminated`.
    pub fn init_failed(&mut self) {
        if self.phase == LoopPhase::Initializing {
            self.phase = LoopPhase::Terminated;
        }
    }

    /// Resources have been released.
    pub fn finish(&mut self) {
        if self.phase == LoopPhase::ShuttingDown {
            self.phase = LoopPhase::Terminated;
        }
    }

    /// Run one iteration: drain events, sample input, update shapes, render, present.
    ///
    /// A close event ends the frame before anything is drawn. A render error is fatal:
    /// the phase moves to `ShuttingDown` and the error is returned.
    pub fn run_frame<I, C>(&mut self, events: I, canvas: &mut C) -> anyhow::Result<FrameOutcome>
    where
        I: IntoIterator<Item = InputEvent>,
        C: Canvas + ?Sized,
    {
        if self.phase != LoopPhase::Running {
            return Ok(FrameOutcome::Exit);
        }

        for event in events {
            if event == InputEvent::CloseRequested {
                info!("Close requested; shutting down");
                self.phase = LoopPhase::ShuttingDown;
            }
            self.keys.apply(event);
        }
        if self.phase != LoopPhase::Running {
            return Ok(FrameOutcome::Exit);
        }

        let intent = input::sample(&self.keys, &self.config.keys);
        if !intent.is_none() {
            trace!("frame {}: {:?}", self.frame, intent);
        }
        for shape in &mut self.shapes {
            shape.apply(intent, self.field);
        }

        if let Err(err) = self.render(canvas) {
            self.phase = LoopPhase::ShuttingDown;
            return Err(err);
        }

        self.frame += 1;
        Ok(FrameOutcome::Continue)
    }

    fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) -> anyhow::Result<()> {
        canvas.clear(self.config.background);
        for shape in &self.shapes {
            canvas.fill_circle(shape.to_item());
        }
        canvas.present()?;

        if self.frame % 600 == 0 {
            debug!(
                "frame {}: {}",
                self.frame,
                self.shapes
                    .iter()
                    .map(|s| format!(
                        "{} at ({:.0}, {:.0}) r={:.0}",
                        s.name, s.position.x, s.position.y, s.radius
                    ))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{CircleItem, Rgba};
    use winit::keyboard::KeyCode;

    #[derive(Debug, PartialEq)]
    enum Call {
        Clear(Rgba),
        Circle(CircleItem),
        Present,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        fail_present: bool,
    }

    impl Canvas for Recorder {
        fn clear(&mut self, color: Rgba) {
            self.calls.push(Call::Clear(color));
        }

        fn fill_circle(&mut self, item: CircleItem) {
            self.calls.push(Call::Circle(item));
        }

        fn present(&mut self) -> anyhow::Result<()> {
            if self.fail_present {
                anyhow::bail!("surface lost");
            }
            self.calls.push(Call::Present);
            Ok(())
        }
    }

    const NO_EVENTS: [InputEvent; 0] = [];

    fn running(config: GameConfig) -> Game {
        let mut game = Game::new(config).unwrap();
        game.start();
        game
    }

    fn key(code: KeyCode, pressed: bool) -> InputEvent {
        InputEvent::Key { code, pressed }
    }

    #[test]
    fn phases_progress_in_order() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        assert_eq!(game.phase(), LoopPhase::Initializing);
        game.finish();
        assert_eq!(game.phase(), LoopPhase::Initializing);
        game.start();
        assert_eq!(game.phase(), LoopPhase::Running);
        game.init_failed();
        assert_eq!(game.phase(), LoopPhase::Running);
    }

    #[test]
    fn init_failure_terminates() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        game.init_failed();
        assert_eq!(game.phase(), LoopPhase::Terminated);
        let mut canvas = Recorder::default();
        assert_eq!(
            game.run_frame(NO_EVENTS, &mut canvas).unwrap(),
            FrameOutcome::Exit
        );
        assert!(canvas.calls.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = GameConfig {
            fps_cap: 0,
            ..Default::default()
        };
        assert!(Game::new(cfg).is_err());
    }

    #[test]
    fn frame_clears_draws_then_presents() {
        let mut game = running(GameConfig::with_claw());
        let mut canvas = Recorder::default();
        game.run_frame(NO_EVENTS, &mut canvas).unwrap();

        assert_eq!(canvas.calls.len(), 4);
        assert_eq!(canvas.calls[0], Call::Clear(Rgba::BLACK));
        assert!(matches!(canvas.calls[1], Call::Circle(c) if c.center == [320.0, 200.0]));
        assert!(matches!(canvas.calls[2], Call::Circle(c) if c.center == [500.0, 200.0]));
        assert_eq!(canvas.calls[3], Call::Present);
        assert_eq!(game.frame(), 1);
    }

    #[test]
    fn held_key_applies_every_frame_until_released() {
        let mut game = running(GameConfig::default());
        let mut canvas = Recorder::default();

        game.run_frame([key(KeyCode::ArrowDown, true)], &mut canvas)
            .unwrap();
        game.run_frame(NO_EVENTS, &mut canvas).unwrap();
        assert_eq!(game.shapes()[0].position.y, 210.0);

        game.run_frame([key(KeyCode::ArrowDown, false)], &mut canvas)
            .unwrap();
        assert_eq!(game.shapes()[0].position.y, 210.0);
    }

    #[test]
    fn close_event_shuts_down_without_rendering() {
        let mut game = running(GameConfig::default());
        let mut canvas = Recorder::default();

        let outcome = game
            .run_frame(
                [key(KeyCode::ArrowRight, true), InputEvent::CloseRequested],
                &mut canvas,
            )
            .unwrap();
        assert_eq!(outcome, FrameOutcome::Exit);
        assert_eq!(game.phase(), LoopPhase::ShuttingDown);
        assert!(canvas.calls.is_empty());
        assert_eq!(game.shapes()[0].position.x, 320.0);

        assert_eq!(
            game.run_frame(NO_EVENTS, &mut canvas).unwrap(),
            FrameOutcome::Exit
        );
        assert!(canvas.calls.is_empty());

        game.finish();
        assert_eq!(game.phase(), LoopPhase::Terminated);
    }

    #[test]
    fn render_failure_is_fatal() {
        let mut game = running(GameConfig::default());
        let mut canvas = Recorder {
            fail_present: true,
            ..Default::default()
        };
        let err = game.run_frame(NO_EVENTS, &mut canvas).unwrap_err();
        assert_eq!(err.to_string(), "surface lost");
        assert_eq!(game.phase(), LoopPhase::ShuttingDown);
        assert_eq!(game.frame(), 0);
    }
}
