//! winit integration: window lifecycle, event intake and frame pacing.
//!
//! This module owns:
//! - the winit event loop and the window
//! - the `WgpuCanvas` drawing into it
//! - the `FrameClock` deciding when the next frame may start
//!
//! Everything that happens inside a frame is `Game::run_frame`. Window events are
//! queued as they arrive and drained by the next frame, except a close request,
//! which is handled on the spot instead of waiting for the frame deadline.

use std::{sync::Arc, time::Instant};

use anyhow::Context as _;
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::clock::FrameClock;
use crate::config::GameConfig;
use crate::game::{FrameOutcome, Game, LoopPhase};
use crate::input::{EventQueue, InputEvent};
use crate::render::canvas::WgpuCanvas;

/// Run the game with the default (single dot) configuration.
pub fn run() -> anyhow::Result<()> {
    run_with_config(GameConfig::default())
}

/// Run the game until the window is closed.
///
/// Returns `Err` if the configuration is invalid, the window or GPU surface could not
/// be created, or rendering failed mid-run. Closing the window returns `Ok(())`.
pub fn run_with_config(config: GameConfig) -> anyhow::Result<()> {
    let game = Game::new(config).context("invalid game configuration")?;

    let event_loop = EventLoop::new().context("winit: failed to create EventLoop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(game);
    event_loop
        .run_app(&mut app)
        .context("winit: run_app failed")?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    game: Game,
    canvas: Option<WgpuCanvas>,
    events: EventQueue,
    clock: FrameClock,
    /// First fatal error; returned from `run_with_config` once the loop exits.
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(game: Game) -> Self {
        let clock = FrameClock::new(game.config().fps_cap, Instant::now());
        Self {
            game,
            canvas: None,
            events: EventQueue::new(),
            clock,
            failure: None,
        }
    }

    fn create_canvas(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<WgpuCanvas> {
        let config = self.game.config();
        let attributes = Window::default_attributes()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .with_resizable(false);

        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("winit: failed to create window")?,
        );

        let playfield = [config.window_width as f32, config.window_height as f32];
        pollster::block_on(WgpuCanvas::new(window, playfield))
            .context("failed to initialize renderer")
    }

    /// Run one frame with every event queued so far.
    fn step(&mut self, event_loop: &ActiveEventLoop) {
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };

        match self.game.run_frame(self.events.drain(), canvas) {
            Ok(FrameOutcome::Continue) => {}
            Ok(FrameOutcome::Exit) => self.shut_down(event_loop),
            Err(err) => {
                error!("fatal: {err:#}");
                self.failure.get_or_insert(err);
                self.shut_down(event_loop);
            }
        }
    }

    /// Release the surface and window, then leave the event loop.
    fn shut_down(&mut self, event_loop: &ActiveEventLoop) {
        if self.canvas.take().is_some() {
            info!("released window and surface");
        }
        self.game.finish();
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.game.phase() != LoopPhase::Initializing {
            return;
        }

        match self.create_canvas(event_loop) {
            Ok(canvas) => {
                self.canvas = Some(canvas);
                self.game.start();
                self.clock = FrameClock::new(self.game.config().fps_cap, Instant::now());
                event_loop.set_control_flow(ControlFlow::WaitUntil(self.clock.deadline()));
            }
            Err(err) => {
                error!("startup failed: {err:#}");
                self.game.init_failed();
                self.failure = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(input) = InputEvent::from_window_event(&event) {
            self.events.push(input);
        }

        if let WindowEvent::Resized(size) = event {
            if let Some(canvas) = self.canvas.as_mut() {
                canvas.resize(size);
            }
        }

        // Frames are driven by the clock; RedrawRequested needs no handling of its own.
        if self.events.close_pending() {
            self.step(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.game.phase() != LoopPhase::Running {
            return;
        }

        let now = Instant::now();
        if self.clock.is_due(now) {
            self.clock.tick(now);
            self.step(event_loop);
        }

        if self.game.phase() == LoopPhase::Running {
            event_loop.set_control_flow(ControlFlow::WaitUntil(self.clock.deadline()));
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Covers exits we did not initiate (e.g. the platform tearing the loop down).
        self.canvas = None;
        self.game.finish();
    }
}
