//! The drawing seam between the game loop and the GPU.
//!
//! `clear` and `fill_circle` only record; nothing reaches the screen until `present`,
//! which encodes the whole frame into one render pass and presents it. A frame is
//! therefore either shown complete or not at all.

use std::sync::Arc;

use log::trace;
use winit::window::Window;

use crate::render::circle_renderer::CircleRenderer;
use crate::render::gpu::Gpu;
use crate::scene::{Camera2D, CircleItem, Rgba};
use crate::tessellate::{TessellateOptions, unit_circle_mesh};

pub trait Canvas {
    /// Start a new frame filled with `color`, discarding anything recorded so far.
    fn clear(&mut self, color: Rgba);

    /// Queue a filled circle on top of everything queued before it.
    fn fill_circle(&mut self, item: CircleItem);

    /// Show the recorded frame. An error here is fatal for the loop.
    fn present(&mut self) -> anyhow::Result<()>;
}

/// `Canvas` backed by a wgpu surface on a winit window.
pub struct WgpuCanvas {
    window: Arc<Window>,
    gpu: Gpu,
    circles: CircleRenderer,
    camera: Camera2D,

    background: Rgba,
    pending: Vec<CircleItem>,
}

impl WgpuCanvas {
    /// `playfield` is the logical size the scene is authored in; it is stretched over
    /// whatever physical size the surface has.
    pub async fn new(window: Arc<Window>, playfield: [f32; 2]) -> anyhow::Result<Self> {
        let gpu = Gpu::new(window.clone()).await?;

        let mesh = unit_circle_mesh(TessellateOptions::default())?;
        let circles = CircleRenderer::new(&gpu, &mesh)?;

        Ok(Self {
            window,
            gpu,
            circles,
            camera: Camera2D::pixels(playfield[0], playfield[1]),
            background: Rgba::BLACK,
            pending: Vec::new(),
        })
    }

    #[inline]
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }
}

impl Canvas for WgpuCanvas {
    fn clear(&mut self, color: Rgba) {
        self.background = color;
        self.pending.clear();
    }

    fn fill_circle(&mut self, item: CircleItem) {
        self.pending.push(item);
    }

    fn present(&mut self) -> anyhow::Result<()> {
        let Some((surface_texture, view)) = self.gpu.acquire_frame()? else {
            trace!("no surface texture this frame");
            return Ok(());
        };

        self.circles.prepare(&self.gpu, &self.camera, &self.pending);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let bg = self.background;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.r as f64,
                            g: bg.g as f64,
                            b: bg.b as f64,
                            a: bg.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            self.circles.draw(&mut pass);
        }

        self.gpu.queue.submit(Some(encoder.finish()));
        self.window.pre_present_notify();
        surface_texture.present();

        Ok(())
    }
}
