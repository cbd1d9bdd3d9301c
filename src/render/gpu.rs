use std::sync::Arc;

use anyhow::Context as _;
use log::{info, warn};
use winit::window::Window;

/// GPU context for one window:
/// - owns `wgpu::Device`/`wgpu::Queue` and the window `Surface`
/// - keeps the current `SurfaceConfiguration` in sync with the window size
pub struct Gpu {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,

    /// The surface holds an `Arc<Window>`, so it cannot outlive the window.
    pub surface: wgpu::Surface<'static>,
    pub surface_format: wgpu::TextureFormat,

    pub size: winit::dpi::PhysicalSize<u32>,
    pub config: wgpu::SurfaceConfiguration,
}

impl Gpu {
    /// Create a GPU context presenting to `window`.
    ///
    /// The adapter is requested against the window's surface so we never pick a device
    /// that cannot present to it.
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let size = window.inner_size();
        let surface = instance
            .create_surface(window)
            .context("wgpu: failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .context("wgpu: failed to request adapter")?;
        info!("wgpu adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .context("wgpu: failed to request device")?;

        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .first()
            .copied()
            .context("wgpu: surface reported no supported formats")?;

        let config = Self::make_surface_config(size, surface_format);
        if size.width > 0 && size.height > 0 {
            surface.configure(&device, &config);
        }

        Ok(Self {
            device,
            queue,
            surface,
            surface_format,
            size,
            config,
        })
    }

    /// The format render pipelines target: the sRGB view of the surface.
    #[inline]
    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.surface_format.add_srgb_suffix()
    }

    #[inline]
    pub fn is_zero_sized(&self) -> bool {
        self.size.width == 0 || self.size.height == 0
    }

    /// Reconfigure the surface for a new size. Zero sizes (minimized) are remembered
    /// but not configured.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.size = new_size;
        if self.is_zero_sized() {
            return;
        }
        self.config = Self::make_surface_config(new_size, self.surface_format);
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquire the next frame.
    ///
    /// - `Ok(Some(..))`: render into the view, then present the texture.
    /// - `Ok(None)`: skip this frame (minimized, outdated or slow surface; reconfigured
    ///   where that helps).
    /// - `Err(..)`: the surface is gone or the device is out of memory. Fatal.
    pub fn acquire_frame(
        &mut self,
    ) -> anyhow::Result<Option<(wgpu::SurfaceTexture, wgpu::TextureView)>> {
        if self.is_zero_sized() {
            return Ok(None);
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Outdated) | Err(wgpu::SurfaceError::Other) => {
                warn!("surface outdated; reconfiguring and skipping frame");
                self.resize(self.size);
                return Ok(None);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface timed out; skipping frame");
                return Ok(None);
            }
            Err(wgpu::SurfaceError::Lost) => {
                anyhow::bail!("wgpu: drawing surface lost");
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                anyhow::bail!("wgpu: out of memory acquiring frame");
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor {
                format: Some(self.target_format()),
                ..Default::default()
            });

        Ok(Some((surface_texture, view)))
    }

    fn make_surface_config(
        size: winit::dpi::PhysicalSize<u32>,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            view_formats: vec![surface_format.add_srgb_suffix()],
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            width: size.width,
            height: size.height,
            desired_maximum_frame_latency: 2,
            // Frame rate is capped by the event loop; vsync only prevents tearing.
            present_mode: wgpu::PresentMode::AutoVsync,
        }
    }
}
