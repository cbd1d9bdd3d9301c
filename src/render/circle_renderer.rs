//! Filled-circle renderer.
//!
//! All circles share one unit-circle mesh, uploaded once. Each circle gets its own
//! slot in a uniform buffer holding `(mvp, color)`; draws select their slot with a
//! dynamic offset. Writing every slot before the pass is recorded means each draw
//! sees its own uniforms (a single shared slot would leave every draw with the
//! last item's values, since queue writes land before the submit).
//!
//! Painter's order: items are drawn in the order given.

use std::{borrow::Cow, mem};

use wgpu::util::DeviceExt as _;

use crate::render::gpu::Gpu;
use crate::scene::{Camera2D, CircleItem, Mesh2D};

fn round_up_to(v: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two());
    (v + (align - 1)) & !(align - 1)
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex2D {
    pub position: [f32; 2],
}

impl Vertex2D {
    pub const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    #[inline]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex2D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Per-circle uniforms, matching `Uniforms` in `shaders/circle.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
struct CircleUniforms {
    mvp: [[f32; 4]; 4],
    color: [f32; 4],
}

const UNIFORM_SIZE: u64 = mem::size_of::<CircleUniforms>() as u64;

pub struct CircleRenderer {
    pipeline: wgpu::RenderPipeline,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,

    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    /// Distance between slots, honoring `min_uniform_buffer_offset_alignment`.
    uniform_stride: u64,
    /// Number of slots `uniform_buffer` holds.
    uniform_slots: usize,

    /// Items written by the last `prepare`.
    prepared: usize,
}

impl CircleRenderer {
    pub fn new(gpu: &Gpu, unit_circle: &Mesh2D) -> anyhow::Result<Self> {
        anyhow::ensure!(!unit_circle.is_empty(), "circle mesh is empty");

        let shader = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("CircleRenderer Shader"),
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!(
                    "shaders/circle.wgsl"
                ))),
            });

        let bind_group_layout =
            gpu.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("CircleRenderer Uniform BGL"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: true,
                            min_binding_size: wgpu::BufferSize::new(UNIFORM_SIZE),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("CircleRenderer Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = gpu
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("CircleRenderer Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex2D::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.target_format(),
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        let vertices = unit_circle
            .positions
            .iter()
            .map(|&position| Vertex2D { position })
            .collect::<Vec<_>>();
        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("CircleRenderer Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        // u16 index data may be an odd count; pad the upload to COPY_BUFFER_ALIGNMENT.
        let mut indices = unit_circle.indices.clone();
        let index_count = indices.len() as u32;
        if indices.len() % 2 == 1 {
            indices.push(0);
        }
        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("CircleRenderer Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let align = gpu.device.limits().min_uniform_buffer_offset_alignment as u64;
        let uniform_stride = round_up_to(UNIFORM_SIZE, align.max(1));
        let uniform_slots = 4;
        let (uniform_buffer, uniform_bind_group) =
            Self::create_uniforms(gpu, &bind_group_layout, uniform_stride, uniform_slots);

        Ok(Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count,
            bind_group_layout,
            uniform_buffer,
            uniform_bind_group,
            uniform_stride,
            uniform_slots,
            prepared: 0,
        })
    }

    fn create_uniforms(
        gpu: &Gpu,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        slots: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("CircleRenderer Uniform Buffer"),
            size: stride * slots as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("CircleRenderer Uniform BG"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(UNIFORM_SIZE),
                }),
            }],
        });

        (buffer, bind_group)
    }

    /// Write uniforms for `items`. Must be called before `draw` for the same frame.
    pub fn prepare(&mut self, gpu: &Gpu, camera: &Camera2D, items: &[CircleItem]) {
        self.prepared = items.len();
        if items.is_empty() {
            return;
        }

        if items.len() > self.uniform_slots {
            let slots = items.len().next_power_of_two();
            let (buffer, bind_group) =
                Self::create_uniforms(gpu, &self.bind_group_layout, self.uniform_stride, slots);
            self.uniform_buffer = buffer;
            self.uniform_bind_group = bind_group;
            self.uniform_slots = slots;
        }

        let clip_from_world = camera.clip_from_world();
        let stride = self.uniform_stride as usize;
        let mut bytes = vec![0u8; stride * items.len()];
        for (slot, item) in bytes.chunks_exact_mut(stride).zip(items) {
            let uniforms = CircleUniforms {
                mvp: (clip_from_world * item.world_from_local()).to_cols_array_2d(),
                color: item.fill.to_array(),
            };
            slot[..UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(&uniforms));
        }
        gpu.queue.write_buffer(&self.uniform_buffer, 0, &bytes);
    }

    /// Record draws for the items passed to the last `prepare`.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.prepared == 0 {
            return;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(
            self.index_buffer.slice(..self.index_count as u64 * 2),
            wgpu::IndexFormat::Uint16,
        );

        for i in 0..self.prepared {
            let offset = (i as u64 * self.uniform_stride) as u32;
            pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
            pass.draw_indexed(0..self.index_count, 0, 0..1);
        }
    }
}
