//! Circle tessellation.
//!
//! Every shape is drawn from one cached unit-circle mesh, scaled and moved by a
//! per-draw transform. This module builds that mesh with lyon's `FillTessellator`.
//!
//! The tolerance is expressed in *pixels at the largest radius we expect to draw*,
//! then converted to unit-circle space, so big circles stay round while small ones
//! don't pay for segments nobody can see.

use lyon::math::point;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    VertexBuffers,
};

use crate::scene::Mesh2D;

/// Below this lyon spends vertices without any visible gain.
const MIN_TOLERANCE: f32 = 1e-4;

#[derive(Debug, Copy, Clone)]
pub struct TessellateOptions {
    /// Max distance (in pixels) between the true circle and its polygon.
    pub tolerance_px: f32,
    /// The radius the tolerance is measured at.
    pub reference_radius: f32,
}

impl Default for TessellateOptions {
    fn default() -> Self {
        Self {
            tolerance_px: 0.1,
            reference_radius: 80.0,
        }
    }
}

impl TessellateOptions {
    /// Tolerance for the unit circle, never below lyon's useful minimum.
    fn unit_tolerance(&self) -> f32 {
        (self.tolerance_px / self.reference_radius.max(1.0)).max(MIN_TOLERANCE)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TessVertex {
    pub position: [f32; 2],
}

struct TessVertexCtor;

impl FillVertexConstructor<TessVertex> for TessVertexCtor {
    fn new_vertex(&mut self, v: FillVertex) -> TessVertex {
        let p = v.position();
        TessVertex {
            position: [p.x, p.y],
        }
    }
}

/// Tessellate a circle of radius 1 centered on the origin.
pub fn unit_circle_mesh(opts: TessellateOptions) -> anyhow::Result<Mesh2D> {
    let mut tess = FillTessellator::new();
    let mut buffers: VertexBuffers<TessVertex, u16> = VertexBuffers::new();

    let fill = FillOptions::tolerance(opts.unit_tolerance());
    tess.tessellate_circle(
        point(0.0, 0.0),
        1.0,
        &fill,
        &mut BuffersBuilder::new(&mut buffers, TessVertexCtor),
    )
    .map_err(|e| anyhow::anyhow!("lyon circle tessellation failed: {e:?}"))?;

    Ok(mesh_from_buffers(&buffers))
}

#[inline]
fn mesh_from_buffers(buffers: &VertexBuffers<TessVertex, u16>) -> Mesh2D {
    Mesh2D {
        positions: buffers.vertices.iter().map(|v| v.position).collect(),
        indices: buffers.indices.clone(),
    }
}
