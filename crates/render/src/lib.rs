//! Hand-off of generated track meshes to a renderer.
//!
//! The kernel leaves vertex normals as unnormalised sums; [`shade_normals`]
//! is the pass that makes them unit length before upload. Uploading and
//! drawing go through the [`RenderBackend`] trait so the GPU side stays
//! outside this workspace.

pub mod backend;
pub mod recording;

use std::mem::{offset_of, size_of};

use coaster_kernel::Vertex;
use nalgebra::Vector3;

pub use backend::{RenderBackend, RenderError, TextureSlot, TrackRenderer};
pub use recording::{Command, RecordingBackend};

/// Byte layout of the interleaved [`Vertex`] as a vertex-attribute
/// description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: usize,
    pub position_offset: usize,
    pub normal_offset: usize,
    pub tex_coords_offset: usize,
}

impl VertexLayout {
    pub const fn of_vertex() -> Self {
        Self {
            stride: size_of::<Vertex>(),
            position_offset: offset_of!(Vertex, position),
            normal_offset: offset_of!(Vertex, normal),
            tex_coords_offset: offset_of!(Vertex, tex_coords),
        }
    }

    /// Components per attribute: position, normal, texture coordinates.
    pub const fn components() -> [usize; 3] {
        [3, 3, 2]
    }
}

/// Copy `vertices` with every normal scaled to unit length. Zero normals,
/// left by degenerate triangles, stay zero.
pub fn shade_normals(vertices: &[Vertex]) -> Vec<Vertex> {
    vertices
        .iter()
        .map(|v| {
            let normal = Vector3::from(v.normal)
                .try_normalize(f32::EPSILON)
                .map_or([0.0; 3], |n| [n.x, n.y, n.z]);
            Vertex { normal, ..*v }
        })
        .collect()
}

/// Raw bytes of a vertex slice in upload order.
pub fn interleave(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}
