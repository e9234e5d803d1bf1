//! Flat triangle-list vertex buffers.
//!
//! Every triangle owns its three vertices; there is no index buffer. A
//! triangle's face normal `(b - a) × (c - a)` is added to each of its vertices
//! without normalisation, which leaves the length proportional to the
//! triangle's area until the shading stage renormalises it.

pub mod solid;

use bytemuck::{Pod, Zeroable};

use crate::geometry::Point3d;

/// Interleaved vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub fn new(position: Point3d, tex_coords: [f32; 2]) -> Self {
        Self {
            position: [position.x as f32, position.y as f32, position.z as f32],
            normal: [0.0; 3],
            tex_coords,
        }
    }

    /// Fold one adjacent face normal into this vertex.
    pub fn accumulate_normal(&mut self, face_normal: [f32; 3]) {
        for (n, f) in self.normal.iter_mut().zip(face_normal) {
            *n += f;
        }
    }
}

/// Texture coordinates for the three corners of every triangle.
pub const TRIANGLE_TEX_COORDS: [[f32; 2]; 3] = [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0]];

/// Append-only triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffer {
    vertices: Vec<Vertex>,
    max_height: f32,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_triangle_capacity(triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(triangles * 3),
            max_height: 0.0,
        }
    }

    /// Append triangle `a, b, c` (counter-clockwise seen from its front).
    pub fn push_triangle(&mut self, a: Point3d, b: Point3d, c: Point3d) {
        let n = (b - a).cross(&(c - a));
        let face_normal = [n.x as f32, n.y as f32, n.z as f32];

        for (corner, tex) in [a, b, c].into_iter().zip(TRIANGLE_TEX_COORDS) {
            let mut vertex = Vertex::new(corner, tex);
            vertex.accumulate_normal(face_normal);
            self.max_height = self.max_height.max(vertex.position[1]);
            self.vertices.push(vertex);
        }
    }

    /// Move every triangle of `other` to the end of this buffer.
    pub fn append(&mut self, other: &mut MeshBuffer) {
        self.max_height = self.max_height.max(other.max_height);
        self.vertices.append(&mut other.vertices);
        other.max_height = 0.0;
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The buffer as raw bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Highest vertex `y` emitted so far, never below ground level `0`.
    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    /// Iterate the triangles as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = &[Vertex]> {
        self.vertices.chunks_exact(3)
    }
}
