//! Procedural roller-coaster track generation.
//!
//! A sparse list of control points is interpolated with a Catmull-Rom spline,
//! a front/up/right frame is swept along the curve, and rails, planks and
//! pillars are extruded between consecutive frames into two triangle buffers.
//!
//! - **geometry**: spline evaluation, frame propagation, load-time transforms
//! - **mesh**: vertex buffers and the oriented hexahedron primitive
//! - **operations**: cross-section extrusion and placement rules
//! - **track**: configuration and the end-to-end generator
//! - **validation**: winding and orthonormality audits

pub mod error;
pub mod geometry;
pub mod mesh;
pub mod operations;
pub mod track;
pub mod validation;

pub use error::TrackError;
pub use geometry::frame::{
    step_parameters, Frame, FrameError, FramePath, FrameSample, SegmentSpan,
};
pub use geometry::spline::{catmull_rom, Spline};
pub use geometry::transform::ControlPointTransform;
pub use geometry::{Point3d, Vec2, Vec3};
pub use mesh::solid::{CrossSection, Hexahedron};
pub use mesh::{MeshBuffer, Vertex};
pub use operations::placement::{ParamRange, PlacementPolicy};
pub use track::{generate_track, RideCamera, TrackConfig, TrackMesh};
pub use validation::{audit_track, TrackAudit};

/// Tolerance configuration for geometric degeneracy checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Vectors shorter than this are treated as zero-length and never normalized.
    pub zero_length: f64,
    /// Allowed deviation from unit length and from orthogonality in frame audits.
    pub orthonormal: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            zero_length: 1e-9,
            orthonormal: 1e-6,
        }
    }
}

impl Tolerance {
    /// Normalize `v`, or `None` when it is too short to carry a direction.
    pub fn normalize(&self, v: Vec3) -> Option<Vec3> {
        v.try_normalize(self.zero_length)
    }
}
