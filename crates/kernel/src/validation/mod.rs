//! Post-generation checks on a track.
//!
//! Frames are checked for orthonormality and every emitted solid for outward
//! winding. Each solid occupies twelve consecutive triangles of its buffer,
//! which is what lets the winding audit run on the flat vertex list.

use std::fmt;

use nalgebra::Vector3;
use tracing::{info, instrument};

use crate::geometry::frame::FramePath;
use crate::mesh::MeshBuffer;
use crate::track::TrackMesh;
use crate::Tolerance;

/// Triangles emitted per closed solid.
pub const TRIANGLES_PER_SOLID: usize = 12;

/// Which buffer a finding was made in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Rails,
    Planks,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuditFinding {
    /// A frame's axes are not unit length or not mutually perpendicular.
    FrameNotOrthonormal { sample: usize, deviation: f64 },
    /// A triangle faces into its own solid.
    InwardFace {
        buffer: BufferKind,
        triangle: usize,
    },
    /// The buffer does not split into whole solids.
    PartialSolid { buffer: BufferKind, triangles: usize },
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameNotOrthonormal { sample, deviation } => {
                write!(f, "frame {sample} deviates from orthonormal by {deviation:e}")
            }
            Self::InwardFace { buffer, triangle } => {
                write!(f, "{buffer:?} triangle {triangle} faces inward")
            }
            Self::PartialSolid { buffer, triangles } => {
                write!(f, "{buffer:?} holds {triangles} triangles, not whole solids")
            }
        }
    }
}

/// Result of [`audit_track`].
#[derive(Debug, Clone, Default)]
pub struct TrackAudit {
    pub frames_checked: usize,
    pub solids_checked: usize,
    pub findings: Vec<AuditFinding>,
}

impl TrackAudit {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

impl fmt::Display for TrackAudit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "TrackAudit: frames={}, solids={}, findings={}",
            self.frames_checked,
            self.solids_checked,
            self.findings.len()
        )?;
        for finding in &self.findings {
            writeln!(f, "  {finding}")?;
        }
        Ok(())
    }
}

/// Frames whose axes drift further than `tolerance.orthonormal`.
pub fn audit_frames(path: &FramePath, tolerance: &Tolerance) -> Vec<AuditFinding> {
    path.samples()
        .iter()
        .enumerate()
        .filter_map(|(sample, s)| {
            let deviation = s.frame.orthonormality_error();
            (deviation > tolerance.orthonormal)
                .then_some(AuditFinding::FrameNotOrthonormal { sample, deviation })
        })
        .collect()
}

fn position(v: &crate::mesh::Vertex) -> Vector3<f64> {
    Vector3::from(v.position.map(f64::from))
}

/// Triangles whose stored normal points toward the centre of their solid.
pub fn audit_winding(mesh: &MeshBuffer, buffer: BufferKind) -> Vec<AuditFinding> {
    let mut findings = Vec::new();
    let solid_len = TRIANGLES_PER_SOLID * 3;

    if mesh.vertex_count() % solid_len != 0 {
        findings.push(AuditFinding::PartialSolid {
            buffer,
            triangles: mesh.triangle_count(),
        });
    }

    for (solid, vertices) in mesh.vertices().chunks_exact(solid_len).enumerate() {
        // Any weighted mean of the corners lies inside a convex solid.
        let center = vertices.iter().map(position).sum::<Vector3<f64>>() / solid_len as f64;

        for (k, triangle) in vertices.chunks_exact(3).enumerate() {
            let centroid = triangle.iter().map(position).sum::<Vector3<f64>>() / 3.0;
            let normal = Vector3::from(triangle[0].normal.map(f64::from));
            if normal.dot(&(centroid - center)) <= 0.0 {
                findings.push(AuditFinding::InwardFace {
                    buffer,
                    triangle: solid * TRIANGLES_PER_SOLID + k,
                });
            }
        }
    }
    findings
}

/// Run every check on a generated track.
#[instrument(skip(track, tolerance))]
pub fn audit_track(track: &TrackMesh, tolerance: &Tolerance) -> TrackAudit {
    let mut findings = audit_frames(track.frame_path(), tolerance);
    findings.extend(audit_winding(track.rails(), BufferKind::Rails));
    findings.extend(audit_winding(track.planks(), BufferKind::Planks));

    let audit = TrackAudit {
        frames_checked: track.frames().len(),
        solids_checked: (track.rails().triangle_count() + track.planks().triangle_count())
            / TRIANGLES_PER_SOLID,
        findings,
    };
    info!(
        clean = audit.is_clean(),
        frames = audit.frames_checked,
        solids = audit.solids_checked,
        findings = audit.findings.len(),
        "track audit complete"
    );
    audit
}
