use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::TrackError;
use crate::geometry::frame::{step_parameters, Frame, FramePath, FrameSample, SegmentSpan};
use crate::geometry::spline::Spline;
use crate::geometry::{Point3d, Vec2, Vec3};
use crate::mesh::MeshBuffer;
use crate::operations::extrude;
use crate::operations::placement::PlacementPolicy;
use crate::Tolerance;

/// Tuning for a generated track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Parameter distance between frames inside a segment.
    pub step: f64,
    /// Catmull-Rom tension.
    pub tension: f64,
    /// Added to the first segment's start point to place the seed frame.
    pub seed_offset: Vec3,
    /// Index of the first control-point window that is laid as track.
    pub first_segment: usize,
    /// Rider eye height above the track frame.
    pub camera_height: f64,
    /// Sideways/vertical shift of every part, for laying parallel tracks.
    pub lateral_offset: Vec2,
    pub placement: PlacementPolicy,
    #[serde(skip)]
    pub tolerance: Tolerance,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            step: 0.05,
            tension: 0.5,
            seed_offset: Vec3::new(1.7, 0.0, 0.0),
            first_segment: 1,
            camera_height: 4.0,
            lateral_offset: Vec2::zeros(),
            placement: PlacementPolicy::default(),
            tolerance: Tolerance::default(),
        }
    }
}

impl TrackConfig {
    /// Frames per segment: the multiples of `step` below 1.
    pub fn steps_per_segment(&self) -> usize {
        step_parameters(self.step).count()
    }

    /// Smallest control-point count that yields one segment of track.
    pub fn required_points(&self) -> usize {
        self.first_segment + 4
    }

    pub fn validate(&self) -> Result<(), TrackError> {
        let invalid = |parameter, value| Err(TrackError::InvalidConfig { parameter, value });

        if !self.step.is_finite() || self.step <= 0.0 || self.step > 1.0 {
            return invalid("step", self.step);
        }
        if !self.tension.is_finite() {
            return invalid("tension", self.tension);
        }
        if !self.camera_height.is_finite() {
            return invalid("camera_height", self.camera_height);
        }
        if let Some(&value) = self.seed_offset.iter().find(|c| !c.is_finite()) {
            return invalid("seed_offset", value);
        }
        if let Some(&value) = self.lateral_offset.iter().find(|c| !c.is_finite()) {
            return invalid("lateral_offset", value);
        }
        if let Some(range) = self
            .placement
            .reinforced_ranges
            .iter()
            .find(|range| !range.is_valid())
        {
            return invalid("reinforced_ranges", range.lo);
        }
        Ok(())
    }
}

/// Eye placement for a rider sitting on one frame of the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RideCamera {
    pub eye: Point3d,
    pub look: Vec3,
    pub up: Vec3,
}

/// The generated track: two triangle buffers plus the frames they were built
/// from.
#[derive(Debug, Clone)]
pub struct TrackMesh {
    rails: MeshBuffer,
    planks: MeshBuffer,
    frames: FramePath,
    pillar_segments: Vec<usize>,
    camera_height: f64,
}

impl TrackMesh {
    /// Running and guard rails.
    pub fn rails(&self) -> &MeshBuffer {
        &self.rails
    }

    /// Beams, planks and pillars.
    pub fn planks(&self) -> &MeshBuffer {
        &self.planks
    }

    pub fn frames(&self) -> &[FrameSample] {
        self.frames.samples()
    }

    pub fn frame_path(&self) -> &FramePath {
        &self.frames
    }

    /// Segments that received a pillar, in track order.
    pub fn pillar_segments(&self) -> &[usize] {
        &self.pillar_segments
    }

    /// Highest vertex of either buffer.
    pub fn max_height(&self) -> f32 {
        self.rails.max_height().max(self.planks.max_height())
    }

    pub fn ride_camera(&self, index: usize) -> Option<RideCamera> {
        self.frames
            .samples()
            .get(index)
            .map(|sample| self.camera_at(&sample.frame))
    }

    /// Camera placements for a full ride, front to back.
    pub fn ride(&self) -> impl Iterator<Item = RideCamera> + '_ {
        self.frames
            .samples()
            .iter()
            .map(|sample| self.camera_at(&sample.frame))
    }

    fn camera_at(&self, frame: &Frame) -> RideCamera {
        RideCamera {
            eye: frame.origin + frame.up * self.camera_height,
            look: frame.front,
            up: frame.up,
        }
    }

    pub fn into_buffers(self) -> (MeshBuffer, MeshBuffer) {
        (self.rails, self.planks)
    }
}

/// Geometry emitted for one segment.
#[derive(Debug, Default)]
struct SegmentMesh {
    segment: usize,
    rails: MeshBuffer,
    planks: MeshBuffer,
    pillar: bool,
}

fn emit_segment(path: &FramePath, span: &SegmentSpan, config: &TrackConfig) -> SegmentMesh {
    let offset = config.lateral_offset;
    let policy = &config.placement;
    let mut mesh = SegmentMesh {
        segment: span.segment,
        ..SegmentMesh::default()
    };

    for index in span.samples.clone() {
        let prev = path.previous(index);
        let sample = &path.samples()[index];
        let cur = &sample.frame;

        extrude::support_plank(prev, cur, offset).emit_into(&mut mesh.planks);
        for rail in extrude::rail_segment(prev, cur, offset) {
            rail.emit_into(&mut mesh.rails);
        }
        if policy.reinforce_at(sample.u) {
            for part in extrude::reinforced_plank(prev, cur, offset) {
                part.emit_into(&mut mesh.planks);
            }
        }
    }

    // The last pair of the segment carries its pillar and closing plank.
    if let Some(last) = span.samples.clone().last() {
        let prev = path.previous(last);
        let cur = &path.samples()[last].frame;
        if policy.pillar_at(span.segment, cur) {
            extrude::pillar(prev, cur, offset).emit_into(&mut mesh.planks);
            mesh.pillar = true;
        }
        for part in extrude::reinforced_plank(prev, cur, offset) {
            part.emit_into(&mut mesh.planks);
        }
    }

    debug!(
        segment = span.segment,
        rail_triangles = mesh.rails.triangle_count(),
        plank_triangles = mesh.planks.triangle_count(),
        pillar = mesh.pillar,
        "segment emitted"
    );
    mesh
}

#[cfg_attr(all(feature = "parallel", not(test)), allow(dead_code))]
fn emit_sequential(path: &FramePath, spans: &[SegmentSpan], config: &TrackConfig) -> Vec<SegmentMesh> {
    spans
        .iter()
        .map(|span| emit_segment(path, span, config))
        .collect()
}

#[cfg(feature = "parallel")]
fn emit_parallel(path: &FramePath, spans: &[SegmentSpan], config: &TrackConfig) -> Vec<SegmentMesh> {
    use rayon::prelude::*;

    spans
        .par_iter()
        .map(|span| emit_segment(path, span, config))
        .collect()
}

/// Concatenate per-segment output in segment order.
fn assemble(pieces: Vec<SegmentMesh>, frames: FramePath, camera_height: f64) -> TrackMesh {
    let mut rails = MeshBuffer::new();
    let mut planks = MeshBuffer::new();
    let mut pillar_segments = Vec::new();

    for mut piece in pieces {
        rails.append(&mut piece.rails);
        planks.append(&mut piece.planks);
        if piece.pillar {
            pillar_segments.push(piece.segment);
        }
    }

    TrackMesh {
        rails,
        planks,
        frames,
        pillar_segments,
        camera_height,
    }
}

/// Check the inputs and set up the spline and seed frame.
fn prepare(points: &[Point3d], config: &TrackConfig) -> Result<(Spline, Frame), TrackError> {
    config.validate()?;

    let required = config.required_points();
    if points.len() < required {
        return Err(TrackError::TooFewControlPoints {
            required,
            provided: points.len(),
        });
    }
    if let Some(index) = points
        .iter()
        .position(|p| !p.coords.iter().all(|c| c.is_finite()))
    {
        return Err(TrackError::NonFinitePoint { index });
    }

    let seed = Frame::seed(points[config.first_segment] + config.seed_offset);
    Ok((Spline::new(points.to_vec(), config.tension), seed))
}

/// Build the rail and plank meshes for a control polygon.
///
/// Frames are propagated along the whole curve first; the parts of each
/// segment are then extruded from that segment's frames alone, so the result
/// does not depend on whether segments are emitted in parallel.
#[instrument(skip(points, config), fields(points = points.len()))]
pub fn generate_track(points: &[Point3d], config: &TrackConfig) -> Result<TrackMesh, TrackError> {
    let (spline, seed) = prepare(points, config)?;
    let frames = FramePath::propagate(
        &spline,
        config.first_segment,
        config.step,
        seed,
        &config.tolerance,
    );
    let spans = frames.segments();

    #[cfg(feature = "parallel")]
    let pieces = emit_parallel(&frames, &spans, config);
    #[cfg(not(feature = "parallel"))]
    let pieces = emit_sequential(&frames, &spans, config);

    let track = assemble(pieces, frames, config.camera_height);

    info!(
        segments = spans.len(),
        rail_triangles = track.rails.triangle_count(),
        plank_triangles = track.planks.triangle_count(),
        pillars = track.pillar_segments.len(),
        max_height = track.max_height(),
        "track generated"
    );
    Ok(track)
}
