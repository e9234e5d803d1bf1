use std::ops::Range;

use thiserror::Error;
use tracing::{info, instrument, warn};

use super::spline::Spline;
use super::{Point3d, Vec3};
use crate::Tolerance;

/// Orthonormal frame carried along the track.
///
/// `right = up_prev × front` and `up = front × right`, so `(right, up, front)`
/// is a right-handed basis in the same order as world `(x, y, z)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub origin: Point3d,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
}

/// Why a propagation step could not produce a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("curve point coincides with the previous origin")]
    ZeroLengthStep,

    #[error("direction of travel is parallel to the previous up vector")]
    FrontParallelToUp,
}

impl Frame {
    /// Axis-aligned frame at `origin`: front +Z, up +Y, right +X.
    pub fn seed(origin: Point3d) -> Self {
        Self {
            origin,
            front: Vec3::z(),
            up: Vec3::y(),
            right: Vec3::x(),
        }
    }

    /// Derive the frame at the next curve point.
    ///
    /// The new up vector is built from this frame's up, which keeps the track
    /// from twisting between steps.
    pub fn advance(&self, origin: Point3d, tolerance: &Tolerance) -> Result<Self, FrameError> {
        let front = tolerance
            .normalize(origin - self.origin)
            .ok_or(FrameError::ZeroLengthStep)?;
        let right = tolerance
            .normalize(self.up.cross(&front))
            .ok_or(FrameError::FrontParallelToUp)?;
        let up = front.cross(&right).normalize();
        Ok(Self {
            origin,
            front,
            up,
            right,
        })
    }

    /// World position of a point given in this frame's right/up plane.
    pub fn place(&self, lateral: f64, vertical: f64) -> Point3d {
        self.origin + self.right * lateral + self.up * vertical
    }

    /// Largest deviation from unit length or orthogonality among the three axes.
    pub fn orthonormality_error(&self) -> f64 {
        [
            (self.front.norm() - 1.0).abs(),
            (self.up.norm() - 1.0).abs(),
            (self.right.norm() - 1.0).abs(),
            self.front.dot(&self.up).abs(),
            self.front.dot(&self.right).abs(),
            self.up.dot(&self.right).abs(),
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }
}

/// A frame produced at local parameter `u` of a spline segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    pub segment: usize,
    pub u: f64,
    pub frame: Frame,
}

/// Local parameters `0, step, 2·step, ...` that stay below 1.
///
/// Each value is a multiple of `step` rather than a running sum, so a step
/// that does not divide 1 keeps its size and the last value falls short of 1.
pub fn step_parameters(step: f64) -> impl Iterator<Item = f64> + Clone {
    (0usize..)
        .map(move |k| k as f64 * step)
        .take_while(|&u| u < 1.0)
}

/// Contiguous run of samples that belong to one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSpan {
    pub segment: usize,
    pub samples: Range<usize>,
}

/// The materialised frame sequence of a whole track.
///
/// Sample `k` pairs with the frame before it (the seed for `k = 0`), so every
/// sample describes one piece of track.
#[derive(Debug, Clone)]
pub struct FramePath {
    seed: Frame,
    samples: Vec<FrameSample>,
    skipped: usize,
}

impl FramePath {
    /// Walk segments `first_segment..` of `spline` at the parameters of
    /// [`step_parameters`], folding every curve point into the running frame.
    ///
    /// Degenerate steps are logged and dropped; the previous frame stays
    /// current so the next step measures from it.
    #[instrument(skip(spline, seed, tolerance), fields(points = spline.points().len()))]
    pub fn propagate(
        spline: &Spline,
        first_segment: usize,
        step: f64,
        seed: Frame,
        tolerance: &Tolerance,
    ) -> Self {
        let mut skipped = 0;
        let samples: Vec<FrameSample> = (first_segment..spline.window_count())
            .flat_map(|segment| step_parameters(step).map(move |u| (segment, u)))
            .scan(seed, |current, (segment, u)| {
                let origin = spline.evaluate(segment, u);
                match current.advance(origin, tolerance) {
                    Ok(frame) => {
                        *current = frame;
                        Some(Some(FrameSample { segment, u, frame }))
                    }
                    Err(err) => {
                        warn!(segment, u, %err, "skipping degenerate frame step");
                        skipped += 1;
                        Some(None)
                    }
                }
            })
            .flatten()
            .collect();

        info!(samples = samples.len(), skipped, "frames propagated");

        Self {
            seed,
            samples,
            skipped,
        }
    }

    pub fn seed(&self) -> &Frame {
        &self.seed
    }

    pub fn samples(&self) -> &[FrameSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of steps dropped as degenerate.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// The frame a sample's piece of track starts from.
    pub fn previous(&self, index: usize) -> &Frame {
        match index {
            0 => &self.seed,
            k => &self.samples[k - 1].frame,
        }
    }

    /// Group samples by segment, in track order.
    pub fn segments(&self) -> Vec<SegmentSpan> {
        let mut spans: Vec<SegmentSpan> = Vec::new();
        for (index, sample) in self.samples.iter().enumerate() {
            match spans.last_mut() {
                Some(span) if span.segment == sample.segment => span.samples.end = index + 1,
                _ => spans.push(SegmentSpan {
                    segment: sample.segment,
                    samples: index..index + 1,
                }),
            }
        }
        spans
    }
}
