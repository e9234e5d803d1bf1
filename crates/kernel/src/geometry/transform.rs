use serde::{Deserialize, Serialize};

use super::{Point3d, Vec3};

/// Load-time placement of control points.
///
/// Spline files store each point as an offset from the one before it. The
/// running sum starts at `start`, and every accumulated position is scaled
/// uniformly about the world origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlPointTransform {
    pub start: Vec3,
    pub scale: f64,
}

impl Default for ControlPointTransform {
    fn default() -> Self {
        Self {
            start: Vec3::new(-2.0, 0.0, -4.5),
            scale: 2.0,
        }
    }
}

impl ControlPointTransform {
    /// Leave deltas unscaled and start the sum at the origin.
    pub fn identity() -> Self {
        Self {
            start: Vec3::zeros(),
            scale: 1.0,
        }
    }

    /// Turn relative deltas into absolute, scaled control points.
    pub fn apply(&self, deltas: &[Vec3]) -> Vec<Point3d> {
        deltas
            .iter()
            .scan(self.start, |position, delta| {
                *position += delta;
                Some(Point3d::from(*position * self.scale))
            })
            .collect()
    }
}
