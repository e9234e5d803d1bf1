use nalgebra::{Matrix4, Matrix4x3, RowVector4};

use super::Point3d;
use crate::error::TrackError;

/// Catmull-Rom basis for tension `tau`.
///
/// Row `k` holds the coefficients of `u^k`, column `j` weights the `j`-th of
/// the four neighbourhood points.
fn basis(tau: f64) -> Matrix4<f64> {
    #[rustfmt::skip]
    let m = Matrix4::new(
        0.0,       1.0,       0.0,             0.0,
        -tau,      0.0,       tau,             0.0,
        2.0 * tau, tau - 3.0, 3.0 - 2.0 * tau, -tau,
        -tau,      2.0 - tau, tau - 2.0,       tau,
    );
    m
}

/// Evaluate a Catmull-Rom segment at local parameter `u`.
///
/// The curve runs from `b` (u = 0) to `c` (u = 1); `a` and `d` only shape the
/// tangents. The four points must be consecutive control points.
pub fn catmull_rom(
    a: &Point3d,
    b: &Point3d,
    c: &Point3d,
    d: &Point3d,
    tau: f64,
    u: f64,
) -> Point3d {
    #[rustfmt::skip]
    let points = Matrix4x3::new(
        a.x, a.y, a.z,
        b.x, b.y, b.z,
        c.x, c.y, c.z,
        d.x, d.y, d.z,
    );
    let powers = RowVector4::new(1.0, u, u * u, u * u * u);
    let p = powers * basis(tau) * points;
    Point3d::new(p[0], p[1], p[2])
}

/// An ordered control polygon interpolated by Catmull-Rom segments.
#[derive(Debug, Clone)]
pub struct Spline {
    points: Vec<Point3d>,
    tension: f64,
}

impl Spline {
    pub fn new(points: Vec<Point3d>, tension: f64) -> Self {
        Self { points, tension }
    }

    pub fn points(&self) -> &[Point3d] {
        &self.points
    }

    pub fn tension(&self) -> f64 {
        self.tension
    }

    /// Number of four-point neighbourhoods, i.e. valid `window` arguments to
    /// [`Spline::evaluate`].
    pub fn window_count(&self) -> usize {
        self.points.len().saturating_sub(3)
    }

    /// Evaluate the neighbourhood starting at control point `window` at local
    /// parameter `u`. The curve passes between points `window + 1` and
    /// `window + 2`.
    ///
    /// # Panics
    ///
    /// Panics if `window + 3` is not a valid control point index.
    pub fn evaluate(&self, window: usize, u: f64) -> Point3d {
        let [a, b, c, d] = [
            &self.points[window],
            &self.points[window + 1],
            &self.points[window + 2],
            &self.points[window + 3],
        ];
        catmull_rom(a, b, c, d, self.tension, u)
    }

    /// Evaluate at a global parameter `s`.
    ///
    /// The integer part of `s` names the control point the segment starts at,
    /// so `s = 1.5` lies halfway between points 1 and 2. Valid values are
    /// `1 <= s < len - 2`.
    pub fn point_at(&self, s: f64) -> Result<Point3d, TrackError> {
        let min = 1.0;
        let max = self.points.len() as f64 - 2.0;
        if !s.is_finite() || s < min || s >= max {
            return Err(TrackError::ParameterOutOfRange { s, min, max });
        }
        let whole = s.floor();
        Ok(self.evaluate(whole as usize - 1, s - whole))
    }
}
