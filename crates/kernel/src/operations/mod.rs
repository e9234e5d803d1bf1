//! Track parts extruded between consecutive frames, and the rules for where
//! each part goes.
//!
//! All dimensions are in world units, measured in the right/up plane of a
//! frame from the curve point it sits on.

pub mod extrude;
pub mod placement;

/// Base unit for part thickness.
pub const UNIT: f64 = 0.05;

/// Distance between the two running rails.
pub const RAIL_GAP: f64 = 0.3;

/// How far the running surface hangs below the curve.
pub const TRACK_DROP: f64 = 0.4;

/// Length of a support pillar below the centre beam.
pub const PILLAR_DROP: f64 = 30.0;
