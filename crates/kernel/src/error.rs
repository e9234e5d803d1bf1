use thiserror::Error;

/// Failures reported before or during track generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    #[error("track needs at least {required} control points, got {provided}")]
    TooFewControlPoints { required: usize, provided: usize },

    #[error("control point {index} is not finite")]
    NonFinitePoint { index: usize },

    #[error("invalid track configuration: {parameter} = {value}")]
    InvalidConfig { parameter: &'static str, value: f64 },

    #[error("spline parameter {s} is outside the evaluable range [{min}, {max})")]
    ParameterOutOfRange { s: f64, min: f64, max: f64 },
}
