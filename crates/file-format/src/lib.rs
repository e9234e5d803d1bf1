//! Spline files and track configuration documents.

pub mod config;
pub mod errors;
pub mod library;
pub mod spline;

pub use config::{
    load_track_config, load_track_config_file, save_track_config, TrackFile, FORMAT_ID,
    FORMAT_VERSION,
};
pub use errors::{LoadError, SaveError};
pub use library::{SplineLibrary, DEFAULT_FOLDER};
pub use spline::{parse_control_points, parse_deltas};
