use std::fs;
use std::path::{Path, PathBuf};

use coaster_kernel::{ControlPointTransform, Point3d};
use tracing::{info, instrument};

use crate::errors::LoadError;
use crate::spline::parse_control_points;

/// Conventional folder for spline files, relative to the working directory.
pub const DEFAULT_FOLDER: &str = "Media/";

/// Loads spline files by name from a base folder.
#[derive(Debug, Clone)]
pub struct SplineLibrary {
    pub folder: PathBuf,
    pub transform: ControlPointTransform,
}

impl Default for SplineLibrary {
    fn default() -> Self {
        Self {
            folder: PathBuf::from(DEFAULT_FOLDER),
            transform: ControlPointTransform::default(),
        }
    }
}

impl SplineLibrary {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            ..Self::default()
        }
    }

    /// Absolute and explicitly relative paths (`./`, `../`) are used as
    /// given; bare names are looked up in the folder.
    pub fn resolve(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() || name.starts_with("./") || name.starts_with("../") {
            path.to_path_buf()
        } else {
            self.folder.join(path)
        }
    }

    /// Read and place the control points of spline `name`.
    #[instrument(skip(self), fields(folder = %self.folder.display()))]
    pub fn load(&self, name: &str) -> Result<Vec<Point3d>, LoadError> {
        let path = self.resolve(name);
        let text = fs::read_to_string(&path).map_err(|e| LoadError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let points = parse_control_points(&text, &self.transform)?;
        info!(path = %path.display(), points = points.len(), "spline loaded");
        Ok(points)
    }
}
