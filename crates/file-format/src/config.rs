use std::fs;
use std::path::Path;

use coaster_kernel::TrackConfig;
use serde::{Deserialize, Serialize};

use crate::errors::{LoadError, SaveError};

/// Format identifier stored in every track configuration file.
pub const FORMAT_ID: &str = "coaster-track";

/// Current track configuration format version.
pub const FORMAT_VERSION: u32 = 1;

/// The top-level structure of a track configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackFile {
    pub format: String,
    pub version: u32,
    #[serde(default)]
    pub config: TrackConfig,
}

/// Deserialize and validate a track configuration from JSON.
pub fn load_track_config(json: &str) -> Result<TrackConfig, LoadError> {
    let raw: TrackFile =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if raw.format != FORMAT_ID {
        return Err(LoadError::UnknownFormat(raw.format));
    }
    if raw.version == 0 || raw.version > FORMAT_VERSION {
        return Err(LoadError::UnsupportedVersion {
            file_version: raw.version,
            supported_version: FORMAT_VERSION,
        });
    }

    raw.config.validate()?;
    Ok(raw.config)
}

pub fn load_track_config_file(path: &Path) -> Result<TrackConfig, LoadError> {
    let json = fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    load_track_config(&json)
}

/// Serialize a track configuration to a pretty-printed JSON string.
pub fn save_track_config(config: &TrackConfig) -> Result<String, SaveError> {
    let file = TrackFile {
        format: FORMAT_ID.to_string(),
        version: FORMAT_VERSION,
        config: config.clone(),
    };
    serde_json::to_string_pretty(&file).map_err(|e| SaveError::Serialize(e.to_string()))
}
