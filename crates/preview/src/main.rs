//! coaster - generate a roller-coaster track from a spline file
//!
//! Loads control points, builds the rail and plank meshes, hands them to an
//! in-memory render backend and logs what would have been drawn.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use coaster_format::{load_track_config_file, SplineLibrary, DEFAULT_FOLDER};
use coaster_kernel::{audit_track, generate_track, TrackConfig};
use coaster_render::{RecordingBackend, TrackRenderer};

#[derive(Parser)]
#[command(name = "coaster")]
#[command(about = "Procedural roller-coaster track generator")]
#[command(version)]
struct Cli {
    /// Spline file name, looked up in the spline folder
    spline: String,

    /// Track configuration file (coaster-track JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder holding spline files
    #[arg(short, long, default_value = DEFAULT_FOLDER)]
    folder: PathBuf,

    /// Check frames and winding after generation
    #[arg(long)]
    audit: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_track_config_file(path)
            .with_context(|| format!("loading track configuration {}", path.display()))?,
        None => TrackConfig::default(),
    };

    let library = SplineLibrary::new(&cli.folder);
    let points = library
        .load(&cli.spline)
        .with_context(|| format!("loading spline {}", cli.spline))?;

    let track = generate_track(&points, &config).context("generating track")?;

    if cli.audit {
        let audit = audit_track(&track, &config.tolerance);
        for finding in &audit.findings {
            warn!(%finding, "audit finding");
        }
    }

    let mut backend = RecordingBackend::new();
    {
        let mut renderer = TrackRenderer::new(&mut backend, &track)?;
        renderer.draw()?;
    }

    info!(
        control_points = points.len(),
        frames = track.frames().len(),
        rail_triangles = track.rails().triangle_count(),
        plank_triangles = track.planks().triangle_count(),
        pillars = track.pillar_segments().len(),
        max_height = track.max_height(),
        uploaded_bytes = backend.uploaded_bytes(),
        draw_calls = backend.draw_calls(),
        "track ready"
    );

    if let Some(camera) = track.ride_camera(0) {
        info!(eye = ?camera.eye, look = ?camera.look, "ride starts");
    }

    Ok(())
}
