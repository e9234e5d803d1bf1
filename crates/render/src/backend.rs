use coaster_kernel::{TrackMesh, Vertex};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::{shade_normals, VertexLayout};

/// Texture bound for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Rail,
    Plank,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("buffer handle {0} is not live")]
    UnknownHandle(u32),

    #[error("vertex layout stride {stride} does not match the backend")]
    LayoutMismatch { stride: usize },

    #[error("backend failure: {0}")]
    Backend(String),
}

/// The GPU side of the hand-off: owns buffers addressed by opaque handles.
pub trait RenderBackend {
    type Handle: Copy + std::fmt::Debug;

    /// Create a vertex buffer holding `vertices` laid out as `layout`.
    fn upload(
        &mut self,
        label: &str,
        vertices: &[Vertex],
        layout: &VertexLayout,
    ) -> Result<Self::Handle, RenderError>;

    /// Draw `vertex_count` vertices of `handle` as a triangle list.
    fn draw(
        &mut self,
        handle: Self::Handle,
        texture: TextureSlot,
        vertex_count: usize,
    ) -> Result<(), RenderError>;

    fn release(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy)]
struct Uploaded<H> {
    handle: H,
    vertex_count: usize,
}

/// Holds the two uploaded track buffers for as long as it lives and releases
/// them on drop.
pub struct TrackRenderer<'a, B: RenderBackend> {
    backend: &'a mut B,
    rails: Option<Uploaded<B::Handle>>,
    planks: Option<Uploaded<B::Handle>>,
}

impl<'a, B: RenderBackend> TrackRenderer<'a, B> {
    /// Shade and upload both buffers of `track`.
    #[instrument(skip(backend, track))]
    pub fn new(backend: &'a mut B, track: &TrackMesh) -> Result<Self, RenderError> {
        let layout = VertexLayout::of_vertex();

        let rail_vertices = shade_normals(track.rails().vertices());
        let rails = Uploaded {
            handle: backend.upload("rails", &rail_vertices, &layout)?,
            vertex_count: rail_vertices.len(),
        };

        let plank_vertices = shade_normals(track.planks().vertices());
        let planks = match backend.upload("planks", &plank_vertices, &layout) {
            Ok(handle) => Uploaded {
                handle,
                vertex_count: plank_vertices.len(),
            },
            Err(err) => {
                warn!(%err, "plank upload failed, releasing rails");
                backend.release(rails.handle);
                return Err(err);
            }
        };

        info!(
            rail_vertices = rails.vertex_count,
            plank_vertices = planks.vertex_count,
            "track uploaded"
        );
        Ok(Self {
            backend,
            rails: Some(rails),
            planks: Some(planks),
        })
    }

    /// Draw rails with the rail texture and planks with the plank texture.
    pub fn draw(&mut self) -> Result<(), RenderError> {
        let passes = [
            (self.rails, TextureSlot::Rail),
            (self.planks, TextureSlot::Plank),
        ];
        for (buffer, texture) in passes {
            let Some(buffer) = buffer else { continue };
            if buffer.vertex_count == 0 {
                debug!(?texture, "skipping empty buffer");
                continue;
            }
            self.backend
                .draw(buffer.handle, texture, buffer.vertex_count)?;
        }
        Ok(())
    }

    pub fn backend(&self) -> &B {
        &*self.backend
    }
}

impl<B: RenderBackend> Drop for TrackRenderer<'_, B> {
    fn drop(&mut self) {
        for buffer in [self.rails.take(), self.planks.take()].into_iter().flatten() {
            debug!(handle = ?buffer.handle, "releasing track buffer");
            self.backend.release(buffer.handle);
        }
    }
}
