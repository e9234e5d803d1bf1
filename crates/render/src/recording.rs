use std::collections::BTreeMap;

use coaster_kernel::Vertex;
use tracing::warn;

use crate::backend::{RenderBackend, RenderError, TextureSlot};
use crate::{interleave, VertexLayout};

/// One call made against a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Upload {
        handle: u32,
        label: String,
        vertex_count: usize,
        bytes: usize,
    },
    Draw {
        handle: u32,
        texture: TextureSlot,
        vertex_count: usize,
    },
    Release {
        handle: u32,
    },
}

/// In-memory backend that keeps a log of every call instead of talking to
/// a GPU.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_handle: u32,
    live: BTreeMap<u32, usize>,
    commands: Vec<Command>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Buffers uploaded and not yet released.
    pub fn live_buffers(&self) -> usize {
        self.live.len()
    }

    pub fn uploaded_bytes(&self) -> usize {
        self.commands
            .iter()
            .map(|command| match command {
                Command::Upload { bytes, .. } => *bytes,
                _ => 0,
            })
            .sum()
    }

    pub fn draw_calls(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, Command::Draw { .. }))
            .count()
    }
}

impl RenderBackend for RecordingBackend {
    type Handle = u32;

    fn upload(
        &mut self,
        label: &str,
        vertices: &[Vertex],
        layout: &VertexLayout,
    ) -> Result<u32, RenderError> {
        if *layout != VertexLayout::of_vertex() {
            return Err(RenderError::LayoutMismatch {
                stride: layout.stride,
            });
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.live.insert(handle, vertices.len());
        self.commands.push(Command::Upload {
            handle,
            label: label.to_string(),
            vertex_count: vertices.len(),
            bytes: interleave(vertices).len(),
        });
        Ok(handle)
    }

    fn draw(
        &mut self,
        handle: u32,
        texture: TextureSlot,
        vertex_count: usize,
    ) -> Result<(), RenderError> {
        let stored = *self
            .live
            .get(&handle)
            .ok_or(RenderError::UnknownHandle(handle))?;
        if vertex_count > stored || vertex_count % 3 != 0 {
            return Err(RenderError::Backend(format!(
                "cannot draw {vertex_count} vertices from a buffer of {stored}"
            )));
        }
        self.commands.push(Command::Draw {
            handle,
            texture,
            vertex_count,
        });
        Ok(())
    }

    fn release(&mut self, handle: u32) {
        if self.live.remove(&handle).is_none() {
            warn!(handle, "release of a buffer that is not live");
            return;
        }
        self.commands.push(Command::Release { handle });
    }
}
