//! Draw-command recorder.
//!
//! Renderers never talk to a graphics API directly. Each visible renderer
//! submits one [`DrawCommand`] per frame; the [`RenderManager`] keeps the
//! frame's list (for inspection, tests and the `--dump-draw-list` flag of the
//! demo binary) and forwards every command to an optional [`RenderBackend`]
//! supplied by the host.

use glam::Vec2;
use serde::Serialize;

use crate::color::Color;
use crate::shapes::Rect;

/// Mirroring applied when drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SpriteEffects {
    #[default]
    None,
    FlipHorizontally,
    FlipVertically,
}

/// Placement shared by every draw command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawParams {
    /// World position of the anchor.
    pub position: Vec2,
    pub color: Color,
    /// Radians.
    pub rotation: f32,
    /// Anchor offset inside the drawn image.
    pub origin: Vec2,
    pub scale: f32,
    pub effects: SpriteEffects,
    pub layer_depth: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Texture {
        texture: String,
        /// `None` draws the whole texture.
        source: Option<Rect>,
        params: DrawParams,
    },
    Text {
        font: String,
        text: String,
        params: DrawParams,
    },
}

impl DrawCommand {
    pub fn params(&self) -> &DrawParams {
        match self {
            DrawCommand::Texture { params, .. } | DrawCommand::Text { params, .. } => params,
        }
    }
}

/// Host-side sink for draw commands (a GPU batcher, a test spy, ...).
pub trait RenderBackend {
    fn begin_frame(&mut self) {}
    fn submit(&mut self, command: &DrawCommand);
    fn end_frame(&mut self) {}
}

#[derive(Default)]
pub struct RenderManager {
    commands: Vec<DrawCommand>,
    backend: Option<Box<dyn RenderBackend>>,
    frames: u64,
}

impl RenderManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(backend: Box<dyn RenderBackend>) -> Self {
        Self {
            backend: Some(backend),
            ..Self::default()
        }
    }

    pub fn set_backend(&mut self, backend: Option<Box<dyn RenderBackend>>) {
        self.backend = backend;
    }

    /// Clears the previous frame's commands.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        if let Some(backend) = self.backend.as_mut() {
            backend.begin_frame();
        }
    }

    pub fn end_frame(&mut self) {
        self.frames += 1;
        if let Some(backend) = self.backend.as_mut() {
            backend.end_frame();
        }
    }

    pub fn submit(&mut self, command: DrawCommand) {
        if let Some(backend) = self.backend.as_mut() {
            backend.submit(&command);
        }
        self.commands.push(command);
    }

    /// Commands recorded since the last [`begin_frame`](Self::begin_frame).
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Recorded commands ordered back to front by layer depth.
    pub fn commands_by_layer(&self) -> Vec<&DrawCommand> {
        let mut sorted: Vec<&DrawCommand> = self.commands.iter().collect();
        sorted.sort_by(|a, b| a.params().layer_depth.total_cmp(&b.params().layer_depth));
        sorted
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}
