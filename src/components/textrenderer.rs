use glam::Vec2;

use crate::color::Color;
use crate::components::renderer::{Renderer, RendererBase};
use crate::core::component::{Component, DrawContext};
use crate::core::entity::Entity;
use crate::error::EngineResult;
use crate::resources::graphicsassets::{FontMetrics, GraphicsAssets};
use crate::resources::rendermanager::DrawCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Draws a string with a registered font.
///
/// Alignment moves the draw anchor inside the measured text (left edge,
/// centre, right edge). The entity's origin is added on top of it, so text
/// alignment never rewrites the entity's `Origin`.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    base: RendererBase,
    font: FontMetrics,
    text: String,
    alignment: Alignment,
    size: Vec2,
}

impl TextRenderer {
    pub fn new(
        font_name: &str,
        text: impl Into<String>,
        color: Color,
        assets: &GraphicsAssets,
        entity: &mut Entity,
    ) -> EngineResult<Self> {
        let font = assets.load_font(font_name)?;
        let text = text.into();
        let size = font.measure(&text);
        let transform = entity.transform();
        Ok(Self {
            base: RendererBase::new(&transform, entity.origin_value(), color),
            font,
            text,
            alignment: Alignment::Left,
            size,
        })
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.size = self.font.measure(&self.text);
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    pub fn font_name(&self) -> &str {
        &self.font.name
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Anchor inside the text box implied by the alignment.
    pub fn alignment_anchor(&self) -> Vec2 {
        match self.alignment {
            Alignment::Left => Vec2::ZERO,
            Alignment::Center => self.size * 0.5,
            Alignment::Right => Vec2::new(self.size.x, 0.0),
        }
    }
}

impl Renderer for TextRenderer {
    fn base(&self) -> &RendererBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RendererBase {
        &mut self.base
    }

    fn asset_name(&self) -> &str {
        &self.font.name
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn draw_command(&self) -> Option<DrawCommand> {
        Some(DrawCommand::Text {
            font: self.font.name.clone(),
            text: self.text.clone(),
            params: self.base.params(self.base.origin + self.alignment_anchor()),
        })
    }
}

impl Component for TextRenderer {
    fn draw(&self, ctx: &mut DrawContext<'_>) {
        if let Some(command) = self.draw_command() {
            ctx.render.submit(command);
        }
    }

    fn origin_changed(&mut self, origin: Vec2) {
        self.base.origin = origin;
    }

    fn as_renderer(&self) -> Option<&dyn Renderer> {
        Some(self)
    }

    fn as_renderer_mut(&mut self) -> Option<&mut dyn Renderer> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::transform::TransformArena;
    use crate::error::EngineError;

    fn assets() -> GraphicsAssets {
        let mut assets = GraphicsAssets::new();
        assets.register_font(FontMetrics::new("mono", 8.0, 10.0));
        assets
    }

    #[test]
    fn alignment_anchor_follows_text_size() {
        let arena = TransformArena::new();
        let mut entity = Entity::new(&arena);
        let mut text = TextRenderer::new("mono", "PLAY", Color::WHITE, &assets(), &mut entity)
            .unwrap()
            .with_alignment(Alignment::Center);
        assert_eq!(text.alignment_anchor(), Vec2::new(16.0, 5.0));
        text.set_alignment(Alignment::Right);
        assert_eq!(text.alignment_anchor(), Vec2::new(32.0, 0.0));
        text.set_text("GO");
        assert_eq!(text.alignment_anchor(), Vec2::new(16.0, 0.0));
    }

    #[test]
    fn unknown_font_fails() {
        let arena = TransformArena::new();
        let mut entity = Entity::new(&arena);
        let err = TextRenderer::new("serif", "x", Color::WHITE, &assets(), &mut entity).unwrap_err();
        assert_eq!(err, EngineError::UnknownAsset("serif".into()));
    }
}
