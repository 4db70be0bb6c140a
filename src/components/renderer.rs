//! Shared renderer state and the renderer capability.
//!
//! Every renderer holds a [`RendererBase`] with the owner's transform handle,
//! the origin offset, colour, layer depth and sprite effects. Texture-backed
//! renderers (rectangle, circle, sprite) share a [`TextureRenderer`]; text is
//! drawn by [`TextRenderer`](super::textrenderer::TextRenderer).

use glam::Vec2;

use crate::color::Color;
use crate::components::transform::Transform;
use crate::resources::graphicsassets::TextureInfo;
use crate::resources::rendermanager::{DrawCommand, DrawParams, SpriteEffects};
use crate::shapes::Rect;

pub const DEFAULT_LAYER_DEPTH: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct RendererBase {
    transform: Transform,
    pub origin: Vec2,
    pub color: Color,
    pub layer_depth: f32,
    pub effects: SpriteEffects,
}

impl RendererBase {
    pub fn new(transform: &Transform, origin: Vec2, color: Color) -> Self {
        Self {
            transform: transform.clone(),
            origin,
            color,
            layer_depth: DEFAULT_LAYER_DEPTH,
            effects: SpriteEffects::None,
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Placement from the transform's world values, anchored at `origin`.
    pub fn params(&self, origin: Vec2) -> DrawParams {
        DrawParams {
            position: self.transform.world_position(),
            color: self.color,
            rotation: self.transform.world_rotation(),
            origin,
            scale: self.transform.world_scale(),
            effects: self.effects,
            layer_depth: self.layer_depth,
        }
    }
}

/// Capability shared by every renderer component.
pub trait Renderer {
    fn base(&self) -> &RendererBase;

    fn base_mut(&mut self) -> &mut RendererBase;

    /// Name of the texture or font this renderer draws with.
    fn asset_name(&self) -> &str;

    /// Unscaled size of what is drawn.
    fn size(&self) -> Vec2;

    /// The command for this frame, if there is anything to draw.
    fn draw_command(&self) -> Option<DrawCommand>;
}

/// Texture plus optional source rectangle.
#[derive(Debug, Clone)]
pub struct TextureRenderer {
    pub base: RendererBase,
    texture: TextureInfo,
    source: Option<Rect>,
}

impl TextureRenderer {
    pub fn new(texture: TextureInfo, transform: &Transform, origin: Vec2, color: Color) -> Self {
        Self {
            base: RendererBase::new(transform, origin, color),
            texture,
            source: None,
        }
    }

    pub fn texture(&self) -> &TextureInfo {
        &self.texture
    }

    pub fn texture_width(&self) -> u32 {
        self.texture.width
    }

    pub fn texture_height(&self) -> u32 {
        self.texture.height
    }

    pub fn texture_center(&self) -> Vec2 {
        self.texture.center()
    }

    pub fn source_rect(&self) -> Option<Rect> {
        self.source
    }

    /// `None` draws the whole texture.
    pub fn set_source_rect(&mut self, source: Option<Rect>) {
        self.source = source;
    }

    pub fn draw_command(&self) -> DrawCommand {
        DrawCommand::Texture {
            texture: self.texture.name.clone(),
            source: self.source,
            params: self.base.params(self.base.origin),
        }
    }

    pub fn size(&self) -> Vec2 {
        match self.source {
            Some(rect) => rect.size(),
            None => self.texture.size(),
        }
    }
}

/// Implements [`Renderer`] and [`Component`](crate::core::component::Component)
/// for a newtype around [`TextureRenderer`] stored in field `inner`.
macro_rules! texture_renderer_component {
    ($ty:ty) => {
        impl $crate::components::renderer::Renderer for $ty {
            fn base(&self) -> &$crate::components::renderer::RendererBase {
                &self.inner.base
            }

            fn base_mut(&mut self) -> &mut $crate::components::renderer::RendererBase {
                &mut self.inner.base
            }

            fn asset_name(&self) -> &str {
                &self.inner.texture().name
            }

            fn size(&self) -> glam::Vec2 {
                self.inner.size()
            }

            fn draw_command(&self) -> Option<$crate::resources::rendermanager::DrawCommand> {
                Some(self.inner.draw_command())
            }
        }

        impl $crate::core::component::Component for $ty {
            fn draw(&self, ctx: &mut $crate::core::component::DrawContext<'_>) {
                if let Some(command) =
                    $crate::components::renderer::Renderer::draw_command(self)
                {
                    ctx.render.submit(command);
                }
            }

            fn origin_changed(&mut self, origin: glam::Vec2) {
                self.inner.base.origin = origin;
            }

            fn as_renderer(&self) -> Option<&dyn $crate::components::renderer::Renderer> {
                Some(self)
            }

            fn as_renderer_mut(
                &mut self,
            ) -> Option<&mut dyn $crate::components::renderer::Renderer> {
                Some(self)
            }
        }

        impl std::ops::Deref for $ty {
            type Target = $crate::components::renderer::TextureRenderer;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl std::ops::DerefMut for $ty {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.inner
            }
        }
    };
}

pub(crate) use texture_renderer_component;
