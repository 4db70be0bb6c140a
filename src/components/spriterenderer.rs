use crate::color::Color;
use crate::components::renderer::{TextureRenderer, texture_renderer_component};
use crate::core::entity::Entity;
use crate::error::EngineResult;
use crate::resources::graphicsassets::GraphicsAssets;

/// Draws a host-registered sprite texture, optionally one cell of a sheet.
#[derive(Debug, Clone)]
pub struct SpriteRenderer {
    inner: TextureRenderer,
}

impl SpriteRenderer {
    /// Fails with `UnknownAsset` if the sprite was never registered.
    pub fn new(name: &str, assets: &GraphicsAssets, entity: &mut Entity) -> EngineResult<Self> {
        let texture = assets.load_sprite(name)?;
        let transform = entity.transform();
        Ok(Self {
            inner: TextureRenderer::new(texture, &transform, entity.origin_value(), Color::WHITE),
        })
    }
}

texture_renderer_component!(SpriteRenderer);
