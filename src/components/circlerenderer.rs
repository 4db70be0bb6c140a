use crate::color::Color;
use crate::components::renderer::{TextureRenderer, texture_renderer_component};
use crate::core::entity::Entity;
use crate::resources::graphicsassets::GraphicsAssets;

/// Filled circle drawn from a `2 * radius` square texture.
#[derive(Debug, Clone)]
pub struct CircleRenderer {
    inner: TextureRenderer,
    radius: u32,
}

impl CircleRenderer {
    pub fn new(
        name: &str,
        radius: u32,
        color: Color,
        assets: &mut GraphicsAssets,
        entity: &mut Entity,
    ) -> Self {
        let texture = assets.load_circle(name, radius);
        let transform = entity.transform();
        Self {
            inner: TextureRenderer::new(texture, &transform, entity.origin_value(), color),
            radius,
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }
}

texture_renderer_component!(CircleRenderer);
