use crate::color::Color;
use crate::components::renderer::{TextureRenderer, texture_renderer_component};
use crate::core::entity::Entity;
use crate::resources::graphicsassets::GraphicsAssets;

/// Solid rectangle, for UI panels, paddles and backgrounds.
#[derive(Debug, Clone)]
pub struct RectangleRenderer {
    inner: TextureRenderer,
}

impl RectangleRenderer {
    pub fn new(
        name: &str,
        width: u32,
        height: u32,
        color: Color,
        assets: &mut GraphicsAssets,
        entity: &mut Entity,
    ) -> Self {
        let texture = assets.load_rectangle(name, width, height);
        let transform = entity.transform();
        Self {
            inner: TextureRenderer::new(texture, &transform, entity.origin_value(), color),
        }
    }
}

texture_renderer_component!(RectangleRenderer);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::origin::Origin;
    use crate::components::transform::TransformArena;
    use crate::resources::rendermanager::{DrawCommand, RenderManager};
    use glam::Vec2;

    #[test]
    fn draws_once_at_world_position_with_origin() {
        let arena = TransformArena::new();
        let mut assets = GraphicsAssets::new();
        let mut entity = Entity::new(&arena);
        entity.transform().set_local_position(Vec2::new(40.0, 30.0));
        let renderer = RectangleRenderer::new("panel", 20, 10, Color::RED, &mut assets, &mut entity);
        entity.add_component(renderer).unwrap();
        entity.add_component(Origin::new(Vec2::new(10.0, 5.0))).unwrap();

        let mut render = RenderManager::new();
        entity.draw(&mut render);
        assert_eq!(render.commands().len(), 1);
        let DrawCommand::Texture { texture, params, source } = &render.commands()[0] else {
            panic!("expected a texture command");
        };
        assert_eq!(texture, "panel");
        assert_eq!(*source, None);
        assert_eq!(params.position, Vec2::new(40.0, 30.0));
        assert_eq!(params.origin, Vec2::new(10.0, 5.0));
        assert_eq!(params.color, Color::RED);
        assert_eq!(entity.renderer().unwrap().size(), Vec2::new(20.0, 10.0));
    }

    #[test]
    fn hidden_entity_draws_nothing() {
        let arena = TransformArena::new();
        let mut assets = GraphicsAssets::new();
        let mut entity = Entity::new(&arena);
        let renderer = RectangleRenderer::new("panel", 4, 4, Color::WHITE, &mut assets, &mut entity);
        entity.add_component(renderer).unwrap();
        entity.set_visible(false);
        let mut render = RenderManager::new();
        entity.draw(&mut render);
        assert!(render.commands().is_empty());
    }
}
