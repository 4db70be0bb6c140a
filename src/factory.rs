//! Helpers that assemble common component sets on an entity.
//!
//! Each helper adds a transform (if missing), a renderer built from the asset
//! catalogue and, optionally, a collider sized to match. They fail on the
//! first error and leave whatever was already added in place.

use glam::Vec2;
use log::debug;

use crate::color::Color;
use crate::components::boxcollider::BoxCollider2D;
use crate::components::button::Button;
use crate::components::circlecollider::CircleCollider2D;
use crate::components::circlerenderer::CircleRenderer;
use crate::components::origin::Origin;
use crate::components::rectanglerenderer::RectangleRenderer;
use crate::components::renderer::Renderer;
use crate::components::spriterenderer::SpriteRenderer;
use crate::components::spritesheet::SpriteSheet;
use crate::components::textrenderer::{Alignment, TextRenderer};
use crate::core::entity::{Entity, EntityId};
use crate::core::scene::Scene;
use crate::error::{EngineError, EngineResult};
use crate::resources::graphicsassets::GraphicsAssets;
use crate::shapes::{Circle, Rect};

/// Layer offset that keeps button labels in front of the button face.
const LABEL_LAYER_OFFSET: f32 = 0.1;

/// Collider added by [`load_sprite_components`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColliderKind {
    #[default]
    None,
    Rectangle,
    Circle,
}

/// Rectangle renderer (when `color` is given) plus an optional box collider
/// covering `(0, 0, width, height)`.
pub fn load_rectangle_components(
    entity: &mut Entity,
    name: &str,
    size: (u32, u32),
    color: Option<Color>,
    assets: &mut GraphicsAssets,
    add_collider: bool,
) -> EngineResult<()> {
    let (width, height) = size;
    entity.transform();
    if let Some(color) = color {
        let renderer = RectangleRenderer::new(name, width, height, color, assets, entity);
        entity.add_component(renderer)?;
    }
    if add_collider {
        if !entity.has_component::<Origin>() {
            entity.add_component(Origin::new(Vec2::ZERO))?;
        }
        let collider =
            BoxCollider2D::new(Rect::new(0.0, 0.0, width as f32, height as f32), entity);
        entity.add_component(collider)?;
    }
    Ok(())
}

/// Circle renderer centred on the entity position, plus an optional circle
/// collider of the same radius.
pub fn load_circle_components(
    entity: &mut Entity,
    name: &str,
    radius: u32,
    color: Color,
    assets: &mut GraphicsAssets,
    add_collider: bool,
) -> EngineResult<()> {
    entity.transform();
    let center = Vec2::splat(radius as f32);
    entity.replace_origin(Origin::new(center));
    let renderer = CircleRenderer::new(name, radius, color, assets, entity);
    entity.add_component(renderer)?;
    if add_collider {
        let collider = CircleCollider2D::new(Circle::new(center, radius as f32), entity);
        entity.add_component(collider)?;
    }
    Ok(())
}

/// Sprite renderer for a registered texture, an optional sprite sheet and
/// an optional collider sized to one cell.
///
/// A `grid` of `(0, 0)` means the whole texture is one frame.
pub fn load_sprite_components(
    entity: &mut Entity,
    name: &str,
    assets: &GraphicsAssets,
    collider: ColliderKind,
    grid: (u32, u32),
    grid_index: usize,
) -> EngineResult<()> {
    entity.transform();
    let renderer = SpriteRenderer::new(name, assets, entity)?;
    entity.add_component(renderer)?;
    let sheet = SpriteSheet::new(entity, grid)?;
    let (cell_width, cell_height) = sheet.cell_size();
    entity.add_component(sheet)?;

    let (w, h) = (cell_width as f32, cell_height as f32);
    match collider {
        ColliderKind::None => {}
        ColliderKind::Rectangle => {
            let collider = BoxCollider2D::new(Rect::new(0.0, 0.0, w, h), entity);
            entity.add_component(collider)?;
        }
        ColliderKind::Circle => {
            let center = Vec2::new(w, h) * 0.5;
            entity.replace_origin(Origin::new(center));
            let collider = CircleCollider2D::new(Circle::new(center, w.min(h) * 0.5), entity);
            entity.add_component(collider)?;
        }
    }
    set_sprite_frame(entity, grid_index)
}

/// Selects cell `index` of the entity's sprite sheet, points the sprite
/// renderer at it and fits the collider to the cell.
///
/// A box collider becomes `(0, 0, cell w, cell h)`. A circle collider is
/// centred on the cell with radius `min(w, h) / 2`, and the origin moves to
/// the cell centre.
pub fn set_sprite_frame(entity: &mut Entity, index: usize) -> EngineResult<()> {
    let sheet = entity
        .get_component_mut::<SpriteSheet>()
        .ok_or(EngineError::MissingRequiredComponent {
            component: "sprite frame",
            required: "SpriteSheet",
        })?;
    sheet.set_grid_index(index)?;
    let source = sheet.source_rect();

    let renderer = entity
        .get_component_mut::<SpriteRenderer>()
        .ok_or(EngineError::MissingRequiredComponent {
            component: "sprite frame",
            required: "SpriteRenderer",
        })?;
    renderer.set_source_rect(Some(source));

    let (w, h) = (source.width, source.height);
    if let Some(collider) = entity.get_component::<BoxCollider2D>() {
        collider.set_local_bounds(Rect::new(0.0, 0.0, w, h));
    }
    let center = Vec2::new(w, h) * 0.5;
    if let Some(collider) = entity.get_component::<CircleCollider2D>() {
        collider.set_local_bounds(Circle::new(center, w.min(h) * 0.5));
        if entity.origin_value() != center {
            entity.replace_origin(Origin::new(center));
        }
    }
    debug!("{}: sprite frame {index}", entity.id());
    Ok(())
}

/// Text renderer with the given alignment.
pub fn load_text_components(
    entity: &mut Entity,
    font: &str,
    text: &str,
    color: Color,
    assets: &GraphicsAssets,
    alignment: Alignment,
) -> EngineResult<()> {
    entity.transform();
    let renderer = TextRenderer::new(font, text, color, assets, entity)?.with_alignment(alignment);
    entity.add_component(renderer)?;
    Ok(())
}

/// Rectangle face, box collider and (with a handler) a [`Button`].
/// With `center`, the origin moves to the middle of the face.
pub fn create_button(
    entity: &mut Entity,
    texture_name: &str,
    size: Vec2,
    center: bool,
    color: Color,
    assets: &mut GraphicsAssets,
    on_click: Option<Box<dyn FnMut()>>,
) -> EngineResult<()> {
    let pixels = (size.x.max(0.0) as u32, size.y.max(0.0) as u32);
    load_rectangle_components(entity, texture_name, pixels, Some(color), assets, true)?;
    if let Some(handler) = on_click {
        let button = Button::new(entity).with_handler(handler);
        entity.add_component(button)?;
    }
    if center {
        entity.replace_origin(Origin::new(size * 0.5));
    }
    Ok(())
}

/// Queues a text entity parented to `button`, drawn just in front of it.
pub fn add_button_text(
    scene: &mut Scene,
    button: EntityId,
    font: &str,
    text: &str,
    color: Color,
    assets: &GraphicsAssets,
    alignment: Alignment,
) -> EngineResult<EntityId> {
    let button_depth = scene
        .entity_mut_any(button)
        .ok_or(EngineError::UnknownEntity(button))?
        .renderer()
        .map(|renderer| renderer.base().layer_depth)
        .unwrap_or(0.0);

    let mut label = scene.create_entity();
    load_text_components(&mut label, font, text, color, assets, alignment)?;
    if let Some(renderer) = label.renderer_mut() {
        renderer.base_mut().layer_depth = button_depth + LABEL_LAYER_OFFSET;
    }
    let transform = label.transform();
    let id = scene.add_child_entity(label, button)?;
    transform.set_local_position(Vec2::ZERO);
    Ok(id)
}
