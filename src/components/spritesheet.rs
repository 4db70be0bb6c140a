//! Grid addressing over a sprite texture.

use crate::components::spriterenderer::SpriteRenderer;
use crate::core::component::Component;
use crate::core::entity::Entity;
use crate::error::{EngineError, EngineResult};
use crate::shapes::Rect;

/// A fixed grid of equally sized cells over the texture of an entity's
/// [`SpriteRenderer`]. Cells are numbered row-major from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    texture_width: u32,
    texture_height: u32,
    cell_width: u32,
    cell_height: u32,
    index: usize,
    source: Rect,
}

impl SpriteSheet {
    /// Fails with `MissingRequiredComponent` when `entity` has no sprite renderer.
    /// A zero cell dimension is treated as the full texture dimension.
    pub fn new(entity: &Entity, cell_size: (u32, u32)) -> EngineResult<Self> {
        let renderer = entity.get_component::<SpriteRenderer>().ok_or(
            EngineError::MissingRequiredComponent {
                component: "SpriteSheet",
                required: "SpriteRenderer",
            },
        )?;
        let texture_width = renderer.texture_width();
        let texture_height = renderer.texture_height();
        let cell_width = if cell_size.0 == 0 { texture_width } else { cell_size.0 };
        let cell_height = if cell_size.1 == 0 { texture_height } else { cell_size.1 };
        let mut sheet = Self {
            texture_width,
            texture_height,
            cell_width,
            cell_height,
            index: 0,
            source: Rect::ZERO,
        };
        sheet.update_source();
        Ok(sheet)
    }

    pub fn columns(&self) -> usize {
        if self.cell_width == 0 {
            0
        } else {
            (self.texture_width / self.cell_width) as usize
        }
    }

    pub fn rows(&self) -> usize {
        if self.cell_height == 0 {
            0
        } else {
            (self.texture_height / self.cell_height) as usize
        }
    }

    pub fn frame_count(&self) -> usize {
        self.columns() * self.rows()
    }

    pub fn cell_size(&self) -> (u32, u32) {
        (self.cell_width, self.cell_height)
    }

    pub fn grid_index(&self) -> usize {
        self.index
    }

    /// Selects a cell. Out-of-range indices are rejected before anything changes.
    pub fn set_grid_index(&mut self, index: usize) -> EngineResult<()> {
        let len = self.frame_count();
        if index >= len {
            return Err(EngineError::IndexOutOfRange { index, len });
        }
        self.index = index;
        self.update_source();
        Ok(())
    }

    /// Source rectangle of the current cell.
    pub fn source_rect(&self) -> Rect {
        self.source
    }

    fn update_source(&mut self) {
        let columns = self.columns().max(1);
        let column = self.index % columns;
        let row = self.index / columns;
        self.source = Rect::new(
            (column as u32 * self.cell_width) as f32,
            (row as u32 * self.cell_height) as f32,
            self.cell_width as f32,
            self.cell_height as f32,
        );
    }
}

impl Component for SpriteSheet {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::transform::TransformArena;
    use crate::resources::graphicsassets::GraphicsAssets;

    fn sprite_entity(arena: &TransformArena, width: u32, height: u32) -> Entity {
        let mut assets = GraphicsAssets::new();
        assets.register_sprite("sheet", width, height);
        let mut entity = Entity::new(arena);
        let renderer = SpriteRenderer::new("sheet", &assets, &mut entity).unwrap();
        entity.add_component(renderer).unwrap();
        entity
    }

    #[test]
    fn requires_sprite_renderer() {
        let arena = TransformArena::new();
        let entity = Entity::new(&arena);
        assert!(matches!(
            SpriteSheet::new(&entity, (16, 16)),
            Err(EngineError::MissingRequiredComponent { required: "SpriteRenderer", .. })
        ));
    }

    #[test]
    fn grid_dimensions_and_source_rect() {
        let arena = TransformArena::new();
        let entity = sprite_entity(&arena, 64, 32);
        let mut sheet = SpriteSheet::new(&entity, (16, 16)).unwrap();
        assert_eq!((sheet.columns(), sheet.rows()), (4, 2));
        assert_eq!(sheet.source_rect(), Rect::new(0.0, 0.0, 16.0, 16.0));
        sheet.set_grid_index(5).unwrap();
        assert_eq!(sheet.source_rect(), Rect::new(16.0, 16.0, 16.0, 16.0));
    }

    #[test]
    fn out_of_range_index_is_rejected_without_change() {
        let arena = TransformArena::new();
        let entity = sprite_entity(&arena, 64, 32);
        let mut sheet = SpriteSheet::new(&entity, (16, 16)).unwrap();
        sheet.set_grid_index(3).unwrap();
        assert_eq!(
            sheet.set_grid_index(8),
            Err(EngineError::IndexOutOfRange { index: 8, len: 8 })
        );
        assert_eq!(sheet.grid_index(), 3);
        assert_eq!(sheet.source_rect(), Rect::new(48.0, 0.0, 16.0, 16.0));
    }

    #[test]
    fn zero_cell_means_whole_texture() {
        let arena = TransformArena::new();
        let entity = sprite_entity(&arena, 40, 20);
        let sheet = SpriteSheet::new(&entity, (0, 0)).unwrap();
        assert_eq!(sheet.frame_count(), 1);
        assert_eq!(sheet.source_rect(), Rect::new(0.0, 0.0, 40.0, 20.0));
    }
}
