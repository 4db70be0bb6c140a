use glam::Vec2;

use crate::core::component::Component;

/// Anchor offset of an entity.
///
/// Immutable: change it with [`Entity::replace_origin`] so every other
/// component on the entity hears about it.
///
/// [`Entity::replace_origin`]: crate::core::entity::Entity::replace_origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Origin(Vec2);

impl Origin {
    pub fn new(value: Vec2) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Vec2 {
        self.0
    }
}

impl Component for Origin {}
