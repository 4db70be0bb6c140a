use glam::Vec2;

use crate::components::collider::Collider2D;
use crate::components::transform::Transform;
use crate::core::component::Component;
use crate::core::entity::Entity;
use crate::shapes::{ColliderShape, Rect};

/// Axis-aligned rectangular collider.
///
/// World bounds are the local rectangle moved by the owner's world position
/// minus its origin. Containment is half-open on the right and bottom edges.
#[derive(Debug, Clone)]
pub struct BoxCollider2D {
    collider: Collider2D,
}

impl BoxCollider2D {
    /// Creates a collider bound to `entity`'s transform (added if missing)
    /// and current origin.
    pub fn new(local: Rect, entity: &mut Entity) -> Self {
        let transform = entity.transform();
        Self::with_transform(local, &transform, entity.origin_value())
    }

    pub fn with_transform(local: Rect, transform: &Transform, origin: Vec2) -> Self {
        Self {
            collider: Collider2D::new(ColliderShape::Box(local), transform, origin),
        }
    }

    pub fn local_bounds(&self) -> Rect {
        self.collider.local_rect()
    }

    /// Marks the cache dirty; the new bounds are computed on the next read.
    pub fn set_local_bounds(&self, local: Rect) {
        self.collider.set_local_shape(ColliderShape::Box(local));
    }

    pub fn bounds(&self) -> Rect {
        self.collider.bounds().bounding_rect()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.bounds().contains(point)
    }

    pub fn collider(&self) -> &Collider2D {
        &self.collider
    }
}

impl Component for BoxCollider2D {
    fn attach_events(&mut self) {
        self.collider.attach();
    }

    fn detach_events(&mut self) {
        self.collider.detach();
    }

    fn origin_changed(&mut self, origin: Vec2) {
        self.collider.set_origin(origin);
    }

    fn as_collider(&self) -> Option<&Collider2D> {
        Some(&self.collider)
    }
}
