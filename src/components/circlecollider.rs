use glam::Vec2;

use crate::components::collider::Collider2D;
use crate::components::transform::Transform;
use crate::core::component::Component;
use crate::core::entity::Entity;
use crate::shapes::{Circle, ColliderShape};

/// Circular collider. A point is inside when its squared distance to the
/// world center is at most the squared radius.
#[derive(Debug, Clone)]
pub struct CircleCollider2D {
    collider: Collider2D,
}

impl CircleCollider2D {
    pub fn new(local: Circle, entity: &mut Entity) -> Self {
        let transform = entity.transform();
        Self::with_transform(local, &transform, entity.origin_value())
    }

    pub fn with_transform(local: Circle, transform: &Transform, origin: Vec2) -> Self {
        Self {
            collider: Collider2D::new(ColliderShape::Circle(local), transform, origin),
        }
    }

    pub fn local_bounds(&self) -> Circle {
        self.collider.local_circle()
    }

    pub fn set_local_bounds(&self, local: Circle) {
        self.collider.set_local_shape(ColliderShape::Circle(local));
    }

    pub fn bounds(&self) -> Circle {
        match self.collider.bounds() {
            ColliderShape::Circle(circle) => circle,
            ColliderShape::Box(rect) => Circle::new(rect.center(), rect.width.min(rect.height) * 0.5),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.bounds().contains(point)
    }

    pub fn collider(&self) -> &Collider2D {
        &self.collider
    }
}

impl Component for CircleCollider2D {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::transform::TransformArena;

    #[test]
    fn center_follows_transform() {
        let arena = TransformArena::new();
        let transform = Transform::new(&arena);
        let collider = CircleCollider2D::with_transform(
            Circle::new(Vec2::new(8.0, 8.0), 8.0),
            &transform,
            Vec2::new(8.0, 8.0),
        );
        assert_eq!(collider.bounds().center, Vec2::ZERO);
        transform.set_local_position(Vec2::new(10.0, -2.0));
        assert!(collider.collider().is_dirty());
        assert_eq!(collider.bounds(), Circle::new(Vec2::new(10.0, -2.0), 8.0));
        assert!(collider.contains(Vec2::new(18.0, -2.0)));
        assert!(!collider.contains(Vec2::new(18.1, -2.0)));
    }
}
