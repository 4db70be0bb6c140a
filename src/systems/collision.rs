//! Collision queries over collider world bounds.
//!
//! All functions read bounds only; they never move anything. Box-box overlap
//! is strict (shared edges do not collide), circle-circle and box-circle
//! tests are inclusive at the touching distance.

use glam::Vec2;
use log::trace;

use crate::components::boxcollider::BoxCollider2D;
use crate::components::circlecollider::CircleCollider2D;
use crate::components::collider::Collider2D;
use crate::core::scene::Scene;
use crate::events::collision::CollisionEvent;
use crate::shapes::{Circle, ColliderShape, Rect};

/// Side of a box-circle contact, as seen from the circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionSide {
    Top,
    Bottom,
    Left,
    Right,
    None,
}

pub fn circle_box_intersects(circle: &Circle, rect: &Rect) -> bool {
    let closest = rect.clamp_point(circle.center);
    circle.center.distance_squared(closest) <= circle.radius * circle.radius
}

/// Overlap test between two world-space shapes.
pub fn shape_overlap(a: &ColliderShape, b: &ColliderShape) -> bool {
    match (a, b) {
        (ColliderShape::Box(a), ColliderShape::Box(b)) => a.intersects(b),
        (ColliderShape::Circle(a), ColliderShape::Circle(b)) => a.intersects(b),
        (ColliderShape::Box(rect), ColliderShape::Circle(circle))
        | (ColliderShape::Circle(circle), ColliderShape::Box(rect)) => {
            circle_box_intersects(circle, rect)
        }
    }
}

/// Whether two colliders' current world bounds overlap.
pub fn shapes_intersect(a: &Collider2D, b: &Collider2D) -> bool {
    shape_overlap(&a.bounds(), &b.bounds())
}

/// Overlapping rectangle of two box colliders, `None` when they do not
/// intersect.
pub fn intersection_depth(a: &BoxCollider2D, b: &BoxCollider2D) -> Option<Rect> {
    a.bounds().intersection(&b.bounds())
}

/// Which side of the circle touches the box.
///
/// The direction from the closest box point to the circle center decides:
/// the dominant axis wins and ties go to the vertical axis. A center inside
/// the box is resolved against the nearest box edge.
pub fn collision_side(rect_collider: &BoxCollider2D, circle_collider: &CircleCollider2D) -> CollisionSide {
    let rect = rect_collider.bounds();
    let circle = circle_collider.bounds();
    if !circle_box_intersects(&circle, &rect) {
        return CollisionSide::None;
    }
    let closest = rect.clamp_point(circle.center);
    let direction = circle.center - closest;
    if direction == Vec2::ZERO {
        return side_from_inside(&rect, circle.center);
    }
    if direction.x.abs() > direction.y.abs() {
        if direction.x > 0.0 {
            CollisionSide::Left
        } else {
            CollisionSide::Right
        }
    } else if direction.y > 0.0 {
        CollisionSide::Top
    } else {
        CollisionSide::Bottom
    }
}

fn side_from_inside(rect: &Rect, center: Vec2) -> CollisionSide {
    let candidates = [
        (center.x - rect.left(), CollisionSide::Right),
        (rect.right() - center.x, CollisionSide::Left),
        (center.y - rect.top(), CollisionSide::Bottom),
        (rect.bottom() - center.y, CollisionSide::Top),
    ];
    candidates
        .into_iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, side)| side)
        .unwrap_or(CollisionSide::None)
}

/// Every overlapping pair of active colliders in `scene`, each pair once.
/// Disabled entities are skipped.
pub fn detect_collisions(scene: &Scene) -> Vec<CollisionEvent> {
    let colliders: Vec<_> = scene
        .entities()
        .iter()
        .filter(|e| e.is_enabled())
        .filter_map(|e| e.collider().map(|c| (e.id(), c.bounds())))
        .collect();

    let mut events = Vec::new();
    for (i, (a, bounds_a)) in colliders.iter().enumerate() {
        for (b, bounds_b) in &colliders[i + 1..] {
            if shape_overlap(bounds_a, bounds_b) {
                trace!("collision between {a} and {b}");
                events.push(CollisionEvent { a: *a, b: *b });
            }
        }
    }
    events
}
