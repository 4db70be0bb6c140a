//! Collision event type.
//!
//! [`detect_collisions`](crate::systems::collision::detect_collisions) emits
//! one [`CollisionEvent`] per overlapping pair of colliders. Game code reacts
//! to the list however it likes (damage, sound, removal, etc.).

use serde::Serialize;

use crate::core::entity::EntityId;

/// Two entities whose colliders overlap.
///
/// `a` precedes `b` in the scene's entity order. Additional details
/// (penetration, side) are available from the collision service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CollisionEvent {
    pub a: EntityId,
    pub b: EntityId,
}

impl CollisionEvent {
    /// Whether `entity` takes part in this collision.
    pub fn involves(&self, entity: EntityId) -> bool {
        self.a == entity || self.b == entity
    }

    /// The participant that is not `entity`.
    pub fn other(&self, entity: EntityId) -> Option<EntityId> {
        if self.a == entity {
            Some(self.b)
        } else if self.b == entity {
            Some(self.a)
        } else {
            None
        }
    }
}
