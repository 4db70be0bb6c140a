//! Shared collider capability with a lazily recomputed world-bounds cache.
//!
//! A [`Collider2D`] keeps its shape in entity-local space and caches the world
//! shape. The cache is rebuilt on the first read after it was invalidated,
//! which happens when the owner's transform moves (through a change
//! subscription), when the local shape changes or when the origin changes.
//!
//! The collider is a cheap `Rc` handle so a button, a sprite-sheet helper or
//! the collision service can hold one without borrowing the entity.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;

use crate::components::transform::{ChangeListener, SubscriptionId, Transform};
use crate::shapes::{Circle, ColliderShape, Rect};

static NEXT_COLLIDER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderId(u64);

struct ColliderCore {
    id: ColliderId,
    transform: Transform,
    origin: Cell<Vec2>,
    local: Cell<ColliderShape>,
    cache: Cell<ColliderShape>,
    dirty: Rc<Cell<bool>>,
    recomputes: Cell<u64>,
    listener: ChangeListener,
    subscription: Cell<Option<SubscriptionId>>,
}

impl Drop for ColliderCore {
    fn drop(&mut self) {
        if let Some(sub) = self.subscription.take() {
            self.transform.unsubscribe(sub);
        }
    }
}

#[derive(Clone)]
pub struct Collider2D {
    core: Rc<ColliderCore>,
}

impl fmt::Debug for Collider2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collider2D")
            .field("id", &self.core.id)
            .field("local", &self.core.local.get())
            .field("dirty", &self.core.dirty.get())
            .finish()
    }
}

impl Collider2D {
    /// Creates a collider following `transform` and subscribes to its changes.
    /// The cache starts dirty.
    pub fn new(local: ColliderShape, transform: &Transform, origin: Vec2) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let flag = dirty.clone();
        let listener: ChangeListener = Rc::new(move || flag.set(true));
        let collider = Self {
            core: Rc::new(ColliderCore {
                id: ColliderId(NEXT_COLLIDER_ID.fetch_add(1, Ordering::Relaxed)),
                transform: transform.clone(),
                origin: Cell::new(origin),
                local: Cell::new(local),
                cache: Cell::new(local),
                dirty,
                recomputes: Cell::new(0),
                listener,
                subscription: Cell::new(None),
            }),
        };
        collider.attach();
        collider
    }

    pub fn id(&self) -> ColliderId {
        self.core.id
    }

    pub fn transform(&self) -> &Transform {
        &self.core.transform
    }

    pub fn local_shape(&self) -> ColliderShape {
        self.core.local.get()
    }

    /// Replaces the local shape. Only marks the cache dirty.
    pub fn set_local_shape(&self, shape: ColliderShape) {
        self.core.local.set(shape);
        self.core.dirty.set(true);
    }

    pub fn origin(&self) -> Vec2 {
        self.core.origin.get()
    }

    pub fn set_origin(&self, origin: Vec2) {
        if self.core.origin.get() != origin {
            self.core.origin.set(origin);
            self.core.dirty.set(true);
        }
    }

    /// World bounds, recomputed first if the cache is dirty.
    pub fn bounds(&self) -> ColliderShape {
        let core = &self.core;
        if core.dirty.get() {
            let offset = core.transform.world_position() - core.origin.get();
            core.cache.set(core.local.get().translated(offset));
            core.dirty.set(false);
            core.recomputes.set(core.recomputes.get() + 1);
        }
        core.cache.get()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.bounds().contains(point)
    }

    pub fn is_dirty(&self) -> bool {
        self.core.dirty.get()
    }

    /// How many times the cache has been rebuilt.
    pub fn recompute_count(&self) -> u64 {
        self.core.recomputes.get()
    }

    pub fn is_subscribed(&self) -> bool {
        self.core.subscription.get().is_some()
    }

    /// Subscribes to the transform. Does nothing if already subscribed.
    pub fn attach(&self) {
        if self.is_subscribed() {
            return;
        }
        let sub = self.core.transform.subscribe(&self.core.listener);
        self.core.subscription.set(sub);
        // Moves made while detached were missed.
        self.core.dirty.set(true);
    }

    /// Unsubscribes from the transform. Does nothing if not subscribed.
    pub fn detach(&self) {
        if let Some(sub) = self.core.subscription.take() {
            self.core.transform.unsubscribe(sub);
        }
    }

    pub fn ptr_eq(&self, other: &Collider2D) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }

    pub(crate) fn local_rect(&self) -> Rect {
        match self.local_shape() {
            ColliderShape::Box(rect) => rect,
            ColliderShape::Circle(circle) => circle.bounding_rect(),
        }
    }

    pub(crate) fn local_circle(&self) -> Circle {
        match self.local_shape() {
            ColliderShape::Circle(circle) => circle,
            ColliderShape::Box(rect) => Circle::new(rect.center(), rect.width.min(rect.height) * 0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::transform::TransformArena;

    fn boxed(transform: &Transform) -> Collider2D {
        Collider2D::new(
            ColliderShape::Box(Rect::new(0.0, 0.0, 10.0, 10.0)),
            transform,
            Vec2::ZERO,
        )
    }

    #[test]
    fn starts_dirty_and_clears_after_read() {
        let arena = TransformArena::new();
        let t = Transform::new(&arena);
        let c = boxed(&t);
        assert!(c.is_dirty());
        c.bounds();
        assert!(!c.is_dirty());
        assert_eq!(c.recompute_count(), 1);
    }

    #[test]
    fn repeated_reads_recompute_once() {
        let arena = TransformArena::new();
        let t = Transform::new(&arena);
        let c = boxed(&t);
        for _ in 0..5 {
            c.bounds();
        }
        assert_eq!(c.recompute_count(), 1);
        t.set_local_position(Vec2::new(1.0, 1.0));
        let other = c.clone();
        c.bounds();
        other.bounds();
        assert_eq!(c.recompute_count(), 2);
    }

    #[test]
    fn origin_is_subtracted() {
        let arena = TransformArena::new();
        let t = Transform::new(&arena);
        t.set_local_position(Vec2::new(100.0, 50.0));
        let c = Collider2D::new(
            ColliderShape::Box(Rect::new(0.0, 0.0, 10.0, 10.0)),
            &t,
            Vec2::new(5.0, 5.0),
        );
        assert_eq!(
            c.bounds(),
            ColliderShape::Box(Rect::new(95.0, 45.0, 10.0, 10.0))
        );
    }

    #[test]
    fn detach_is_idempotent_and_stops_invalidation() {
        let arena = TransformArena::new();
        let t = Transform::new(&arena);
        let c = boxed(&t);
        c.bounds();
        c.detach();
        c.detach();
        assert_eq!(arena.live_subscriber_count(t.id()), 0);
        t.set_local_position(Vec2::ONE);
        assert!(!c.is_dirty());

        c.attach();
        c.attach();
        assert_eq!(arena.live_subscriber_count(t.id()), 1);
        assert!(c.is_dirty());
    }

    #[test]
    fn dropping_last_handle_unsubscribes() {
        let arena = TransformArena::new();
        let t = Transform::new(&arena);
        let c = boxed(&t);
        let clone = c.clone();
        drop(c);
        assert_eq!(arena.live_subscriber_count(t.id()), 1);
        drop(clone);
        assert_eq!(arena.live_subscriber_count(t.id()), 0);
    }
}
