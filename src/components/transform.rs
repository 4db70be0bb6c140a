//! Transform hierarchy.
//!
//! Transforms live in a per-scene [`TransformArena`] and link to their parent
//! and children by [`TransformId`]. A [`Transform`] component is a cheap handle
//! (id + arena) so colliders and renderers can hold their own copy of the
//! owner's transform without borrowing the entity.
//!
//! World values are computed on demand by walking the ancestor chain:
//! - world position = parent world position + local position
//! - world rotation = parent world rotation + local rotation (radians)
//! - world scale = parent world scale * local scale
//!
//! Changing a local position notifies the subscribers of that transform and
//! of every descendant before the setter returns. Listeners are stored as weak
//! references; dropping the last strong handle unsubscribes implicitly.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use glam::Vec2;
use log::{debug, warn};
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::core::component::Component;
use crate::error::{EngineError, EngineResult};

new_key_type! {
    /// Stable identifier of a transform node inside a [`TransformArena`].
    pub struct TransformId;
}

/// Payload-free change callback.
pub type ChangeListener = Rc<dyn Fn()>;

/// Token returned by [`TransformArena::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Which mutations fire change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyPolicy {
    /// Only local-position changes notify.
    #[default]
    PositionOnly,
    /// Position, rotation and scale changes all notify.
    AnyChange,
}

struct Subscriber {
    id: SubscriptionId,
    listener: Weak<dyn Fn()>,
}

struct TransformNode {
    local_position: Vec2,
    local_rotation: f32,
    local_scale: f32,
    parent: Option<TransformId>,
    children: SmallVec<[TransformId; 4]>,
    default_parent: Option<TransformId>,
    subscribers: SmallVec<[Subscriber; 2]>,
}

impl Default for TransformNode {
    fn default() -> Self {
        Self {
            local_position: Vec2::ZERO,
            local_rotation: 0.0,
            local_scale: 1.0,
            parent: None,
            children: SmallVec::new(),
            default_parent: None,
            subscribers: SmallVec::new(),
        }
    }
}

#[derive(Default)]
struct TransformStore {
    nodes: SlotMap<TransformId, TransformNode>,
    next_subscription: u64,
    policy: NotifyPolicy,
}

impl TransformStore {
    fn node(&self, id: TransformId) -> EngineResult<&TransformNode> {
        self.nodes.get(id).ok_or(EngineError::StaleTransform(id))
    }

    fn node_mut(&mut self, id: TransformId) -> EngineResult<&mut TransformNode> {
        self.nodes.get_mut(id).ok_or(EngineError::StaleTransform(id))
    }

    fn world_position(&self, id: TransformId) -> Vec2 {
        let mut acc = Vec2::ZERO;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.nodes.get(c)) {
            acc += node.local_position;
            current = node.parent;
        }
        acc
    }

    fn world_rotation(&self, id: TransformId) -> f32 {
        let mut acc = 0.0;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.nodes.get(c)) {
            acc += node.local_rotation;
            current = node.parent;
        }
        acc
    }

    fn world_scale(&self, id: TransformId) -> f32 {
        let mut acc = 1.0;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.nodes.get(c)) {
            acc *= node.local_scale;
            current = node.parent;
        }
        acc
    }

    /// True when `candidate` is `ancestor` itself or lies below it.
    fn is_self_or_descendant(&self, candidate: TransformId, ancestor: TransformId) -> bool {
        let mut current = Some(candidate);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.nodes.get(c).and_then(|n| n.parent);
        }
        false
    }

    /// Parent to use when a node is detached: its default parent if that is
    /// still alive and would not create a cycle.
    fn fallback_parent(&self, id: TransformId) -> Option<TransformId> {
        self.nodes
            .get(id)
            .and_then(|n| n.default_parent)
            .filter(|dp| self.nodes.contains_key(*dp) && !self.is_self_or_descendant(*dp, id))
    }

    /// Moves `id` under `target`, rewriting its locals so world values stay put.
    fn reattach(&mut self, id: TransformId, target: Option<TransformId>) {
        let world_position = self.world_position(id);
        let world_rotation = self.world_rotation(id);
        let world_scale = self.world_scale(id);

        let old_parent = self.nodes.get(id).and_then(|n| n.parent);
        if let Some(parent) = old_parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|c| *c != id);
        }

        let (parent_position, parent_rotation, parent_scale) = match target {
            Some(t) => (
                self.world_position(t),
                self.world_rotation(t),
                self.world_scale(t),
            ),
            None => (Vec2::ZERO, 0.0, 1.0),
        };
        let local_scale = if parent_scale == 0.0 {
            warn!("parent world scale is zero; keeping world scale {world_scale} as local scale");
            world_scale
        } else {
            world_scale / parent_scale
        };

        if let Some(parent) = target.and_then(|t| self.nodes.get_mut(t)) {
            parent.children.push(id);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = target;
            node.local_position = world_position - parent_position;
            node.local_rotation = world_rotation - parent_rotation;
            node.local_scale = local_scale;
        }
    }

    /// Upgrades the live listeners of `id` and all its descendants, pruning
    /// dead ones along the way.
    fn collect_listeners(&mut self, id: TransformId) -> Vec<ChangeListener> {
        let mut listeners = Vec::new();
        let mut stack: SmallVec<[TransformId; 8]> = SmallVec::new();
        stack.push(id);
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get_mut(current) else {
                continue;
            };
            node.subscribers.retain(|s| match s.listener.upgrade() {
                Some(listener) => {
                    listeners.push(listener);
                    true
                }
                None => false,
            });
            stack.extend(node.children.iter().copied());
        }
        listeners
    }
}

/// Shared storage for every transform of one scene.
///
/// Cloning the arena clones the handle, not the nodes.
#[derive(Clone, Default)]
pub struct TransformArena {
    store: Rc<RefCell<TransformStore>>,
}

impl fmt::Debug for TransformArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformArena")
            .field("len", &self.len())
            .field("policy", &self.policy())
            .finish()
    }
}

impl TransformArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: NotifyPolicy) -> Self {
        let arena = Self::new();
        arena.set_policy(policy);
        arena
    }

    pub fn policy(&self) -> NotifyPolicy {
        self.store.borrow().policy
    }

    pub fn set_policy(&self, policy: NotifyPolicy) {
        self.store.borrow_mut().policy = policy;
    }

    /// Both handles point at the same storage.
    pub fn ptr_eq(&self, other: &TransformArena) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }

    /// Allocates a root node with identity values.
    pub fn create(&self) -> TransformId {
        self.store.borrow_mut().nodes.insert(TransformNode::default())
    }

    pub fn contains(&self, id: TransformId) -> bool {
        self.store.borrow().nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.store.borrow().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn local_position(&self, id: TransformId) -> EngineResult<Vec2> {
        Ok(self.store.borrow().node(id)?.local_position)
    }

    pub fn local_rotation(&self, id: TransformId) -> EngineResult<f32> {
        Ok(self.store.borrow().node(id)?.local_rotation)
    }

    pub fn local_scale(&self, id: TransformId) -> EngineResult<f32> {
        Ok(self.store.borrow().node(id)?.local_scale)
    }

    pub fn world_position(&self, id: TransformId) -> EngineResult<Vec2> {
        let store = self.store.borrow();
        store.node(id)?;
        Ok(store.world_position(id))
    }

    pub fn world_rotation(&self, id: TransformId) -> EngineResult<f32> {
        let store = self.store.borrow();
        store.node(id)?;
        Ok(store.world_rotation(id))
    }

    pub fn world_scale(&self, id: TransformId) -> EngineResult<f32> {
        let store = self.store.borrow();
        store.node(id)?;
        Ok(store.world_scale(id))
    }

    /// Sets the local position and, if it changed, notifies this node's
    /// subscribers and those of every descendant.
    pub fn set_local_position(&self, id: TransformId, position: Vec2) -> EngineResult<()> {
        let listeners = {
            let mut store = self.store.borrow_mut();
            let node = store.node_mut(id)?;
            if node.local_position == position {
                return Ok(());
            }
            node.local_position = position;
            store.collect_listeners(id)
        };
        Self::notify(listeners);
        Ok(())
    }

    pub fn set_local_rotation(&self, id: TransformId, rotation: f32) -> EngineResult<()> {
        let listeners = {
            let mut store = self.store.borrow_mut();
            let node = store.node_mut(id)?;
            if node.local_rotation == rotation {
                return Ok(());
            }
            node.local_rotation = rotation;
            match store.policy {
                NotifyPolicy::AnyChange => store.collect_listeners(id),
                NotifyPolicy::PositionOnly => Vec::new(),
            }
        };
        Self::notify(listeners);
        Ok(())
    }

    pub fn set_local_scale(&self, id: TransformId, scale: f32) -> EngineResult<()> {
        let listeners = {
            let mut store = self.store.borrow_mut();
            let node = store.node_mut(id)?;
            if node.local_scale == scale {
                return Ok(());
            }
            node.local_scale = scale;
            match store.policy {
                NotifyPolicy::AnyChange => store.collect_listeners(id),
                NotifyPolicy::PositionOnly => Vec::new(),
            }
        };
        Self::notify(listeners);
        Ok(())
    }

    /// Sets the local position so the world position becomes `position`.
    pub fn set_world_position(&self, id: TransformId, position: Vec2) -> EngineResult<()> {
        let parent_position = {
            let store = self.store.borrow();
            match store.node(id)?.parent {
                Some(parent) => store.world_position(parent),
                None => Vec2::ZERO,
            }
        };
        self.set_local_position(id, position - parent_position)
    }

    pub fn set_world_rotation(&self, id: TransformId, rotation: f32) -> EngineResult<()> {
        let parent_rotation = {
            let store = self.store.borrow();
            match store.node(id)?.parent {
                Some(parent) => store.world_rotation(parent),
                None => 0.0,
            }
        };
        self.set_local_rotation(id, rotation - parent_rotation)
    }

    pub fn set_world_scale(&self, id: TransformId, scale: f32) -> EngineResult<()> {
        let parent_scale = {
            let store = self.store.borrow();
            match store.node(id)?.parent {
                Some(parent) => store.world_scale(parent),
                None => 1.0,
            }
        };
        let local = if parent_scale == 0.0 {
            warn!("parent world scale is zero; storing requested world scale {scale} as local");
            scale
        } else {
            scale / parent_scale
        };
        self.set_local_scale(id, local)
    }

    pub fn parent(&self, id: TransformId) -> EngineResult<Option<TransformId>> {
        Ok(self.store.borrow().node(id)?.parent)
    }

    pub fn children(&self, id: TransformId) -> EngineResult<Vec<TransformId>> {
        Ok(self.store.borrow().node(id)?.children.to_vec())
    }

    pub fn default_parent(&self, id: TransformId) -> EngineResult<Option<TransformId>> {
        Ok(self.store.borrow().node(id)?.default_parent)
    }

    /// Records the parent used when this node's parent is cleared or released.
    pub fn set_default_parent(
        &self,
        id: TransformId,
        default_parent: Option<TransformId>,
    ) -> EngineResult<()> {
        self.store.borrow_mut().node_mut(id)?.default_parent = default_parent;
        Ok(())
    }

    /// Re-parents `id`, keeping its world position, rotation and scale.
    ///
    /// `None` detaches it; the node then falls back to its default parent when
    /// that one is alive and not a descendant, otherwise it becomes a root.
    /// Assigning the node itself or one of its descendants fails with
    /// [`EngineError::ParentCycle`] and leaves the hierarchy untouched.
    pub fn set_parent(&self, id: TransformId, parent: Option<TransformId>) -> EngineResult<()> {
        let mut store = self.store.borrow_mut();
        let current = store.node(id)?.parent;
        let target = match parent {
            Some(p) => {
                store.node(p)?;
                if store.is_self_or_descendant(p, id) {
                    return Err(EngineError::ParentCycle);
                }
                Some(p)
            }
            None => store.fallback_parent(id),
        };
        if current == target {
            return Ok(());
        }
        store.reattach(id, target);
        Ok(())
    }

    /// Registers a weak reference to `listener` on `id`.
    pub fn subscribe(
        &self,
        id: TransformId,
        listener: &ChangeListener,
    ) -> EngineResult<SubscriptionId> {
        let mut store = self.store.borrow_mut();
        let sub = SubscriptionId(store.next_subscription);
        store.next_subscription += 1;
        store.node_mut(id)?.subscribers.push(Subscriber {
            id: sub,
            listener: Rc::downgrade(listener),
        });
        Ok(sub)
    }

    /// Removes a subscription. Returns false when the node or the
    /// subscription is gone, or when the arena is busy.
    pub fn unsubscribe(&self, id: TransformId, subscription: SubscriptionId) -> bool {
        let Ok(mut store) = self.store.try_borrow_mut() else {
            return false;
        };
        let Some(node) = store.nodes.get_mut(id) else {
            return false;
        };
        let before = node.subscribers.len();
        node.subscribers.retain(|s| s.id != subscription);
        node.subscribers.len() != before
    }

    /// Number of subscribers whose listener is still alive.
    pub fn live_subscriber_count(&self, id: TransformId) -> usize {
        self.store
            .borrow()
            .nodes
            .get(id)
            .map(|n| {
                n.subscribers
                    .iter()
                    .filter(|s| s.listener.strong_count() > 0)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Removes `id` from the arena.
    ///
    /// Each child is re-parented to its default parent (or to root) with its
    /// world values preserved before the node is dropped.
    pub fn release(&self, id: TransformId) -> EngineResult<()> {
        let mut store = self.store.borrow_mut();
        let children = store.node(id)?.children.clone();
        for child in children {
            if let Some(node) = store.nodes.get_mut(child) {
                if node.default_parent == Some(id) {
                    node.default_parent = None;
                }
            }
            // Detach first so the fallback walk never sees the dying node.
            let target = store.fallback_parent(child).filter(|t| *t != id);
            store.reattach(child, target);
        }
        let parent = store.node(id)?.parent;
        if let Some(parent) = parent.and_then(|p| store.nodes.get_mut(p)) {
            parent.children.retain(|c| *c != id);
        }
        store.nodes.remove(id);
        debug!("released transform {id:?}");
        Ok(())
    }

    fn notify(listeners: Vec<ChangeListener>) {
        for listener in listeners {
            listener();
        }
    }
}

/// Transform component: a handle onto a node of the scene's arena.
///
/// Reads on a released handle return identity values; writes are ignored
/// with a warning.
#[derive(Clone)]
pub struct Transform {
    id: TransformId,
    arena: TransformArena,
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("id", &self.id)
            .field("local_position", &self.local_position())
            .field("world_position", &self.world_position())
            .finish()
    }
}

impl Transform {
    /// Allocates a new root transform in `arena`.
    pub fn new(arena: &TransformArena) -> Self {
        Self {
            id: arena.create(),
            arena: arena.clone(),
        }
    }

    /// Wraps an existing node.
    pub fn from_id(arena: &TransformArena, id: TransformId) -> Self {
        Self {
            id,
            arena: arena.clone(),
        }
    }

    pub fn id(&self) -> TransformId {
        self.id
    }

    pub fn arena(&self) -> &TransformArena {
        &self.arena
    }

    pub fn is_alive(&self) -> bool {
        self.arena.contains(self.id)
    }

    pub fn local_position(&self) -> Vec2 {
        self.arena.local_position(self.id).unwrap_or(Vec2::ZERO)
    }

    pub fn local_rotation(&self) -> f32 {
        self.arena.local_rotation(self.id).unwrap_or(0.0)
    }

    pub fn local_scale(&self) -> f32 {
        self.arena.local_scale(self.id).unwrap_or(1.0)
    }

    pub fn world_position(&self) -> Vec2 {
        self.arena.world_position(self.id).unwrap_or(Vec2::ZERO)
    }

    pub fn world_rotation(&self) -> f32 {
        self.arena.world_rotation(self.id).unwrap_or(0.0)
    }

    pub fn world_scale(&self) -> f32 {
        self.arena.world_scale(self.id).unwrap_or(1.0)
    }

    pub fn set_local_position(&self, position: Vec2) {
        self.warn_on_err(self.arena.set_local_position(self.id, position));
    }

    pub fn set_local_rotation(&self, radians: f32) {
        self.warn_on_err(self.arena.set_local_rotation(self.id, radians));
    }

    pub fn set_local_scale(&self, scale: f32) {
        self.warn_on_err(self.arena.set_local_scale(self.id, scale));
    }

    pub fn set_world_position(&self, position: Vec2) {
        self.warn_on_err(self.arena.set_world_position(self.id, position));
    }

    pub fn set_world_rotation(&self, radians: f32) {
        self.warn_on_err(self.arena.set_world_rotation(self.id, radians));
    }

    pub fn set_world_scale(&self, scale: f32) {
        self.warn_on_err(self.arena.set_world_scale(self.id, scale));
    }

    /// Adds `delta` to the local position.
    pub fn translate(&self, delta: Vec2) {
        if delta != Vec2::ZERO {
            self.set_local_position(self.local_position() + delta);
        }
    }

    pub fn parent(&self) -> Option<TransformId> {
        self.arena.parent(self.id).ok().flatten()
    }

    pub fn children(&self) -> Vec<TransformId> {
        self.arena.children(self.id).unwrap_or_default()
    }

    /// See [`TransformArena::set_parent`].
    pub fn set_parent(&self, parent: Option<&Transform>) -> EngineResult<()> {
        self.arena.set_parent(self.id, parent.map(Transform::id))
    }

    pub fn set_default_parent(&self, parent: Option<&Transform>) {
        self.warn_on_err(
            self.arena
                .set_default_parent(self.id, parent.map(Transform::id)),
        );
    }

    pub fn subscribe(&self, listener: &ChangeListener) -> Option<SubscriptionId> {
        match self.arena.subscribe(self.id, listener) {
            Ok(sub) => Some(sub),
            Err(err) => {
                warn!("cannot subscribe: {err}");
                None
            }
        }
    }

    pub fn unsubscribe(&self, subscription: SubscriptionId) -> bool {
        self.arena.unsubscribe(self.id, subscription)
    }

    /// Drops the node from the arena. Further calls are no-ops.
    pub fn release(&self) {
        if self.is_alive() {
            self.warn_on_err(self.arena.release(self.id));
        }
    }

    fn warn_on_err(&self, result: EngineResult<()>) {
        if let Err(err) = result {
            warn!("ignoring write on transform {:?}: {err}", self.id);
        }
    }
}

impl Component for Transform {
    /// Removing the transform from its entity releases the node; children
    /// fall back to their default parents.
    fn detach_events(&mut self) {
        self.release();
    }
}
