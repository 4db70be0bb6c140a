//! Entities and their component registry.
//!
//! An [`Entity`] owns at most one component per concrete type. Lookup is by
//! exact [`TypeId`]; the shared collider and renderer capabilities are reached
//! through [`Entity::collider`] and [`Entity::renderer`] instead of subtype
//! checks.

use std::any::{TypeId, type_name};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;
use log::debug;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::components::collider::Collider2D;
use crate::components::origin::Origin;
use crate::components::renderer::Renderer;
use crate::components::transform::{Transform, TransformArena};
use crate::core::component::{Component, DrawContext, FrameContext};
use crate::error::{EngineError, EngineResult};
use crate::resources::input::InputManager;
use crate::resources::rendermanager::RenderManager;

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    fn next() -> Self {
        EntityId(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

struct ComponentSlot {
    component: Box<dyn Component>,
    kind: &'static str,
    enabled: bool,
}

fn downcast_ref<C: Component>(component: &dyn Component) -> Option<&C> {
    component.as_any().downcast_ref::<C>()
}

fn downcast_mut<C: Component>(component: &mut dyn Component) -> Option<&mut C> {
    component.as_any_mut().downcast_mut::<C>()
}

/// A bag of components with visibility and enable state.
pub struct Entity {
    id: EntityId,
    arena: TransformArena,
    slots: Vec<ComponentSlot>,
    index: FxHashMap<TypeId, usize>,
    visible: bool,
    enabled: bool,
    intended_visible: bool,
    intended_enabled: bool,
    default_parent: Option<EntityId>,
    initialized: bool,
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("components", &self.component_kinds())
            .field("visible", &self.visible)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Entity {
    /// Creates an empty entity whose transform (once added) lives in `arena`.
    pub fn new(arena: &TransformArena) -> Self {
        Self {
            id: EntityId::next(),
            arena: arena.clone(),
            slots: Vec::new(),
            index: FxHashMap::default(),
            visible: true,
            enabled: true,
            intended_visible: true,
            intended_enabled: true,
            default_parent: None,
            initialized: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn arena(&self) -> &TransformArena {
        &self.arena
    }

    /// Registers `component`, then runs its `initialize` and `attach_events`
    /// hooks. Fails if a component of the same type is already present; the
    /// registered one is kept and `component` is dropped.
    pub fn add_component<C: Component>(&mut self, component: C) -> EngineResult<&mut C> {
        let type_id = TypeId::of::<C>();
        if self.index.contains_key(&type_id) {
            return Err(EngineError::DuplicateComponentKind {
                entity: self.id,
                kind: type_name::<C>(),
            });
        }
        let origin = downcast_ref::<Origin>(&component).map(Origin::value);
        let position = self.register(type_id, type_name::<C>(), Box::new(component));
        if let Some(value) = origin {
            self.broadcast_origin(value, Some(position));
        }
        let slot = &mut self.slots[position];
        downcast_mut::<C>(&mut *slot.component).ok_or(EngineError::UnknownEntity(self.id))
    }

    fn register(
        &mut self,
        type_id: TypeId,
        kind: &'static str,
        mut component: Box<dyn Component>,
    ) -> usize {
        component.initialize(self.id);
        component.attach_events();
        let position = self.slots.len();
        self.slots.push(ComponentSlot {
            component,
            kind,
            enabled: true,
        });
        self.index.insert(type_id, position);
        debug!("{}: added component {kind}", self.id);
        position
    }

    pub fn get_component<C: Component>(&self) -> Option<&C> {
        let position = *self.index.get(&TypeId::of::<C>())?;
        downcast_ref::<C>(&*self.slots[position].component)
    }

    pub fn get_component_mut<C: Component>(&mut self) -> Option<&mut C> {
        let position = *self.index.get(&TypeId::of::<C>())?;
        downcast_mut::<C>(&mut *self.slots[position].component)
    }

    pub fn has_component<C: Component>(&self) -> bool {
        self.get_component::<C>().is_some()
    }

    /// Detaches and removes the component of type `C`, handing it back.
    /// Returns `None` when there is none.
    pub fn remove_component<C: Component>(&mut self) -> Option<C> {
        let type_id = TypeId::of::<C>();
        let position = self.index.remove(&type_id)?;
        let mut slot = self.slots.remove(position);
        slot.component.detach_events();
        self.rebuild_index();
        debug!("{}: removed component {}", self.id, slot.kind);
        if type_id == TypeId::of::<Origin>() {
            self.broadcast_origin(Vec2::ZERO, None);
        }
        let component: Box<dyn Component> = slot.component;
        component.into_any().downcast::<C>().ok().map(|boxed| *boxed)
    }

    /// Detaches and drops every component.
    pub fn remove_all_components(&mut self) {
        for slot in &mut self.slots {
            slot.component.detach_events();
        }
        if !self.slots.is_empty() {
            debug!("{}: removed {} components", self.id, self.slots.len());
        }
        self.slots.clear();
        self.index.clear();
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (position, slot) in self.slots.iter().enumerate() {
            self.index
                .insert((*slot.component).as_any().type_id(), position);
        }
    }

    fn broadcast_origin(&mut self, origin: Vec2, skip: Option<usize>) {
        for (position, slot) in self.slots.iter_mut().enumerate() {
            if Some(position) != skip {
                slot.component.origin_changed(origin);
            }
        }
    }

    /// Replaces the entity's origin (adding one if absent) and tells the
    /// other components about it.
    pub fn replace_origin(&mut self, origin: Origin) {
        let value = origin.value();
        match self.index.get(&TypeId::of::<Origin>()).copied() {
            Some(position) => {
                self.slots[position].component = Box::new(origin);
                self.broadcast_origin(value, Some(position));
            }
            None => {
                let position =
                    self.register(TypeId::of::<Origin>(), type_name::<Origin>(), Box::new(origin));
                self.broadcast_origin(value, Some(position));
            }
        }
    }

    /// Current origin offset, zero when the entity has none.
    pub fn origin_value(&self) -> Vec2 {
        self.get_component::<Origin>()
            .map(Origin::value)
            .unwrap_or(Vec2::ZERO)
    }

    /// The entity's transform handle, adding a fresh root transform if needed.
    pub fn transform(&mut self) -> Transform {
        if let Some(transform) = self.get_component::<Transform>() {
            return transform.clone();
        }
        let transform = Transform::new(&self.arena);
        self.register(
            TypeId::of::<Transform>(),
            type_name::<Transform>(),
            Box::new(transform.clone()),
        );
        transform
    }

    /// Collider capability of whichever collider is registered.
    pub fn collider(&self) -> Option<&Collider2D> {
        self.slots.iter().find_map(|s| s.component.as_collider())
    }

    pub fn renderer(&self) -> Option<&dyn Renderer> {
        self.slots.iter().find_map(|s| s.component.as_renderer())
    }

    pub fn renderer_mut(&mut self) -> Option<&mut dyn Renderer> {
        self.slots
            .iter_mut()
            .find_map(|s| s.component.as_renderer_mut())
    }

    /// Enables or disables the component of type `C`. Returns false if absent.
    pub fn set_component_enabled<C: Component>(&mut self, enabled: bool) -> bool {
        match self.index.get(&TypeId::of::<C>()) {
            Some(&position) => {
                self.slots[position].enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn is_component_enabled<C: Component>(&self) -> bool {
        self.index
            .get(&TypeId::of::<C>())
            .is_some_and(|&position| self.slots[position].enabled)
    }

    /// Type names of the registered components, in registration order.
    pub fn component_kinds(&self) -> Vec<&'static str> {
        self.slots.iter().map(|s| s.kind).collect()
    }

    pub fn component_count(&self) -> usize {
        self.slots.len()
    }

    /// Makes `parent` this entity's transform parent, keeping world values.
    pub fn set_parent(&mut self, parent: Option<&mut Entity>) -> EngineResult<()> {
        let transform = self.transform();
        match parent {
            Some(parent) => {
                if !parent.arena.ptr_eq(&self.arena) {
                    return Err(EngineError::UnknownEntity(parent.id));
                }
                let parent_transform = parent.transform();
                transform.set_parent(Some(&parent_transform))
            }
            None => transform.set_parent(None),
        }
    }

    /// Sets the entity used as fallback parent when this one's parent is
    /// cleared or released.
    pub fn set_default_parent(&mut self, parent: Option<&mut Entity>) -> EngineResult<()> {
        let transform = self.transform();
        match parent {
            Some(parent) => {
                if !parent.arena.ptr_eq(&self.arena) {
                    return Err(EngineError::UnknownEntity(parent.id));
                }
                let parent_transform = parent.transform();
                transform.set_default_parent(Some(&parent_transform));
                self.default_parent = Some(parent.id);
            }
            None => {
                transform.set_default_parent(None);
                self.default_parent = None;
            }
        }
        Ok(())
    }

    pub fn default_parent(&self) -> Option<EntityId> {
        self.default_parent
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn intended_visible(&self) -> bool {
        self.intended_visible
    }

    pub fn intended_enabled(&self) -> bool {
        self.intended_enabled
    }

    /// Sets both the applied and the intended visibility.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.intended_visible = visible;
    }

    /// Sets both the applied and the intended enable state.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.intended_enabled = enabled;
    }

    pub fn is_active(&self) -> bool {
        self.visible && self.enabled
    }

    pub fn set_active(&mut self, active: bool) {
        self.set_visible(active);
        self.set_enabled(active);
    }

    /// Applies scene activation: intended flags when active, hidden and
    /// disabled otherwise. Intended flags are never touched.
    pub(crate) fn apply_scene_activation(&mut self, active: bool) {
        if active {
            self.visible = self.intended_visible;
            self.enabled = self.intended_enabled;
        } else {
            self.visible = false;
            self.enabled = false;
        }
    }

    /// Marks the entity as initialized. Repeated calls do nothing.
    pub fn initialize(&mut self) {
        if !self.initialized {
            self.initialized = true;
            debug!("{} initialized", self.id);
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Runs `update` on every enabled component if the entity is enabled.
    pub fn update(&mut self, delta: f32, input: &mut InputManager) {
        if !self.enabled {
            return;
        }
        let entity = self.id;
        for slot in self.slots.iter_mut().filter(|s| s.enabled) {
            let mut frame = FrameContext {
                delta,
                input: &mut *input,
                entity,
            };
            slot.component.update(&mut frame);
        }
    }

    /// Runs `draw` on every enabled component if the entity is visible.
    pub fn draw(&self, render: &mut RenderManager) {
        if !self.visible {
            return;
        }
        let mut ctx = DrawContext {
            render,
            entity: self.id,
        };
        for slot in self.slots.iter().filter(|s| s.enabled) {
            slot.component.draw(&mut ctx);
        }
    }
}

impl Drop for Entity {
    fn drop(&mut self) {
        self.remove_all_components();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::velocity::Velocity;

    #[derive(Debug, PartialEq)]
    struct Tag(&'static str);
    impl Component for Tag {}

    #[test]
    fn ids_are_unique_and_displayable() {
        let arena = TransformArena::new();
        let a = Entity::new(&arena);
        let b = Entity::new(&arena);
        assert_ne!(a.id(), b.id());
        assert!(a.id().to_string().starts_with("entity#"));
    }

    #[test]
    fn duplicate_kind_is_rejected_and_original_kept() {
        let arena = TransformArena::new();
        let mut e = Entity::new(&arena);
        e.add_component(Tag("first")).unwrap();
        let err = e.add_component(Tag("second")).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateComponentKind { .. }));
        assert_eq!(e.get_component::<Tag>(), Some(&Tag("first")));
        assert_eq!(e.component_count(), 1);
    }

    #[test]
    fn remove_returns_component_and_reindexes() {
        let arena = TransformArena::new();
        let mut e = Entity::new(&arena);
        e.add_component(Tag("a")).unwrap();
        e.add_component(Origin::new(Vec2::ONE)).unwrap();
        assert_eq!(e.remove_component::<Tag>(), Some(Tag("a")));
        assert!(e.remove_component::<Tag>().is_none());
        assert_eq!(e.origin_value(), Vec2::ONE);
    }

    #[test]
    fn transform_is_added_lazily_once() {
        let arena = TransformArena::new();
        let mut e = Entity::new(&arena);
        let t1 = e.transform();
        let t2 = e.transform();
        assert_eq!(t1.id(), t2.id());
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn disabled_component_is_skipped() {
        let arena = TransformArena::new();
        let mut e = Entity::new(&arena);
        let transform = e.transform();
        e.add_component(Velocity::new(&transform, Vec2::new(10.0, 0.0)))
            .unwrap();
        let mut input = InputManager::default();

        e.update(0.5, &mut input);
        assert_eq!(transform.local_position(), Vec2::new(5.0, 0.0));

        assert!(e.set_component_enabled::<Velocity>(false));
        e.update(0.5, &mut input);
        assert_eq!(transform.local_position(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn dropping_entity_releases_transform() {
        let arena = TransformArena::new();
        let mut e = Entity::new(&arena);
        let t = e.transform();
        drop(e);
        assert!(!t.is_alive());
        assert!(arena.is_empty());
    }
}
