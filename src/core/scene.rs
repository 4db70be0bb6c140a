//! Scenes: entity collections for one game state.
//!
//! Additions, insertions and removals are queued and only take effect when
//! [`Scene::process_entity_changes`] runs at the start of the next
//! [`Scene::update`], so the entity list never changes while it is iterated.

use std::fmt;

use log::{debug, warn};

use crate::components::collider::ColliderId;
use crate::components::transform::{NotifyPolicy, TransformArena};
use crate::core::entity::{Entity, EntityId};
use crate::error::{EngineError, EngineResult};
use crate::resources::input::InputManager;
use crate::resources::rendermanager::RenderManager;

pub struct Scene {
    name: String,
    arena: TransformArena,
    entities: Vec<Entity>,
    to_add: Vec<Entity>,
    to_insert: Vec<(usize, Entity)>,
    to_remove: Vec<(EntityId, bool)>,
    root: EntityId,
    released_assets: Vec<String>,
    released_colliders: Vec<ColliderId>,
    active: bool,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("entities", &self.entities.len())
            .field("pending", &self.pending_changes())
            .field("active", &self.active)
            .finish()
    }
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_policy(name, NotifyPolicy::default())
    }

    /// Scene whose transforms notify according to `policy`.
    pub fn with_policy(name: impl Into<String>, policy: NotifyPolicy) -> Self {
        let arena = TransformArena::with_policy(policy);
        let mut root = Entity::new(&arena);
        root.transform();
        root.initialize();
        let root_id = root.id();
        Self {
            name: name.into(),
            arena,
            entities: vec![root],
            to_add: Vec::new(),
            to_insert: Vec::new(),
            to_remove: Vec::new(),
            root: root_id,
            released_assets: Vec::new(),
            released_colliders: Vec::new(),
            active: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arena(&self) -> &TransformArena {
        &self.arena
    }

    /// New entity whose transform lives in this scene's arena. It is not
    /// part of the scene until added.
    pub fn create_entity(&self) -> Entity {
        Entity::new(&self.arena)
    }

    pub fn root_id(&self) -> EntityId {
        self.root
    }

    pub fn root_mut(&mut self) -> Option<&mut Entity> {
        let root = self.root;
        self.entity_mut(root)
    }

    fn is_known(&self, id: EntityId) -> bool {
        self.entities.iter().any(|e| e.id() == id)
            || self.to_add.iter().any(|e| e.id() == id)
            || self.to_insert.iter().any(|(_, e)| e.id() == id)
    }

    /// Queues `entity` for addition at the end of the list.
    pub fn add_entity(&mut self, mut entity: Entity) -> EngineResult<EntityId> {
        self.check_new(&entity)?;
        let id = entity.id();
        entity.initialize();
        entity.apply_scene_activation(self.active);
        self.to_add.push(entity);
        Ok(id)
    }

    /// Queues `entity` for insertion at `index` (clamped to the list length
    /// when applied).
    pub fn insert_entity(&mut self, index: usize, mut entity: Entity) -> EngineResult<EntityId> {
        self.check_new(&entity)?;
        let id = entity.id();
        entity.initialize();
        entity.apply_scene_activation(self.active);
        self.to_insert.push((index, entity));
        Ok(id)
    }

    /// Parents `child` to `parent` (also as its default parent) and queues it.
    pub fn add_child_entity(&mut self, mut child: Entity, parent: EntityId) -> EngineResult<EntityId> {
        self.check_new(&child)?;
        let parent = self
            .entity_mut_any(parent)
            .ok_or(EngineError::UnknownEntity(parent))?;
        child.set_parent(Some(&mut *parent))?;
        child.set_default_parent(Some(parent))?;
        self.add_entity(child)
    }

    fn check_new(&self, entity: &Entity) -> EngineResult<()> {
        if !entity.arena().ptr_eq(&self.arena) {
            warn!("{} belongs to another scene's arena", entity.id());
            return Err(EngineError::UnknownEntity(entity.id()));
        }
        if self.is_known(entity.id()) {
            return Err(EngineError::UnknownEntity(entity.id()));
        }
        Ok(())
    }

    /// Queues removal of an active entity. With `dispose_assets`, the names of
    /// the assets its renderer used are reported through
    /// [`take_released_assets`](Self::take_released_assets) once it is gone.
    /// Returns false if the entity is not in the active list, is already
    /// queued or is the root.
    pub fn remove_entity(&mut self, id: EntityId, dispose_assets: bool) -> bool {
        if id == self.root {
            warn!("{}: refusing to remove the root entity", self.name);
            return false;
        }
        if self.to_remove.iter().any(|(queued, _)| *queued == id)
            || !self.entities.iter().any(|e| e.id() == id)
        {
            return false;
        }
        self.to_remove.push((id, dispose_assets));
        true
    }

    /// Applies queued additions, insertions and removals, in that order.
    pub fn process_entity_changes(&mut self) {
        for entity in self.to_add.drain(..) {
            debug!("{}: added {}", self.name, entity.id());
            self.entities.push(entity);
        }
        for (index, entity) in self.to_insert.drain(..) {
            let index = index.min(self.entities.len());
            debug!("{}: inserted {} at {index}", self.name, entity.id());
            self.entities.insert(index, entity);
        }
        for (id, dispose_assets) in std::mem::take(&mut self.to_remove) {
            let Some(position) = self.entities.iter().position(|e| e.id() == id) else {
                continue;
            };
            let mut entity = self.entities.remove(position);
            if dispose_assets {
                if let Some(renderer) = entity.renderer() {
                    self.released_assets.push(renderer.asset_name().to_string());
                }
            }
            if let Some(collider) = entity.collider() {
                self.released_colliders.push(collider.id());
            }
            entity.remove_all_components();
            debug!("{}: removed {id}", self.name);
        }
    }

    /// Number of queued additions, insertions and removals.
    pub fn pending_changes(&self) -> usize {
        self.to_add.len() + self.to_insert.len() + self.to_remove.len()
    }

    /// Asset names released by removals since the last call.
    pub fn take_released_assets(&mut self) -> Vec<String> {
        std::mem::take(&mut self.released_assets)
    }

    /// Colliders of entities removed since the last call.
    pub fn take_released_colliders(&mut self) -> Vec<ColliderId> {
        std::mem::take(&mut self.released_colliders)
    }

    /// Reconciles pending changes, then updates every enabled entity.
    pub fn update(&mut self, delta: f32, input: &mut InputManager) {
        self.process_entity_changes();
        for entity in &mut self.entities {
            entity.update(delta, input);
        }
    }

    /// Draws every visible entity.
    pub fn draw(&self, render: &mut RenderManager) {
        for entity in &self.entities {
            entity.draw(render);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Restores every entity's intended visibility and enable state.
    pub fn activate(&mut self) {
        self.set_active(true);
    }

    /// Hides and disables every entity, keeping their intended state.
    pub fn deactivate(&mut self) {
        self.set_active(false);
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
        let pending = self
            .to_add
            .iter_mut()
            .chain(self.to_insert.iter_mut().map(|(_, e)| e));
        for entity in self.entities.iter_mut().chain(pending) {
            entity.apply_scene_activation(active);
        }
        debug!("{}: active = {active}", self.name);
    }

    /// Detaches every entity's components and empties the scene, reporting
    /// the renderers' assets as released.
    pub fn unload(&mut self) {
        let pending: Vec<Entity> = self
            .to_add
            .drain(..)
            .chain(self.to_insert.drain(..).map(|(_, e)| e))
            .collect();
        self.to_remove.clear();
        for mut entity in self.entities.drain(..).chain(pending) {
            if let Some(renderer) = entity.renderer() {
                self.released_assets.push(renderer.asset_name().to_string());
            }
            if let Some(collider) = entity.collider() {
                self.released_colliders.push(collider.id());
            }
            entity.remove_all_components();
        }
        self.active = false;
        debug!("{}: unloaded", self.name);
    }

    /// Active entities, in update order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    /// Active or pending entity.
    pub fn entity_mut_any(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .chain(self.to_add.iter_mut())
            .chain(self.to_insert.iter_mut().map(|(_, e)| e))
            .find(|e| e.id() == id)
    }
}
