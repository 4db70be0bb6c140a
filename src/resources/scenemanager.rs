//! Named scenes and the current-scene switch.
//!
//! Exactly one scene is active at a time. Switching deactivates the previous
//! scene (or unloads and hands it back) and activates the new one.

use log::{info, warn};
use rustc_hash::FxHashMap;

use crate::core::scene::Scene;
use crate::error::{EngineError, EngineResult};

#[derive(Default)]
pub struct SceneManager {
    scenes: FxHashMap<String, Scene>,
    current: Option<String>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `scene` under its name, deactivated. A scene already
    /// registered under that name is replaced and returned.
    pub fn add_scene(&mut self, mut scene: Scene) -> Option<Scene> {
        let name = scene.name().to_string();
        if self.current.as_deref() == Some(name.as_str()) {
            scene.activate();
        } else {
            scene.deactivate();
        }
        let previous = self.scenes.insert(name.clone(), scene);
        if previous.is_some() {
            warn!("scene '{name}' replaced");
        }
        previous
    }

    /// Makes `name` the current scene.
    ///
    /// The previous scene is deactivated, or with `unload_current` removed,
    /// unloaded and returned so the caller can release its assets.
    pub fn change_scene(&mut self, name: &str, unload_current: bool) -> EngineResult<Option<Scene>> {
        if !self.scenes.contains_key(name) {
            return Err(EngineError::UnknownScene(name.to_string()));
        }
        let mut unloaded = None;
        if let Some(previous) = self.current.take() {
            if previous == name {
                self.current = Some(previous);
                if let Some(scene) = self.scenes.get_mut(name) {
                    scene.activate();
                }
                return Ok(None);
            }
            if unload_current {
                if let Some(mut scene) = self.scenes.remove(&previous) {
                    scene.unload();
                    unloaded = Some(scene);
                }
            } else if let Some(scene) = self.scenes.get_mut(&previous) {
                scene.deactivate();
            }
        }
        if let Some(scene) = self.scenes.get_mut(name) {
            scene.activate();
        }
        self.current = Some(name.to_string());
        info!("changed scene to '{name}'");
        Ok(unloaded)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current(&self) -> Option<&Scene> {
        self.current.as_ref().and_then(|name| self.scenes.get(name))
    }

    pub fn current_mut(&mut self) -> Option<&mut Scene> {
        self.current.as_ref().and_then(|name| self.scenes.get_mut(name))
    }

    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.get(name)
    }

    pub fn scene_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    /// Registered scene names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scenes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Unregisters a scene. Removing the current scene leaves none current.
    pub fn remove_scene(&mut self, name: &str) -> Option<Scene> {
        let scene = self.scenes.remove(name)?;
        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
        Some(scene)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}
