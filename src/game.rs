//! Service container and tick loop.
//!
//! [`Game`] owns every long-lived service and drives the current scene once
//! per tick:
//!
//! 1. advance [`WorldTime`] and poll the host's [`InputSnapshot`];
//! 2. update the current scene (pending entity changes are applied first);
//! 3. unload assets released by removed entities and forget their colliders'
//!    click tracking;
//! 4. draw the scene into a fresh [`RenderManager`] frame.
//!
//! F11 toggles fullscreen, like the debug keys of a windowed host. Unloading a
//! scene on a switch also clears the audio cache.

use log::{debug, info};

use crate::core::scene::Scene;
use crate::error::EngineResult;
use crate::events::collision::CollisionEvent;
use crate::resources::audioassets::AudioAssets;
use crate::resources::display::DisplayManager;
use crate::resources::gameconfig::GameConfig;
use crate::resources::graphicsassets::GraphicsAssets;
use crate::resources::input::{InputManager, InputSnapshot, Key};
use crate::resources::rendermanager::RenderManager;
use crate::resources::scenemanager::SceneManager;
use crate::resources::worldtime::WorldTime;
use crate::systems::collision::detect_collisions;

pub struct Game {
    pub config: GameConfig,
    pub display: DisplayManager,
    pub input: InputManager,
    pub render: RenderManager,
    pub assets: GraphicsAssets,
    pub audio: AudioAssets,
    pub scenes: SceneManager,
    pub time: WorldTime,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Game {
    /// Builds every service and applies `config` to the display.
    pub fn new(config: GameConfig) -> Self {
        let display = DisplayManager::from_config(&config);
        info!(
            "game created: internal {:?}, window {:?}, fullscreen {}",
            config.internal_resolution,
            config.window_size,
            config.fullscreen
        );
        Self {
            config,
            display,
            input: InputManager::new(),
            render: RenderManager::new(),
            assets: GraphicsAssets::new(),
            audio: AudioAssets::new(),
            scenes: SceneManager::new(),
            time: WorldTime::default(),
        }
    }

    /// Registers a scene; the first one registered becomes current.
    pub fn add_scene(&mut self, scene: Scene) -> EngineResult<()> {
        let name = scene.name().to_string();
        let first = self.scenes.current().is_none();
        if let Some(mut replaced) = self.scenes.add_scene(scene) {
            replaced.unload();
            self.release_scene_resources(&mut replaced);
        }
        if first {
            self.change_scene(&name, false)?;
        }
        Ok(())
    }

    /// Switches the current scene. With `unload_current`, the previous
    /// scene's graphics assets and the whole audio cache are released.
    pub fn change_scene(&mut self, name: &str, unload_current: bool) -> EngineResult<()> {
        if let Some(mut old) = self.scenes.change_scene(name, unload_current)? {
            self.release_scene_resources(&mut old);
            self.audio.clear();
        }
        Ok(())
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.scenes.current()
    }

    pub fn current_scene_mut(&mut self) -> Option<&mut Scene> {
        self.scenes.current_mut()
    }

    /// Advances time, polls input and updates the current scene.
    pub fn update(&mut self, real_delta: f32, snapshot: InputSnapshot) {
        self.time.advance(real_delta);
        self.input.poll(snapshot, &self.display);
        if self.input.key_just_pressed(Key::F11) {
            self.display.toggle_fullscreen();
        }

        let delta = self.time.delta;
        let (assets, colliders) = match self.scenes.current_mut() {
            Some(scene) => {
                scene.update(delta, &mut self.input);
                (scene.take_released_assets(), scene.take_released_colliders())
            }
            None => (Vec::new(), Vec::new()),
        };
        self.release_assets(assets);
        for collider in colliders {
            self.input.forget_collider(collider);
        }
        self.audio.trim_commands();
    }

    /// Records this frame's draw commands for the current scene.
    pub fn draw(&mut self) {
        self.render.begin_frame();
        if let Some(scene) = self.scenes.current() {
            scene.draw(&mut self.render);
        }
        self.render.end_frame();
    }

    /// One full tick: update then draw.
    pub fn tick(&mut self, real_delta: f32, snapshot: InputSnapshot) {
        self.update(real_delta, snapshot);
        self.draw();
    }

    /// Overlapping collider pairs in the current scene.
    pub fn collisions(&self) -> Vec<CollisionEvent> {
        self.scenes
            .current()
            .map(detect_collisions)
            .unwrap_or_default()
    }

    fn release_scene_resources(&mut self, scene: &mut Scene) {
        self.release_assets(scene.take_released_assets());
        for collider in scene.take_released_colliders() {
            self.input.forget_collider(collider);
        }
    }

    fn release_assets(&mut self, names: Vec<String>) {
        for name in names {
            if self.assets.unload(&name) {
                debug!("unloaded asset '{name}'");
            }
        }
    }
}
