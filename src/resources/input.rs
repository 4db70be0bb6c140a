//! Per-frame keyboard and mouse input.
//!
//! The host samples its devices once per tick and hands the result to
//! [`InputManager::poll`] as an [`InputSnapshot`]. The manager keeps the
//! previous and current snapshots and answers held / just-pressed /
//! just-released / up queries from the pair. Mouse positions are converted
//! from window to viewport coordinates at poll time.

use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::components::collider::{Collider2D, ColliderId};
use crate::resources::display::DisplayManager;

/// Keys the framework knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
    F10,
    F11,
    F12,
}

/// Raw device state for one tick, as reported by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub keys_down: FxHashSet<Key>,
    /// Mouse position in window coordinates.
    pub mouse_position: Vec2,
    pub left_button: bool,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: Key) -> Self {
        self.keys_down.insert(key);
        self
    }

    pub fn with_mouse(mut self, position: Vec2, left_button: bool) -> Self {
        self.mouse_position = position;
        self.left_button = left_button;
        self
    }
}

/// Edge-aware state of a single button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoolState {
    /// Down this tick.
    pub active: bool,
    /// Went down this tick.
    pub just_pressed: bool,
    /// Went up this tick.
    pub just_released: bool,
}

impl BoolState {
    fn from_pair(previous: bool, current: bool) -> Self {
        Self {
            active: current,
            just_pressed: !previous && current,
            just_released: previous && !current,
        }
    }
}

#[derive(Debug, Default)]
pub struct InputManager {
    previous: InputSnapshot,
    current: InputSnapshot,
    mouse_viewport: Vec2,
    viewport_size: Vec2,
    // Colliders that saw a press start inside their bounds.
    pressed_inside: FxHashMap<ColliderId, bool>,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances one tick: the current snapshot becomes the previous one.
    pub fn poll(&mut self, snapshot: InputSnapshot, display: &DisplayManager) {
        self.previous = std::mem::replace(&mut self.current, snapshot);
        self.mouse_viewport = display.window_to_viewport(self.current.mouse_position);
        let (w, h) = display.internal_resolution();
        self.viewport_size = Vec2::new(w as f32, h as f32);
    }

    pub fn key_state(&self, key: Key) -> BoolState {
        BoolState::from_pair(
            self.previous.keys_down.contains(&key),
            self.current.keys_down.contains(&key),
        )
    }

    pub fn key_held(&self, key: Key) -> bool {
        self.key_state(key).active
    }

    pub fn key_just_pressed(&self, key: Key) -> bool {
        self.key_state(key).just_pressed
    }

    pub fn key_just_released(&self, key: Key) -> bool {
        self.key_state(key).just_released
    }

    pub fn key_up(&self, key: Key) -> bool {
        !self.key_state(key).active
    }

    pub fn mouse_state(&self) -> BoolState {
        BoolState::from_pair(self.previous.left_button, self.current.left_button)
    }

    pub fn mouse_held(&self) -> bool {
        self.mouse_state().active
    }

    pub fn mouse_just_pressed(&self) -> bool {
        self.mouse_state().just_pressed
    }

    pub fn mouse_just_released(&self) -> bool {
        self.mouse_state().just_released
    }

    pub fn mouse_up(&self) -> bool {
        !self.mouse_state().active
    }

    /// Mouse position in viewport (internal resolution) coordinates.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_viewport
    }

    pub fn mouse_window_position(&self) -> Vec2 {
        self.current.mouse_position
    }

    /// Mouse is strictly inside the viewport.
    pub fn mouse_on_screen(&self) -> bool {
        let p = self.mouse_viewport;
        p.x > 0.0 && p.x < self.viewport_size.x && p.y > 0.0 && p.y < self.viewport_size.y
    }

    /// True on the tick the left button is released inside `collider`'s
    /// bounds, provided the press also started inside them. Must be asked
    /// every tick for the press to be seen.
    pub fn has_fully_clicked_in_bounds(&mut self, collider: &Collider2D) -> bool {
        let inside = collider.contains(self.mouse_viewport);
        let just_pressed = self.mouse_just_pressed();
        let just_released = self.mouse_just_released();
        let pressed = self.pressed_inside.entry(collider.id()).or_insert(false);

        if just_pressed && inside {
            *pressed = true;
        }
        if just_released {
            let clicked = *pressed && inside;
            *pressed = false;
            return clicked;
        }
        false
    }

    /// Forgets press tracking for a collider that went away.
    pub fn forget_collider(&mut self, collider: ColliderId) {
        self.pressed_inside.remove(&collider);
    }

    /// Number of colliders with press tracking.
    pub fn tracked_colliders(&self) -> usize {
        self.pressed_inside.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::transform::{Transform, TransformArena};
    use crate::shapes::{ColliderShape, Rect};

    fn display() -> DisplayManager {
        let mut display = DisplayManager::new(100, 100);
        display.set_internal_resolution(100, 100);
        display
    }

    #[test]
    fn key_edges() {
        let d = display();
        let mut input = InputManager::new();
        input.poll(InputSnapshot::new().with_key(Key::Space), &d);
        assert!(input.key_just_pressed(Key::Space));
        assert!(input.key_held(Key::Space));

        input.poll(InputSnapshot::new().with_key(Key::Space), &d);
        assert!(!input.key_just_pressed(Key::Space));
        assert!(input.key_held(Key::Space));

        input.poll(InputSnapshot::new(), &d);
        assert!(input.key_just_released(Key::Space));
        assert!(input.key_up(Key::Space));
    }

    #[test]
    fn full_click_requires_press_and_release_inside() {
        let d = display();
        let arena = TransformArena::new();
        let t = Transform::new(&arena);
        let button = Collider2D::new(
            ColliderShape::Box(Rect::new(10.0, 10.0, 20.0, 20.0)),
            &t,
            Vec2::ZERO,
        );
        let inside = Vec2::new(15.0, 15.0);
        let outside = Vec2::new(80.0, 80.0);
        let mut input = InputManager::new();

        // press inside, release inside
        input.poll(InputSnapshot::new().with_mouse(inside, true), &d);
        assert!(!input.has_fully_clicked_in_bounds(&button));
        input.poll(InputSnapshot::new().with_mouse(inside, false), &d);
        assert!(input.has_fully_clicked_in_bounds(&button));

        // press outside, release inside
        input.poll(InputSnapshot::new().with_mouse(outside, true), &d);
        assert!(!input.has_fully_clicked_in_bounds(&button));
        input.poll(InputSnapshot::new().with_mouse(inside, false), &d);
        assert!(!input.has_fully_clicked_in_bounds(&button));

        // press inside, release outside
        input.poll(InputSnapshot::new().with_mouse(inside, true), &d);
        assert!(!input.has_fully_clicked_in_bounds(&button));
        input.poll(InputSnapshot::new().with_mouse(outside, false), &d);
        assert!(!input.has_fully_clicked_in_bounds(&button));
    }

    #[test]
    fn forgotten_collider_drops_press_tracking() {
        let d = display();
        let arena = TransformArena::new();
        let t = Transform::new(&arena);
        let button = Collider2D::new(ColliderShape::Box(Rect::new(0.0, 0.0, 10.0, 10.0)), &t, Vec2::ZERO);
        let mut input = InputManager::new();
        input.poll(InputSnapshot::new().with_mouse(Vec2::new(5.0, 5.0), true), &d);
        input.has_fully_clicked_in_bounds(&button);
        assert_eq!(input.tracked_colliders(), 1);

        input.forget_collider(button.id());
        assert_eq!(input.tracked_colliders(), 0);
        // A release after forgetting is not a click.
        input.poll(InputSnapshot::new().with_mouse(Vec2::new(5.0, 5.0), false), &d);
        assert!(!input.has_fully_clicked_in_bounds(&button));
    }

    #[test]
    fn mouse_position_is_converted_to_viewport() {
        let mut d = DisplayManager::new(200, 100);
        d.set_internal_resolution(100, 100);
        let mut input = InputManager::new();
        input.poll(InputSnapshot::new().with_mouse(Vec2::new(100.0, 50.0), false), &d);
        assert_eq!(input.mouse_position(), Vec2::new(50.0, 50.0));
        assert!(input.mouse_on_screen());
    }
}
