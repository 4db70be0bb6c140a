//! Display manager.
//!
//! Tracks the game's internal render resolution, the OS window size and the
//! host display size, and keeps a letterboxed viewport that preserves the
//! internal aspect ratio, centred inside the back buffer.

use glam::Vec2;
use log::debug;

use crate::resources::gameconfig::GameConfig;
use crate::shapes::Rect;

#[derive(Debug, Clone)]
pub struct DisplayManager {
    internal_resolution: (u32, u32),
    window_size: (u32, u32),
    display_size: (u32, u32),
    fullscreen: bool,
    internal_set_manually: bool,
    viewport: Rect,
}

impl DisplayManager {
    /// Windowed display whose internal resolution follows the window until set.
    pub fn new(window_width: u32, window_height: u32) -> Self {
        let mut display = Self {
            internal_resolution: (window_width, window_height),
            window_size: (window_width, window_height),
            display_size: (window_width, window_height),
            fullscreen: false,
            internal_set_manually: false,
            viewport: Rect::ZERO,
        };
        display.adjust_viewport();
        display
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let (window_w, window_h) = config.window_size;
        let mut display = Self::new(window_w, window_h);
        if let Some((screen_w, screen_h)) = config.screen_size {
            display.set_display_size(screen_w, screen_h);
        }
        display.apply_initial_settings(config.fullscreen, config.internal_resolution, config.window_size);
        display
    }

    pub fn apply_initial_settings(
        &mut self,
        fullscreen: bool,
        internal_resolution: (u32, u32),
        window_size: (u32, u32),
    ) {
        self.set_internal_resolution(internal_resolution.0, internal_resolution.1);
        self.set_window_size(window_size.0, window_size.1);
        self.set_fullscreen(fullscreen);
    }

    pub fn internal_resolution(&self) -> (u32, u32) {
        self.internal_resolution
    }

    pub fn set_internal_resolution(&mut self, width: u32, height: u32) {
        self.internal_resolution = (width, height);
        self.internal_set_manually = true;
        self.adjust_viewport();
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
        if !self.internal_set_manually {
            self.internal_resolution = (width, height);
        }
        self.adjust_viewport();
    }

    /// Size of the physical display, reported by the host. Used in fullscreen.
    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.display_size = (width, height);
        self.adjust_viewport();
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
        debug!("fullscreen = {fullscreen}");
        self.adjust_viewport();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.set_fullscreen(!self.fullscreen);
    }

    /// Current drawing surface: the display in fullscreen, the window otherwise.
    pub fn backbuffer_size(&self) -> (u32, u32) {
        if self.fullscreen {
            self.display_size
        } else {
            self.window_size
        }
    }

    pub fn window_center(&self) -> Vec2 {
        Vec2::new(self.window_size.0 as f32, self.window_size.1 as f32) * 0.5
    }

    /// Letterboxed area of the back buffer the game is drawn into.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    fn adjust_viewport(&mut self) {
        let (buffer_w, buffer_h) = self.backbuffer_size();
        self.viewport = calculate_letterbox(self.internal_resolution, (buffer_w, buffer_h));
    }

    /// Converts a window position into internal-resolution coordinates.
    /// Positions in the black bars map outside `0..internal`.
    pub fn window_to_viewport(&self, window_pos: Vec2) -> Vec2 {
        let (internal_w, internal_h) = self.internal_resolution;
        if internal_w == 0 || internal_h == 0 || self.viewport.width == 0.0 || self.viewport.height == 0.0 {
            return window_pos;
        }
        let scale_x = self.viewport.width / internal_w as f32;
        let scale_y = self.viewport.height / internal_h as f32;
        Vec2::new(
            (window_pos.x - self.viewport.x) / scale_x,
            (window_pos.y - self.viewport.y) / scale_y,
        )
    }

    /// Inverse of [`window_to_viewport`](Self::window_to_viewport).
    pub fn viewport_to_window(&self, viewport_pos: Vec2) -> Vec2 {
        let (internal_w, internal_h) = self.internal_resolution;
        if internal_w == 0 || internal_h == 0 {
            return viewport_pos;
        }
        let scale_x = self.viewport.width / internal_w as f32;
        let scale_y = self.viewport.height / internal_h as f32;
        Vec2::new(
            viewport_pos.x * scale_x + self.viewport.x,
            viewport_pos.y * scale_y + self.viewport.y,
        )
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

/// Largest rectangle with the game's aspect ratio that fits the buffer,
/// centred (pillarbox on wide buffers, letterbox on tall ones).
pub fn calculate_letterbox(game: (u32, u32), buffer: (u32, u32)) -> Rect {
    let buffer_w = buffer.0 as f32;
    let buffer_h = buffer.1 as f32;
    if game.0 == 0 || game.1 == 0 || buffer.0 == 0 || buffer.1 == 0 {
        return Rect::new(0.0, 0.0, buffer_w, buffer_h);
    }
    let game_w = game.0 as f32;
    let game_h = game.1 as f32;
    let game_aspect = game_w / game_h;
    let buffer_aspect = buffer_w / buffer_h;

    if buffer_aspect > game_aspect {
        let scaled_w = buffer_h * game_aspect;
        Rect::new((buffer_w - scaled_w) / 2.0, 0.0, scaled_w, buffer_h)
    } else {
        let scaled_h = buffer_w / game_aspect;
        Rect::new(0.0, (buffer_h - scaled_h) / 2.0, buffer_w, scaled_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn wider_window_is_pillarboxed() {
        let r = calculate_letterbox((640, 360), (1920, 800));
        assert!(approx_eq(r.height, 800.0));
        assert!(approx_eq(r.width, 800.0 * 16.0 / 9.0));
        assert!(approx_eq(r.x, (1920.0 - r.width) / 2.0));
        assert!(approx_eq(r.y, 0.0));
    }

    #[test]
    fn taller_window_is_letterboxed() {
        let r = calculate_letterbox((640, 360), (1280, 1000));
        assert!(approx_eq(r.width, 1280.0));
        assert!(approx_eq(r.height, 720.0));
        assert!(approx_eq(r.y, 140.0));
    }

    #[test]
    fn internal_follows_window_until_set() {
        let mut display = DisplayManager::new(800, 600);
        display.set_window_size(1024, 768);
        assert_eq!(display.internal_resolution(), (1024, 768));
        display.set_internal_resolution(320, 240);
        display.set_window_size(640, 480);
        assert_eq!(display.internal_resolution(), (320, 240));
    }

    #[test]
    fn window_to_viewport_accounts_for_bars() {
        let mut display = DisplayManager::new(1280, 1000);
        display.set_internal_resolution(640, 360);
        let p = display.window_to_viewport(Vec2::new(640.0, 140.0));
        assert!(approx_eq(p.x, 320.0));
        assert!(approx_eq(p.y, 0.0));
        let outside = display.window_to_viewport(Vec2::new(0.0, 10.0));
        assert!(outside.y < 0.0);
    }

    #[test]
    fn collapsed_window_leaves_positions_finite() {
        let mut display = DisplayManager::new(800, 0);
        display.set_internal_resolution(640, 360);
        assert!(approx_eq(display.viewport().height, 0.0));
        let p = display.window_to_viewport(Vec2::new(12.0, 34.0));
        assert!(p.is_finite());
        assert_eq!(p, Vec2::new(12.0, 34.0));

        let mut narrow = DisplayManager::new(0, 600);
        narrow.set_internal_resolution(640, 360);
        assert!(narrow.window_to_viewport(Vec2::new(5.0, 5.0)).is_finite());
    }

    #[test]
    fn config_screen_size_drives_fullscreen_viewport() {
        let mut config = GameConfig::new();
        config.screen_size = Some((1920, 1080));
        config.fullscreen = true;
        let display = DisplayManager::from_config(&config);
        assert_eq!(display.backbuffer_size(), (1920, 1080));
        assert!(approx_eq(display.viewport().width, 1920.0));
        assert_eq!(display.window_size(), (1280, 720));
    }

    #[test]
    fn fullscreen_uses_display_size() {
        let mut display = DisplayManager::new(640, 360);
        display.set_internal_resolution(640, 360);
        display.set_display_size(1920, 1080);
        display.toggle_fullscreen();
        assert_eq!(display.backbuffer_size(), (1920, 1080));
        assert!(approx_eq(display.viewport().width, 1920.0));
    }
}
