//! INI-backed startup settings.
//!
//! ```ini
//! [display]
//! internal_width = 640
//! internal_height = 360
//! ; physical screen used in fullscreen, 0 = same as the window
//! screen_width = 1920
//! screen_height = 1080
//! fullscreen = false
//!
//! [window]
//! width = 1280
//! height = 720
//!
//! [timing]
//! target_fps = 60
//! ```
//!
//! Every key is optional; absent keys keep their defaults.

use std::path::{Path, PathBuf};

use configparser::ini::Ini;
use log::{debug, info};

use crate::error::{EngineError, EngineResult};

const DISPLAY: &str = "display";
const WINDOW: &str = "window";
const TIMING: &str = "timing";

const DEFAULT_INTERNAL: (u32, u32) = (640, 360);
const DEFAULT_WINDOW: (u32, u32) = (1280, 720);
const DEFAULT_TARGET_FPS: u32 = 60;

/// Settings [`Game::new`](crate::game::Game::new) applies to the display
/// manager; the demo also reads its tick length from here.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Resolution the game is laid out in.
    pub internal_resolution: (u32, u32),
    pub window_size: (u32, u32),
    /// Physical screen size; `None` means "same as the window".
    pub screen_size: Option<(u32, u32)>,
    pub fullscreen: bool,
    /// 0 leaves the tick length to the host.
    pub target_fps: u32,
    pub path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            internal_resolution: DEFAULT_INTERNAL,
            window_size: DEFAULT_WINDOW,
            screen_size: None,
            fullscreen: false,
            target_fps: DEFAULT_TARGET_FPS,
            path: PathBuf::from("ec2d.ini"),
        }
    }

    /// Defaults, to be read from and saved to `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::new()
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overlays the keys present in the file on the current values.
    pub fn load_from_file(&mut self) -> EngineResult<()> {
        let mut ini = Ini::new();
        ini.load(&self.path)
            .map_err(|e| EngineError::Config(format!("cannot read {}: {e}", self.path.display())))?;

        self.internal_resolution = (
            read_u32(&ini, DISPLAY, "internal_width")?.unwrap_or(self.internal_resolution.0),
            read_u32(&ini, DISPLAY, "internal_height")?.unwrap_or(self.internal_resolution.1),
        );
        let screen = (
            read_u32(&ini, DISPLAY, "screen_width")?,
            read_u32(&ini, DISPLAY, "screen_height")?,
        );
        match screen {
            (Some(0), _) | (_, Some(0)) => self.screen_size = None,
            (Some(w), Some(h)) => self.screen_size = Some((w, h)),
            (None, None) => {}
            _ => {
                return Err(EngineError::Config(
                    "screen_width and screen_height must be given together".to_string(),
                ));
            }
        }
        if let Some(fullscreen) = ini
            .getboolcoerce(DISPLAY, "fullscreen")
            .map_err(|e| EngineError::Config(format!("[{DISPLAY}] fullscreen: {e}")))?
        {
            self.fullscreen = fullscreen;
        }

        self.window_size = (
            read_u32(&ini, WINDOW, "width")?.unwrap_or(self.window_size.0),
            read_u32(&ini, WINDOW, "height")?.unwrap_or(self.window_size.1),
        );
        if let Some(fps) = read_u32(&ini, TIMING, "target_fps")? {
            self.target_fps = fps;
        }

        info!(
            "config {}: internal {:?}, window {:?}, screen {:?}, fullscreen {}, {} fps",
            self.path.display(),
            self.internal_resolution,
            self.window_size,
            self.screen_size,
            self.fullscreen,
            self.target_fps
        );
        Ok(())
    }

    pub fn save_to_file(&self) -> EngineResult<()> {
        let mut ini = Ini::new();
        let mut put = |section: &str, key: &str, value: String| {
            ini.set(section, key, Some(value));
        };
        put(DISPLAY, "internal_width", self.internal_resolution.0.to_string());
        put(DISPLAY, "internal_height", self.internal_resolution.1.to_string());
        let (screen_w, screen_h) = self.screen_size.unwrap_or((0, 0));
        put(DISPLAY, "screen_width", screen_w.to_string());
        put(DISPLAY, "screen_height", screen_h.to_string());
        put(DISPLAY, "fullscreen", self.fullscreen.to_string());
        put(WINDOW, "width", self.window_size.0.to_string());
        put(WINDOW, "height", self.window_size.1.to_string());
        put(TIMING, "target_fps", self.target_fps.to_string());

        ini.write(&self.path)
            .map_err(|e| EngineError::Config(format!("cannot write {}: {e}", self.path.display())))?;
        debug!("config saved to {}", self.path.display());
        Ok(())
    }

    /// Seconds per tick at the target rate, 0 when uncapped.
    pub fn frame_time(&self) -> f32 {
        if self.target_fps == 0 {
            0.0
        } else {
            1.0 / self.target_fps as f32
        }
    }
}

fn read_u32(ini: &Ini, section: &str, key: &str) -> EngineResult<Option<u32>> {
    let value = ini
        .getuint(section, key)
        .map_err(|e| EngineError::Config(format!("[{section}] {key}: {e}")))?;
    value
        .map(|v| u32::try_from(v).map_err(|_| EngineError::Config(format!("[{section}] {key}: {v} is too large"))))
        .transpose()
}
