//! Graphics asset catalogue.
//!
//! Decoding image and font files is the host's job. The catalogue only keeps
//! what the framework needs to lay things out: texture dimensions and font
//! metrics, keyed by name. Rectangle and circle textures are procedural and
//! created on first request; sprites and fonts must be registered by the host
//! before they are loaded.

use glam::Vec2;
use log::debug;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TextureKind {
    Sprite,
    Rectangle,
    Circle { radius: u32 },
}

/// Dimensions of a named texture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextureInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub kind: TextureKind,
}

impl TextureInfo {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }
}

/// Monospace font metrics used to measure strings.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    pub name: String,
    pub glyph_width: f32,
    pub line_height: f32,
}

impl FontMetrics {
    pub fn new(name: impl Into<String>, glyph_width: f32, line_height: f32) -> Self {
        Self {
            name: name.into(),
            glyph_width,
            line_height,
        }
    }

    /// Size of `text`: widest line times glyph width, line count times line height.
    pub fn measure(&self, text: &str) -> Vec2 {
        if text.is_empty() {
            return Vec2::ZERO;
        }
        let (lines, widest) = text
            .lines()
            .fold((0usize, 0usize), |(n, w), line| (n + 1, w.max(line.chars().count())));
        Vec2::new(
            widest as f32 * self.glyph_width,
            lines.max(1) as f32 * self.line_height,
        )
    }
}

#[derive(Debug, Default)]
pub struct GraphicsAssets {
    textures: FxHashMap<String, TextureInfo>,
    fonts: FxHashMap<String, FontMetrics>,
}

impl GraphicsAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a sprite decoded by the host.
    pub fn register_sprite(&mut self, name: impl Into<String>, width: u32, height: u32) {
        let name = name.into();
        self.textures.insert(
            name.clone(),
            TextureInfo {
                name,
                width,
                height,
                kind: TextureKind::Sprite,
            },
        );
    }

    pub fn register_font(&mut self, font: FontMetrics) {
        self.fonts.insert(font.name.clone(), font);
    }

    pub fn load_sprite(&self, name: &str) -> EngineResult<TextureInfo> {
        self.textures
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownAsset(name.to_string()))
    }

    /// Solid rectangle texture, created on first use and cached by name.
    pub fn load_rectangle(&mut self, name: &str, width: u32, height: u32) -> TextureInfo {
        self.textures
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!("creating rectangle texture {name} ({width}x{height})");
                TextureInfo {
                    name: name.to_string(),
                    width,
                    height,
                    kind: TextureKind::Rectangle,
                }
            })
            .clone()
    }

    /// Filled circle texture of `2 * radius` square, cached by name.
    pub fn load_circle(&mut self, name: &str, radius: u32) -> TextureInfo {
        self.textures
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!("creating circle texture {name} (r={radius})");
                TextureInfo {
                    name: name.to_string(),
                    width: radius * 2,
                    height: radius * 2,
                    kind: TextureKind::Circle { radius },
                }
            })
            .clone()
    }

    pub fn load_font(&self, name: &str) -> EngineResult<FontMetrics> {
        self.fonts
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownAsset(name.to_string()))
    }

    /// Forgets a texture or font. Returns whether anything was removed.
    pub fn unload(&mut self, name: &str) -> bool {
        let texture = self.textures.remove(name).is_some();
        let font = self.fonts.remove(name).is_some();
        if texture || font {
            debug!("unloaded graphics asset {name}");
        }
        texture || font
    }

    pub fn clear(&mut self) {
        self.textures.clear();
        self.fonts.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name) || self.fonts.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.textures.len() + self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
