//! Components that can be attached to entities.
//!
//! Submodules overview:
//! - [`transform`] – position/rotation/scale hierarchy stored in a per-scene arena
//! - [`origin`] – anchor offset for drawing and collision
//! - [`velocity`] – constant motion applied to the transform each tick
//! - [`collider`] – shared collider capability with a lazy world-bounds cache
//! - [`boxcollider`] – axis-aligned rectangular collider
//! - [`circlecollider`] – circular collider
//! - [`renderer`] – renderer base state, the renderer capability and texture renderers
//! - [`rectanglerenderer`] – solid rectangle renderer
//! - [`circlerenderer`] – filled circle renderer
//! - [`spriterenderer`] – sprite texture renderer
//! - [`spritesheet`] – grid addressing over a sprite texture
//! - [`textrenderer`] – aligned text renderer
//! - [`button`] – click handlers over a collider

pub mod boxcollider;
pub mod button;
pub mod circlecollider;
pub mod circlerenderer;
pub mod collider;
pub mod origin;
pub mod rectanglerenderer;
pub mod renderer;
pub mod spriterenderer;
pub mod spritesheet;
pub mod textrenderer;
pub mod transform;
pub mod velocity;
