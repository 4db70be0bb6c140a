//! ec2d: a small 2D entity-component framework.
//!
//! Entities own components keyed by concrete type; transforms form a
//! hierarchy in a per-scene arena; colliders cache their world bounds and
//! are invalidated through transform change notifications. Scenes queue
//! entity changes and apply them at the start of each tick.
//!
//! - [`core`] – component contract, entities and scenes
//! - [`components`] – transform, origin, velocity, colliders, renderers, UI
//! - [`resources`] – display, input, render, assets, scenes, time, config
//! - [`systems`] – collision service
//! - [`events`] – collision event payloads
//! - [`factory`] – helpers assembling common component sets
//! - [`game`] – service container and tick loop

pub mod color;
pub mod components;
pub mod core;
pub mod error;
pub mod events;
pub mod factory;
pub mod game;
pub mod mathutils;
pub mod resources;
pub mod shapes;
pub mod systems;
