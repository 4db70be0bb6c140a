//! Long-lived services shared by scenes and components.
//!
//! Overview
//! - `audioassets` – cached sound effects, the music slot and host audio commands
//! - `display` – window size, internal resolution and letterboxing
//! - `gameconfig` – INI-backed display, window and timing settings
//! - `graphicsassets` – named textures and font metrics
//! - `input` – per-tick keyboard and mouse state
//! - `rendermanager` – draw-command sink for the frame
//! - `scenemanager` – named scenes and the current-scene switch
//! - `worldtime` – simulation time and delta
pub mod audioassets;
pub mod display;
pub mod gameconfig;
pub mod graphicsassets;
pub mod input;
pub mod rendermanager;
pub mod scenemanager;
pub mod worldtime;
