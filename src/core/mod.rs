//! Entity-component core: the component contract, entities and scenes.

pub mod component;
pub mod entity;
pub mod scene;
