use glam::Vec2;

use crate::components::transform::Transform;
use crate::core::component::{Component, FrameContext};

/// Linear velocity in units per second, applied to the owner's local position
/// on every update.
#[derive(Debug, Clone)]
pub struct Velocity {
    pub value: Vec2,
    transform: Transform,
}

impl Velocity {
    pub fn new(transform: &Transform, value: Vec2) -> Self {
        Self {
            value,
            transform: transform.clone(),
        }
    }
}

impl Component for Velocity {
    fn update(&mut self, frame: &mut FrameContext<'_>) {
        self.transform.translate(self.value * frame.delta);
    }
}
