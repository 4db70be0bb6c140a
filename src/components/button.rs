use std::fmt;

use crate::components::collider::Collider2D;
use crate::core::component::{Component, FrameContext};
use crate::core::entity::Entity;

pub type ClickHandler = Box<dyn FnMut()>;

/// Runs its click handlers when the mouse is pressed and released inside the
/// owner's collider bounds.
///
/// The collider is captured at construction; a button built on an entity
/// without a collider never fires.
pub struct Button {
    collider: Option<Collider2D>,
    handlers: Vec<ClickHandler>,
    clicks: u64,
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("collider", &self.collider)
            .field("handlers", &self.handlers.len())
            .field("clicks", &self.clicks)
            .finish()
    }
}

impl Button {
    pub fn new(entity: &Entity) -> Self {
        Self::with_collider(entity.collider().cloned())
    }

    pub fn with_collider(collider: Option<Collider2D>) -> Self {
        Self {
            collider,
            handlers: Vec::new(),
            clicks: 0,
        }
    }

    pub fn on_click(&mut self, handler: impl FnMut() + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub fn with_handler(mut self, handler: impl FnMut() + 'static) -> Self {
        self.on_click(handler);
        self
    }

    /// Number of full clicks seen so far.
    pub fn click_count(&self) -> u64 {
        self.clicks
    }

    /// Runs every handler as if the button had been clicked.
    pub fn click(&mut self) {
        self.clicks += 1;
        for handler in &mut self.handlers {
            handler();
        }
    }
}

impl Component for Button {
    fn update(&mut self, frame: &mut FrameContext<'_>) {
        let Some(collider) = self.collider.as_ref() else {
            return;
        };
        if frame.input.has_fully_clicked_in_bounds(collider) {
            self.click();
        }
    }
}
