//! The component contract.
//!
//! Every component is owned by exactly one [`Entity`](super::entity::Entity),
//! which calls these hooks during registration, per-frame dispatch and
//! removal. All hooks have empty defaults so a component only implements what
//! it needs.

use std::any::Any;

use glam::Vec2;

use crate::components::collider::Collider2D;
use crate::components::renderer::Renderer;
use crate::core::entity::EntityId;
use crate::resources::input::InputManager;
use crate::resources::rendermanager::RenderManager;

/// Downcasting support for trait objects.
///
/// Call these on `&dyn Component`, never on a `Box<dyn Component>`, or the
/// blanket impl will resolve to the box itself.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Per-entity state passed to [`Component::update`].
pub struct FrameContext<'a> {
    /// Seconds since the previous tick.
    pub delta: f32,
    pub input: &'a mut InputManager,
    pub entity: EntityId,
}

/// Per-entity state passed to [`Component::draw`].
pub struct DrawContext<'a> {
    pub render: &'a mut RenderManager,
    pub entity: EntityId,
}

pub trait Component: AsAny {
    /// Called once when the component is registered on `owner`.
    fn initialize(&mut self, _owner: EntityId) {}

    /// Called once per tick while both the entity and the component are enabled.
    fn update(&mut self, _frame: &mut FrameContext<'_>) {}

    /// Called once per tick while the entity is visible and the component enabled.
    fn draw(&self, _ctx: &mut DrawContext<'_>) {}

    /// (Re)establish event subscriptions. Must be idempotent.
    fn attach_events(&mut self) {}

    /// Drop event subscriptions. Must be idempotent.
    fn detach_events(&mut self) {}

    /// The owner's origin was added, replaced or removed (zero when removed).
    fn origin_changed(&mut self, _origin: Vec2) {}

    fn as_collider(&self) -> Option<&Collider2D> {
        None
    }

    fn as_renderer(&self) -> Option<&dyn Renderer> {
        None
    }

    fn as_renderer_mut(&mut self) -> Option<&mut dyn Renderer> {
        None
    }
}
