//! Error type shared by the framework.
//!
//! Every failure here is a composition or programming mistake detected at the
//! call site (a second component of the same kind, a sprite sheet on an entity
//! without a sprite renderer, a parent cycle). None of them is transient, so
//! nothing is retried: the error is returned to the caller as-is.

use thiserror::Error;

use crate::components::transform::TransformId;
use crate::core::entity::EntityId;

/// Errors raised by the entity-component core and its collaborators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A component of this exact kind is already registered on the entity.
    #[error("entity {entity} already has a component of kind `{kind}`")]
    DuplicateComponentKind {
        entity: EntityId,
        kind: &'static str,
    },

    /// The operation needs another component that the entity does not have.
    #[error("`{component}` requires a `{required}` component on the entity")]
    MissingRequiredComponent {
        component: &'static str,
        required: &'static str,
    },

    /// An index was rejected before taking effect.
    #[error("index {index} is out of range (valid: 0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The requested parent is the transform itself or one of its descendants.
    #[error("assigning this parent would create a cycle in the transform hierarchy")]
    ParentCycle,

    /// The transform was released from its arena.
    #[error("transform {0:?} has been released")]
    StaleTransform(TransformId),

    #[error("no scene named `{0}`")]
    UnknownScene(String),

    #[error("no entity {0} in this scene")]
    UnknownEntity(EntityId),

    #[error("unknown asset `{0}`")]
    UnknownAsset(String),

    #[error("config error: {0}")]
    Config(String),
}

/// Convenience alias used across the crate.
pub type EngineResult<T> = Result<T, EngineError>;
