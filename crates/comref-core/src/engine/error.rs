use thiserror::Error;

use super::config::ConfigError;
use super::history::EntityId;
use crate::core::models::GroupError;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum PullError {
    #[error("Invalid pull configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid index group: {0}")]
    Group(#[from] GroupError),

    #[error("Frame holds {found} atoms, but at least {expected} are required")]
    FrameSize { expected: usize, found: usize },

    #[error("Expected {expected} trial positions (one per pull group), got {found}")]
    TrialPositionCount { expected: usize, found: usize },

    #[error("No running-average history is kept for {entity}")]
    UnknownEntity { entity: EntityId },

    #[error("Center of {entity} has zero total mass at step {step}")]
    DegenerateMass { entity: EntityId, step: u64 },
}
