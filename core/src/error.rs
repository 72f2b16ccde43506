use thiserror::Error;

use crate::Action;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GymError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Invalid action {action}, expected a value in 0..{action_count}")]
    InvalidAction { action: Action, action_count: usize },
    #[error("Environment must be reset before the first step")]
    NotReset,
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
    #[error("Unsupported render mode {mode:?}, valid modes are: human, ansi, rgb_array")]
    UnsupportedRenderMode { mode: String },
}

pub type Result<T> = std::result::Result<T, GymError>;
