use thiserror::Error;

use crate::{controller::Mutation, state::TransitionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Rejected,
    Validation,
    Forbidden,
    Navigation,
    Busy,
    Storage,
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("{0}")]
    Validation(String),
    #[error("only managers can {0}")]
    Forbidden(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("a {0} request is already in progress")]
    Busy(Mutation),
    #[error("session storage failed: {0:#}")]
    Storage(anyhow::Error),
}

impl ControllerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ControllerError::Transport(_) => ErrorCategory::Transport,
            ControllerError::Rejected { .. } => ErrorCategory::Rejected,
            ControllerError::Validation(_) => ErrorCategory::Validation,
            ControllerError::Forbidden(_) => ErrorCategory::Forbidden,
            ControllerError::Transition(_) => ErrorCategory::Navigation,
            ControllerError::Busy(_) => ErrorCategory::Busy,
            ControllerError::Storage(_) => ErrorCategory::Storage,
        }
    }

    /// Message suitable for showing to the user as-is.
    pub fn user_message(&self) -> String {
        match self {
            ControllerError::Transport(err) if err.is_connect() || err.is_timeout() => {
                "Server unreachable; check the URL/network and retry.".to_string()
            }
            ControllerError::Transport(err) if err.is_decode() => {
                "Server sent an unexpected response.".to_string()
            }
            other => other.to_string(),
        }
    }
}
