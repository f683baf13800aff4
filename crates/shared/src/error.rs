use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notice::{Notice, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    Conflict,
    EmptyPool,
    Busy,
    NothingPending,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::EmptyPool => "empty_pool",
            Self::Busy => "busy",
            Self::NothingPending => "nothing_pending",
        }
    }
}

/// Errors that abort a raffle operation. Every variant leaves state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RaffleError {
    #[error("employee name must not be empty")]
    EmptyName,
    #[error("an employee named '{0}' already exists")]
    DuplicateName(String),
    #[error("the raffle pool is empty")]
    EmptyPool,
    #[error("a draw is already in progress")]
    DrawInProgress,
    #[error("there is no pending action to confirm")]
    NothingToConfirm,
}

impl RaffleError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyName => ErrorCode::Validation,
            Self::DuplicateName(_) => ErrorCode::Conflict,
            Self::EmptyPool => ErrorCode::EmptyPool,
            Self::DrawInProgress => ErrorCode::Busy,
            Self::NothingToConfirm => ErrorCode::NothingPending,
        }
    }

    pub fn notice(&self) -> Notice {
        match self {
            Self::EmptyName => Notice::new(
                "Invalid Name",
                "Employee name cannot be empty.",
                Severity::Destructive,
            ),
            Self::DuplicateName(name) => Notice::new(
                "Employee Exists",
                format!("An employee named \"{name}\" already exists."),
                Severity::Destructive,
            ),
            Self::EmptyPool => Notice::new(
                "Raffle Pool Empty",
                "Please add employees to the raffle pool before drawing a winner.",
                Severity::Destructive,
            ),
            Self::DrawInProgress => Notice::new(
                "Draw In Progress",
                "Wait for the current draw to finish.",
                Severity::Warning,
            ),
            Self::NothingToConfirm => Notice::new(
                "Nothing To Confirm",
                "There is no pending action.",
                Severity::Info,
            ),
        }
    }
}

impl From<RaffleError> for Notice {
    fn from(value: RaffleError) -> Self {
        value.notice()
    }
}
