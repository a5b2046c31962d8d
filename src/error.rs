// src/error.rs

use thiserror::Error;

/// Errors that abort a planning run.
///
/// Degenerate numbers (zero demand, zero presented totals) and malformed cells
/// never end up here; they are resolved in place and the run continues.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("invalid parameter `{name}`: {message}")]
    InvalidParameter { name: String, message: String },

    #[error("unknown branch code: {0} (expected SF, BA, MDZ or SLT)")]
    UnknownBranch(String),

    #[error("unknown demand method: {0} (expected A or B)")]
    UnknownMethod(String),

    #[error("unknown analysis mode: {0} (expected replenishment or return)")]
    UnknownMode(String),

    #[error("unknown family: {0}")]
    UnknownFamily(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;

impl PlanError {
    pub fn invalid(name: &str, message: impl Into<String>) -> Self {
        PlanError::InvalidParameter {
            name: name.to_string(),
            message: message.into(),
        }
    }
}
