//! Error types for schedule-engine construction boundaries.
//!
//! The layout, expansion and reschedule operations are total and never fail.
//! Errors only surface when building configuration or parsing input strictly.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid recurrence pattern: {0}")]
    InvalidPattern(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
