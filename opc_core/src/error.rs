//! Errors of the calendar core.

use thiserror::Error;

/// A raw adjustment date could not be read as a civil date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("empty date string")]
    Empty,
    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid time of day `{0}`")]
    InvalidTime(String),
}
