use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the in-memory diary and capsule collections.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DiaryError {
    /// No entry at the requested position for that day
    #[error("no entry #{index} on {date}")]
    EntryNotFound { date: NaiveDate, index: usize },

    /// Calendar arithmetic left chrono's representable range
    #[error("date out of range: {0}")]
    DateOutOfRange(String),
}
