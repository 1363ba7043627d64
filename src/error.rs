//! Error types for the dashboard

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate { input: String },

    /// Date lies outside the selectable window.
    #[error("date {date} is outside the available range {first} to {last}")]
    OutOfRange {
        date: NaiveDate,
        first: NaiveDate,
        last: NaiveDate,
    },

    #[error("unknown region '{name}'")]
    UnknownRegion { name: String },

    /// The data source failed; carries the message shown to the user.
    #[error("{message}")]
    Load { message: String },
}

pub type Result<T> = std::result::Result<T, DashError>;
