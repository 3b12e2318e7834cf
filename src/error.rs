//! Error types for the Absence Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading absence data,
//! resolving half-day states, and serving API requests.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Absence Engine.
///
/// All fallible operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use absence_engine::error::EngineError;
///
/// let error = EngineError::InvalidAbsenceType {
///     value: "HOLIDAY".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unrecognized absence type: HOLIDAY");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A date range was constructed with its start after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
    },

    /// An absence type token was not recognized.
    #[error("Unrecognized absence type: {value}")]
    InvalidAbsenceType {
        /// The token that could not be parsed.
        value: String,
    },

    /// An absence status token was not recognized.
    #[error("Unrecognized absence status: {value}")]
    InvalidAbsenceStatus {
        /// The token that could not be parsed.
        value: String,
    },

    /// A day length token was not recognized.
    #[error("Unrecognized day length: {value}")]
    InvalidDayLength {
        /// The token that could not be parsed.
        value: String,
    },

    /// The type filter of a listing request was not one of the accepted values.
    #[error("Invalid absence type filter '{value}': expected VACATION or SICK")]
    InvalidTypeFilter {
        /// The rejected filter token.
        value: String,
    },

    /// A month selector was neither empty nor a month number from 1 to 12.
    #[error("Invalid month '{value}': expected a number from 1 to 12")]
    InvalidMonth {
        /// The rejected month token.
        value: String,
    },

    /// No person exists for the given id.
    #[error("No person found for ID={person_id}")]
    PersonNotFound {
        /// The id that could not be resolved.
        person_id: u64,
    },

    /// An absence record carried an inconsistent combination of values.
    #[error("Invalid absence record {source_id}: {message}")]
    InvalidRecord {
        /// The id of the application or sick note.
        source_id: u64,
        /// A description of what made the record invalid.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Returns true for errors caused by the caller's input rather than by
    /// the engine or its configuration.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidRange { .. }
                | EngineError::InvalidTypeFilter { .. }
                | EngineError::InvalidMonth { .. }
                | EngineError::PersonNotFound { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
