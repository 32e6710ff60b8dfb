//! Error types for the Attendance Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can abort an attendance resolution.
//! Row-level problems (a malformed punch, an unparsable schedule time) are
//! not errors: they are logged and skipped by the stage that finds them.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Attendance Engine.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::InvalidDate {
///     field: "start_date".to_string(),
///     value: "2025-13-01".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid date for 'start_date': '2025-13-01' (expected YYYY-MM-DD)"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
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

    /// Configuration parsed but holds a value the engine cannot work with.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The offending configuration key.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A request date was not a valid ISO `YYYY-MM-DD` calendar date.
    #[error("Invalid date for '{field}': '{value}' (expected YYYY-MM-DD)")]
    InvalidDate {
        /// The request field holding the date.
        field: String,
        /// The rejected input.
        value: String,
    },

    /// The requested end date is before the start date.
    #[error("Invalid date range: end date {end} is before start date {start}")]
    InvalidDateRange {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
    },

    /// No punches were found anywhere in the requested range.
    #[error("No attendance data found between {start} and {end}")]
    NoAttendanceData {
        /// First date of the range.
        start: NaiveDate,
        /// Last date of the range.
        end: NaiveDate,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/engine.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/engine.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_config_displays_field_and_message() {
        let error = EngineError::InvalidConfig {
            field: "slots.capacity".to_string(),
            message: "must be at least 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value 'slots.capacity': must be at least 1"
        );
    }

    #[test]
    fn test_invalid_date_range_displays_both_dates() {
        let error = EngineError::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid date range: end date 2025-06-01 is before start date 2025-06-10"
        );
    }

    #[test]
    fn test_no_attendance_data_displays_range() {
        let error = EngineError::NoAttendanceData {
            start: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "No attendance data found between 2025-06-01 and 2025-06-30"
        );
    }

    #[test]
    fn test_calculation_error_displays_message() {
        let error = EngineError::CalculationError {
            message: "slot capacity exhausted".to_string(),
        };
        assert_eq!(error.to_string(), "Calculation error: slot capacity exhausted");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_date() -> EngineResult<()> {
            Err(EngineError::InvalidDate {
                field: "end_date".to_string(),
                value: "tomorrow".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_date()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
