//! Error types for the margin engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while deriving payroll financials.

use thiserror::Error;

/// The main error type for the margin engine.
///
/// Per-record derivation returns this error type. Summaries never do: a record
/// whose derivation fails is excluded and counted instead.
///
/// # Example
///
/// ```
/// use arari_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/settings.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/settings.yaml");
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

    /// A calculation setting is outside its permitted range.
    #[error("Invalid setting '{field}': {message}")]
    InvalidSettings {
        /// The setting that was invalid.
        field: String,
        /// A description of what made the setting invalid.
        message: String,
    },

    /// An employee record was invalid or contained inconsistent data.
    #[error("Invalid employee field '{field}': {message}")]
    InvalidEmployee {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The payroll record belongs to a different employee than the one supplied.
    #[error("Payroll record for '{record_employee_id}' was paired with employee '{employee_id}'")]
    EmployeeMismatch {
        /// The employee id carried by the payroll record.
        record_employee_id: String,
        /// The id of the employee supplied alongside it.
        employee_id: String,
    },

    /// No employee with the given id was supplied.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The employee id that could not be resolved.
        employee_id: String,
    },

    /// A payroll record contained values that cannot be derived from.
    #[error("Invalid payroll record '{employee_id}' ({period}): {message}")]
    InvalidRecord {
        /// The employee id of the record.
        employee_id: String,
        /// The period token of the record.
        period: String,
        /// A description of what made the record invalid.
        message: String,
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
            path: "/missing/settings.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/settings.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_settings_displays_field_and_message() {
        let error = EngineError::InvalidSettings {
            field: "workers_comp_rate".to_string(),
            message: "must not be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid setting 'workers_comp_rate': must not be negative"
        );
    }

    #[test]
    fn test_employee_mismatch_displays_both_ids() {
        let error = EngineError::EmployeeMismatch {
            record_employee_id: "200101".to_string(),
            employee_id: "200102".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Payroll record for '200101' was paired with employee '200102'"
        );
    }

    #[test]
    fn test_invalid_record_displays_id_period_and_message() {
        let error = EngineError::InvalidRecord {
            employee_id: "200101".to_string(),
            period: "2025年1月".to_string(),
            message: "work_hours must not be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid payroll record '200101' (2025年1月): work_hours must not be negative"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::EmployeeNotFound {
                employee_id: "missing".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
