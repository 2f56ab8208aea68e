//! Configuration types for margin calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML settings file.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Default target margin in percent.
pub const DEFAULT_TARGET_MARGIN: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// Default employer employment insurance rate (0.9%).
pub const DEFAULT_EMPLOYMENT_INSURANCE_RATE: Decimal = Decimal::from_parts(9, 0, 0, false, 3);

/// Default workers' compensation rate (0.3%).
pub const DEFAULT_WORKERS_COMP_RATE: Decimal = Decimal::from_parts(3, 0, 0, false, 3);

fn default_target_margin() -> Decimal {
    DEFAULT_TARGET_MARGIN
}

fn default_employment_insurance_rate() -> Decimal {
    DEFAULT_EMPLOYMENT_INSURANCE_RATE
}

fn default_workers_comp_rate() -> Decimal {
    DEFAULT_WORKERS_COMP_RATE
}

/// Process-wide calculation settings.
///
/// Every calculation takes these explicitly. Absent keys fall back to the
/// statutory defaults, so an empty document deserializes to
/// [`Settings::default`].
///
/// # Example
///
/// ```
/// use arari_engine::config::Settings;
/// use rust_decimal::Decimal;
///
/// let settings = Settings::default();
/// assert_eq!(settings.target_margin, Decimal::from(15));
/// assert_eq!(settings.employment_insurance_rate, Decimal::new(9, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Target gross margin in percent (e.g. 15 for 15%).
    #[serde(default = "default_target_margin")]
    pub target_margin: Decimal,
    /// Employer share of employment insurance as a fraction of gross salary.
    #[serde(default = "default_employment_insurance_rate")]
    pub employment_insurance_rate: Decimal,
    /// Workers' compensation premium as a fraction of gross salary.
    #[serde(default = "default_workers_comp_rate")]
    pub workers_comp_rate: Decimal,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_margin: DEFAULT_TARGET_MARGIN,
            employment_insurance_rate: DEFAULT_EMPLOYMENT_INSURANCE_RATE,
            workers_comp_rate: DEFAULT_WORKERS_COMP_RATE,
        }
    }
}

impl Settings {
    /// Checks that every setting is within its permitted range.
    ///
    /// Rates must lie in `[0, 1)` and the target margin in `[0, 100]`.
    pub fn validate(&self) -> EngineResult<()> {
        if self.target_margin < Decimal::ZERO || self.target_margin > Decimal::ONE_HUNDRED {
            return Err(EngineError::InvalidSettings {
                field: "target_margin".to_string(),
                message: format!("{} is outside 0..=100", self.target_margin),
            });
        }

        for (field, rate) in [
            ("employment_insurance_rate", self.employment_insurance_rate),
            ("workers_comp_rate", self.workers_comp_rate),
        ] {
            if rate < Decimal::ZERO {
                return Err(EngineError::InvalidSettings {
                    field: field.to_string(),
                    message: "must not be negative".to_string(),
                });
            }
            if rate >= Decimal::ONE {
                return Err(EngineError::InvalidSettings {
                    field: field.to_string(),
                    message: format!("{} is a fraction and must be below 1", rate),
                });
            }
        }

        Ok(())
    }
}

fn default_bind_address() -> String {
    "127.0.0.1:8000".to_string()
}

/// HTTP server configuration for the binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the API listens on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Top-level structure of `settings.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Calculation settings.
    #[serde(default)]
    pub settings: Settings,
    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
}
