//! Employee model and related types.
//!
//! This module defines the Employee struct and EmployeeStatus enum for
//! representing dispatched workers and their rate cards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::AMOUNT_LIMIT;
use crate::error::{EngineError, EngineResult};

/// Represents whether an employee is currently on assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Currently dispatched to a client company.
    #[default]
    Active,
    /// No longer dispatched (retired, transferred or on leave of absence).
    Inactive,
}

/// Represents a dispatched worker and their rate card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub employee_id: String,
    /// The employee's display name.
    pub name: String,
    /// The client company the employee is dispatched to.
    pub dispatch_company: String,
    /// Hourly pay rate (cost to the business).
    pub hourly_rate: Decimal,
    /// Hourly billing rate (charged to the client).
    pub billing_rate: Decimal,
    /// Current employment status.
    #[serde(default)]
    pub status: EmployeeStatus,
}

impl Employee {
    /// Returns true if the employee is currently active.
    ///
    /// # Examples
    ///
    /// ```
    /// use arari_engine::models::{Employee, EmployeeStatus};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     employee_id: "200101".to_string(),
    ///     name: "Yamada Taro".to_string(),
    ///     dispatch_company: "Toyota".to_string(),
    ///     hourly_rate: Decimal::from(1000),
    ///     billing_rate: Decimal::from(1500),
    ///     status: EmployeeStatus::Active,
    /// };
    /// assert!(employee.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    /// Returns the billing rate minus the hourly rate. May be negative.
    pub fn profit_per_hour(&self) -> Decimal {
        self.billing_rate - self.hourly_rate
    }

    /// Returns true when the client is billed less per hour than the worker is paid.
    pub fn has_negative_spread(&self) -> bool {
        self.profit_per_hour() < Decimal::ZERO
    }

    /// Checks the rate card invariants.
    ///
    /// Rates must lie in `0..=AMOUNT_LIMIT`. A negative spread is allowed here;
    /// it is reported as an audit warning during calculation instead.
    pub fn validate(&self) -> EngineResult<()> {
        if self.employee_id.trim().is_empty() {
            return Err(EngineError::InvalidEmployee {
                field: "employee_id".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        for (field, rate) in [("hourly_rate", self.hourly_rate), ("billing_rate", self.billing_rate)] {
            if rate < Decimal::ZERO {
                return Err(EngineError::InvalidEmployee {
                    field: field.to_string(),
                    message: format!("{} must not be negative", rate),
                });
            }
            if rate > AMOUNT_LIMIT {
                return Err(EngineError::InvalidEmployee {
                    field: field.to_string(),
                    message: format!("{} exceeds the limit of {}", rate, AMOUNT_LIMIT),
                });
            }
        }
        Ok(())
    }
}
