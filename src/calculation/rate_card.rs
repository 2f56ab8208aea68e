//! Rate card resolution.
//!
//! This module pairs a payroll record with the employee it belongs to and
//! exposes the employee's pay rate, billing rate and company affiliation.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning, Employee, PayrollRecord, WarningSeverity};

/// An employee's rates as used by the calculators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateCard {
    /// The employee id.
    pub employee_id: String,
    /// The client company.
    pub dispatch_company: String,
    /// Hourly pay rate.
    pub hourly_rate: Decimal,
    /// Hourly billing rate.
    pub billing_rate: Decimal,
    /// Billing rate minus hourly rate.
    pub profit_per_hour: Decimal,
}

/// The result of resolving a rate card, including the audit step.
#[derive(Debug, Clone)]
pub struct RateCardResult {
    /// The resolved rate card.
    pub rate_card: RateCard,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
    /// Warnings raised while resolving.
    pub warnings: Vec<AuditWarning>,
}

/// Resolves the rate card for `record` from `employee`.
///
/// # Errors
///
/// - `InvalidEmployee` if the employee has an empty id or a negative rate
/// - `EmployeeMismatch` if the record belongs to a different employee
///
/// A billing rate below the hourly rate is not an error; it produces a
/// `NEGATIVE_RATE_SPREAD` warning.
///
/// # Examples
///
/// ```
/// use arari_engine::calculation::resolve_rate_card;
/// use arari_engine::models::{Employee, EmployeeStatus, PayrollRecord};
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
/// let record = PayrollRecord::new("200101", "2025年1月");
///
/// let result = resolve_rate_card(&record, &employee, 1).unwrap();
/// assert_eq!(result.rate_card.profit_per_hour, Decimal::from(500));
/// ```
pub fn resolve_rate_card(
    record: &PayrollRecord,
    employee: &Employee,
    step_number: u32,
) -> EngineResult<RateCardResult> {
    employee.validate()?;

    if record.employee_id.trim() != employee.employee_id.trim() {
        return Err(EngineError::EmployeeMismatch {
            record_employee_id: record.employee_id.clone(),
            employee_id: employee.employee_id.clone(),
        });
    }

    let rate_card = RateCard {
        employee_id: employee.employee_id.clone(),
        dispatch_company: employee.dispatch_company.clone(),
        hourly_rate: employee.hourly_rate,
        billing_rate: employee.billing_rate,
        profit_per_hour: employee.profit_per_hour(),
    };

    let mut warnings = Vec::new();
    if employee.has_negative_spread() {
        warnings.push(AuditWarning::new(
            "NEGATIVE_RATE_SPREAD",
            format!(
                "Billing rate {} is below hourly rate {} for employee {}",
                employee.billing_rate, employee.hourly_rate, employee.employee_id
            ),
            WarningSeverity::High,
        ));
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "rate_card".to_string(),
        rule_name: "Rate Card Resolution".to_string(),
        input: serde_json::json!({
            "employee_id": employee.employee_id,
            "period": record.period
        }),
        output: serde_json::json!({
            "hourly_rate": rate_card.hourly_rate.to_string(),
            "billing_rate": rate_card.billing_rate.to_string(),
            "profit_per_hour": rate_card.profit_per_hour.to_string(),
            "dispatch_company": rate_card.dispatch_company
        }),
        reasoning: format!(
            "Billing ¥{} - pay ¥{} = ¥{} per hour",
            rate_card.billing_rate, rate_card.hourly_rate, rate_card.profit_per_hour
        ),
    };

    Ok(RateCardResult {
        rate_card,
        audit_step,
        warnings,
    })
}

/// Employees indexed by id.
///
/// Built once per summary so records can be paired with their employee.
/// When the same id appears twice the first entry wins.
#[derive(Debug, Clone)]
pub struct EmployeeDirectory<'a> {
    by_id: HashMap<&'a str, &'a Employee>,
}

impl<'a> EmployeeDirectory<'a> {
    /// Indexes `employees` by trimmed id.
    pub fn new(employees: &'a [Employee]) -> Self {
        let mut by_id = HashMap::with_capacity(employees.len());
        for employee in employees {
            let id = employee.employee_id.trim();
            if by_id.contains_key(id) {
                warn!(employee_id = %id, "Duplicate employee id, keeping first entry");
                continue;
            }
            by_id.insert(id, employee);
        }
        Self { by_id }
    }

    /// Looks up an employee by id.
    pub fn get(&self, employee_id: &str) -> EngineResult<&'a Employee> {
        self.by_id
            .get(employee_id.trim())
            .copied()
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })
    }

    /// Number of distinct employees.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if no employees were indexed.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
