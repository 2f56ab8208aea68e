//! Request types for the margin engine API.

use serde::{Deserialize, Serialize};

use crate::models::{Employee, PayrollRecord};

/// Request body for `POST /financials`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialsRequest {
    /// The payroll record to derive.
    pub record: PayrollRecord,
    /// The employee the record belongs to.
    pub employee: Employee,
}

/// Request body for `POST /summary/period`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSummaryRequest {
    /// All known payroll records.
    pub records: Vec<PayrollRecord>,
    /// All known employees.
    pub employees: Vec<Employee>,
    /// The period token to summarize, e.g. "2025年1月".
    pub period: String,
}

/// Request body for `POST /summary/company`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySummaryRequest {
    /// All known payroll records.
    pub records: Vec<PayrollRecord>,
    /// All known employees.
    pub employees: Vec<Employee>,
    /// The dispatch company to summarize.
    pub company: String,
}

/// Request body for `POST /recalculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecalculationRequest {
    /// Stored payroll records to recompute.
    pub records: Vec<PayrollRecord>,
    /// All known employees.
    pub employees: Vec<Employee>,
}
