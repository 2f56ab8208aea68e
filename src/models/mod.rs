//! Core data models for the margin engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit;
mod employee;
mod financials;
mod payroll_record;
mod period;
mod summary;

pub use audit::{AuditStep, AuditTrace, AuditWarning, WarningSeverity};
pub use employee::{Employee, EmployeeStatus};
pub use financials::{
    BillingBreakdown, CompensationBreakdown, DerivedFields, EmployerCosts, MarginBand,
    PaidLeaveBreakdown, PayComponent, Resolved, ValueSource,
};
pub use payroll_record::{Deductions, PayrollRecord, StoredFinancials};
pub use period::{Period, compare_periods, normalize_period, same_period, sort_periods_newest_first};
pub use summary::{
    BandCounts, CompanyEmployeeBreakdown, CompanyPeriodBreakdown, CompanySummary,
    EmployeePeriodResult, EmployeeProfit, ExcludedRecord, MonthlySummary,
};
