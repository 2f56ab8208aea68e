//! Derived financial models.
//!
//! This module contains the [`DerivedFields`] type produced for each payroll
//! record and the breakdown structures behind it. Fields that may arrive
//! precomputed from ingestion are carried as [`Resolved`] values so the source
//! of every figure is auditable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::amounts::checked_total;
use crate::error::EngineResult;

use super::AuditTrace;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// Taken verbatim from the ingested record.
    Stored,
    /// Computed by the engine.
    Derived,
}

/// A value together with its [`ValueSource`].
///
/// # Example
///
/// ```
/// use arari_engine::models::{Resolved, ValueSource};
/// use rust_decimal::Decimal;
///
/// let stored = Resolved::resolve(Some(Decimal::from(518)), || Ok(Decimal::from(517))).unwrap();
/// assert_eq!(stored.source, ValueSource::Stored);
/// assert_eq!(stored.value, Decimal::from(518));
///
/// let derived = Resolved::resolve(None, || Ok(Decimal::from(517))).unwrap();
/// assert_eq!(derived.source, ValueSource::Derived);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolved {
    /// Where the value came from.
    pub source: ValueSource,
    /// The value.
    pub value: Decimal,
}

impl Resolved {
    /// A value taken from the record.
    pub fn stored(value: Decimal) -> Self {
        Self {
            source: ValueSource::Stored,
            value,
        }
    }

    /// A value computed by the engine.
    pub fn derived(value: Decimal) -> Self {
        Self {
            source: ValueSource::Derived,
            value,
        }
    }

    /// Uses `stored` when present, otherwise runs `derive`.
    ///
    /// `derive` is not called when a stored value exists.
    pub fn resolve<F>(stored: Option<Decimal>, derive: F) -> EngineResult<Self>
    where
        F: FnOnce() -> EngineResult<Decimal>,
    {
        match stored {
            Some(value) => Ok(Self::stored(value)),
            None => derive().map(Self::derived),
        }
    }

    /// Returns true if the value came from the record.
    pub fn is_stored(&self) -> bool {
        self.source == ValueSource::Stored
    }
}

/// An hour bucket on the payslip and its premium multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayComponent {
    /// Regular hours.
    Base,
    /// Overtime up to 60 hours in the month.
    Overtime,
    /// Overtime beyond 60 hours in the month.
    OvertimeOver60h,
    /// Late-night premium, paid on top of the bucket the hours also fall in.
    Night,
    /// Statutory holiday hours.
    Holiday,
}

impl PayComponent {
    /// All components in payslip order.
    pub const ALL: [PayComponent; 5] = [
        PayComponent::Base,
        PayComponent::Overtime,
        PayComponent::OvertimeOver60h,
        PayComponent::Night,
        PayComponent::Holiday,
    ];

    /// Returns the rate multiplier for this bucket.
    ///
    /// | bucket | multiplier |
    /// |---|---|
    /// | base | 1.0 |
    /// | overtime (≤60h) | 1.25 |
    /// | overtime (>60h) | 1.5 |
    /// | night | 0.25 (additive premium) |
    /// | holiday | 1.35 |
    pub fn multiplier(self) -> Decimal {
        match self {
            PayComponent::Base => Decimal::ONE,
            PayComponent::Overtime => Decimal::new(125, 2),
            PayComponent::OvertimeOver60h => Decimal::new(15, 1),
            PayComponent::Night => Decimal::new(25, 2),
            PayComponent::Holiday => Decimal::new(135, 2),
        }
    }

    /// Returns the snake_case name used in audit output.
    pub fn as_str(self) -> &'static str {
        match self {
            PayComponent::Base => "base",
            PayComponent::Overtime => "overtime",
            PayComponent::OvertimeOver60h => "overtime_over_60h",
            PayComponent::Night => "night",
            PayComponent::Holiday => "holiday",
        }
    }
}

/// What the worker is paid, component by component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationBreakdown {
    /// Regular pay.
    pub base_pay: Resolved,
    /// Overtime pay up to 60 hours.
    pub overtime_pay: Resolved,
    /// Overtime pay beyond 60 hours.
    pub overtime_over_60h_pay: Resolved,
    /// Late-night premium.
    pub night_pay: Resolved,
    /// Holiday pay.
    pub holiday_pay: Resolved,
    /// Paid leave amount.
    pub paid_leave_amount: Decimal,
    /// Commuting allowance.
    pub transport_allowance: Decimal,
    /// Allowances absorbed by the company.
    pub non_billable_allowances: Decimal,
    /// Allowances passed through to the client.
    pub other_allowances: Decimal,
    /// Sum of all of the above.
    pub gross_salary: Decimal,
}

/// What the client is billed, bucket by bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingBreakdown {
    /// Regular hours billed.
    pub base: Decimal,
    /// Overtime up to 60 hours billed.
    pub overtime: Decimal,
    /// Overtime beyond 60 hours billed.
    pub overtime_over_60h: Decimal,
    /// Late-night premium billed.
    pub night: Decimal,
    /// Holiday hours billed.
    pub holiday: Decimal,
    /// Allowances passed through at cost.
    pub billable_allowances: Decimal,
    /// Total billed. Stored when ingestion supplied it.
    pub billing_amount: Resolved,
}

/// Employer-side statutory contributions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerCosts {
    /// Employer share of health insurance.
    pub health_insurance: Resolved,
    /// Employer share of welfare pension.
    pub welfare_pension: Resolved,
    /// Employer share of employment insurance.
    pub employment_insurance: Resolved,
    /// Workers' compensation premium.
    pub workers_comp: Resolved,
    /// Sum of the four contributions.
    pub total_benefits: Decimal,
}

impl EmployerCosts {
    /// Health insurance plus welfare pension.
    ///
    /// # Errors
    ///
    /// Returns `CalculationError` if the sum overflows.
    pub fn social_insurance(&self) -> EngineResult<Decimal> {
        checked_total(&[self.health_insurance.value, self.welfare_pension.value])
    }
}

/// Paid leave expressed as hours and days for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidLeaveBreakdown {
    /// Average hours per attended day. 8 when no days were recorded.
    pub daily_work_hours: Decimal,
    /// Paid leave amount divided by the hourly rate.
    pub paid_leave_hours: Decimal,
    /// Paid leave hours in days, rounded to the nearest half day.
    pub paid_leave_days: Decimal,
}

/// Performance band of a margin relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginBand {
    /// At or above target.
    OnTarget,
    /// Within 3 points below target.
    NearTarget,
    /// Between 3 and 7 points below target.
    Warning,
    /// More than 7 points below target.
    Critical,
}

/// Every derived figure for one payroll record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFields {
    /// The employee the record belongs to.
    pub employee_id: String,
    /// Normalized period label.
    pub period: String,
    /// Pay breakdown.
    pub compensation: CompensationBreakdown,
    /// Billing breakdown.
    pub billing: BillingBreakdown,
    /// Employer contribution breakdown.
    pub employer_costs: EmployerCosts,
    /// Paid leave in hours and days.
    pub paid_leave: PaidLeaveBreakdown,
    /// Total pay before deductions.
    pub gross_salary: Decimal,
    /// Sum of employee deductions.
    pub total_deductions: Decimal,
    /// Gross salary minus deductions. Negative when deductions exceed gross.
    pub net_salary: Decimal,
    /// Total billed to the client.
    pub billing_amount: Decimal,
    /// Employer health insurance plus welfare pension.
    pub company_social_insurance: Decimal,
    /// Employer employment insurance.
    pub company_employment_insurance: Decimal,
    /// Workers' compensation premium.
    pub company_workers_comp: Decimal,
    /// Gross salary plus employer contributions.
    pub total_company_cost: Resolved,
    /// Billing amount minus total company cost.
    pub gross_profit: Decimal,
    /// Gross profit as a percentage of billing. 0 when nothing was billed.
    pub profit_margin: Decimal,
    /// Band of the margin against the target.
    pub margin_band: MarginBand,
    /// Calculation steps and warnings.
    pub audit_trace: AuditTrace,
}
