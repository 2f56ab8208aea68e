//! Summary models.
//!
//! Summaries are recomputed on demand from payroll records and employees and
//! are never a source of truth.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{MarginBand, ValueSource};

/// One employee's result in a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfit {
    /// Employee id.
    pub employee_id: String,
    /// Employee name.
    pub name: String,
    /// Client company.
    pub dispatch_company: String,
    /// Billed amount.
    pub billing_amount: Decimal,
    /// Gross profit.
    pub gross_profit: Decimal,
    /// Profit margin in percent.
    pub profit_margin: Decimal,
}

/// Number of records in each margin band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandCounts {
    /// Records at or above target.
    pub on_target: usize,
    /// Records within 3 points of target.
    pub near_target: usize,
    /// Records 3 to 7 points below target.
    pub warning: usize,
    /// Records more than 7 points below target.
    pub critical: usize,
}

impl BandCounts {
    /// Counts one more record in `band`.
    pub fn record(&mut self, band: MarginBand) {
        match band {
            MarginBand::OnTarget => self.on_target += 1,
            MarginBand::NearTarget => self.near_target += 1,
            MarginBand::Warning => self.warning += 1,
            MarginBand::Critical => self.critical += 1,
        }
    }

    /// Total records counted.
    pub fn total(&self) -> usize {
        self.on_target + self.near_target + self.warning + self.critical
    }
}

/// A record that could not be derived and was left out of a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedRecord {
    /// Employee id of the record.
    pub employee_id: String,
    /// Period token of the record.
    pub period: String,
    /// Why the record was excluded.
    pub reason: String,
}

/// Totals for one period across all companies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Normalized period label.
    pub period: String,
    /// Records included in the totals.
    pub record_count: usize,
    /// Records that matched the period but could not be derived.
    pub excluded_records: Vec<ExcludedRecord>,
    /// Sum of billing amounts.
    pub total_billing: Decimal,
    /// Sum of gross salaries.
    pub total_gross_salary: Decimal,
    /// Sum of total company costs.
    pub total_company_cost: Decimal,
    /// Sum of gross profits.
    pub total_gross_profit: Decimal,
    /// Sum of paid leave hours.
    pub total_paid_leave_hours: Decimal,
    /// Sum of paid leave days.
    pub total_paid_leave_days: Decimal,
    /// Mean of per-record margins.
    pub average_margin: Decimal,
    /// Band of the average margin.
    pub average_band: MarginBand,
    /// Records per band.
    pub band_counts: BandCounts,
    /// Up to five records with the highest gross profit.
    pub top_performers: Vec<EmployeeProfit>,
    /// Up to five records with the lowest gross profit.
    pub bottom_performers: Vec<EmployeeProfit>,
}

/// One period within a company drill-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyPeriodBreakdown {
    /// Normalized period label.
    pub period: String,
    /// Records in this period.
    pub record_count: usize,
    /// Sum of billing amounts.
    pub total_billing: Decimal,
    /// Sum of total company costs.
    pub total_company_cost: Decimal,
    /// Sum of gross profits.
    pub total_gross_profit: Decimal,
    /// Mean of per-record margins.
    pub average_margin: Decimal,
}

/// One employee within a company drill-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyEmployeeBreakdown {
    /// Employee id.
    pub employee_id: String,
    /// Employee name.
    pub name: String,
    /// Hourly pay rate.
    pub hourly_rate: Decimal,
    /// Hourly billing rate.
    pub billing_rate: Decimal,
    /// Billing rate minus hourly rate.
    pub profit_per_hour: Decimal,
    /// Records for this employee.
    pub record_count: usize,
    /// Sum of billing amounts.
    pub total_billing: Decimal,
    /// Sum of gross profits.
    pub total_gross_profit: Decimal,
    /// Mean of per-record margins.
    pub average_margin: Decimal,
    /// Derived values for each of the employee's records, newest period first.
    pub periods: Vec<EmployeePeriodResult>,
}

/// One record in an employee drill-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePeriodResult {
    /// Normalized period label.
    pub period: String,
    /// Gross salary.
    pub gross_salary: Decimal,
    /// Billing amount.
    pub billing_amount: Decimal,
    /// Whether the billing amount was stored or derived.
    pub billing_source: ValueSource,
    /// Total company cost.
    pub total_company_cost: Decimal,
    /// Gross profit.
    pub gross_profit: Decimal,
    /// Profit margin in percent.
    pub profit_margin: Decimal,
    /// Margin band.
    pub margin_band: MarginBand,
    /// Paid leave days.
    pub paid_leave_days: Decimal,
}

/// Totals and drill-down for one client company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySummary {
    /// Company name.
    pub company: String,
    /// Employees dispatched to the company.
    pub employee_count: usize,
    /// Of those, employees currently active.
    pub active_employee_count: usize,
    /// Records included in the totals.
    pub record_count: usize,
    /// Records that could not be derived.
    pub excluded_records: Vec<ExcludedRecord>,
    /// Sum of billing amounts.
    pub total_billing: Decimal,
    /// Sum of gross salaries.
    pub total_gross_salary: Decimal,
    /// Sum of total company costs.
    pub total_company_cost: Decimal,
    /// Sum of gross profits.
    pub total_gross_profit: Decimal,
    /// Mean of per-record margins. 0 when there are no records.
    pub average_margin: Decimal,
    /// Band of the average margin.
    pub average_band: MarginBand,
    /// Mean hourly pay rate of the company's employees.
    pub average_hourly_rate: Decimal,
    /// Mean billing rate of the company's employees.
    pub average_billing_rate: Decimal,
    /// Mean billing-minus-pay spread of the company's employees.
    pub average_profit_per_hour: Decimal,
    /// Per-period totals, newest first.
    pub periods: Vec<CompanyPeriodBreakdown>,
    /// Per-employee totals, highest gross profit first.
    pub employees: Vec<CompanyEmployeeBreakdown>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_counts_record_and_total() {
        let mut counts = BandCounts::default();
        counts.record(MarginBand::OnTarget);
        counts.record(MarginBand::OnTarget);
        counts.record(MarginBand::Critical);

        assert_eq!(counts.on_target, 2);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.near_target, 0);
        assert_eq!(counts.total(), 3);
    }
}
