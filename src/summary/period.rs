//! Monthly summary over one payroll period.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculation::{EmployeeDirectory, classify_margin};
use crate::config::Settings;
use crate::models::{
    BandCounts, Employee, EmployeeProfit, MonthlySummary, PayrollRecord, normalize_period,
    same_period, sort_periods_newest_first,
};

use super::ranking::{bottom_performers, top_performers};
use super::{derive_record, mean, total_of};

/// Summarizes every record in `period`.
///
/// Totals are sums over the derived records. `average_margin` is the mean of
/// each record's own margin, not the margin of the totals.
///
/// Returns `None` when no record matches the period, or when every matching
/// record fails derivation.
///
/// # Examples
///
/// ```
/// use arari_engine::config::Settings;
/// use arari_engine::models::{Employee, EmployeeStatus, PayrollRecord};
/// use arari_engine::summary::summarize_period;
/// use rust_decimal::Decimal;
///
/// let employees = vec![Employee {
///     employee_id: "200101".to_string(),
///     name: "Yamada Taro".to_string(),
///     dispatch_company: "Toyota".to_string(),
///     hourly_rate: Decimal::from(1000),
///     billing_rate: Decimal::from(1500),
///     status: EmployeeStatus::Active,
/// }];
/// let mut record = PayrollRecord::new("200101", "2025年1月");
/// record.work_hours = Decimal::from(160);
///
/// let summary = summarize_period(&[record.clone()], &employees, "2025-01", &Settings::default())
///     .unwrap();
/// assert_eq!(summary.period, "2025年1月");
/// assert_eq!(summary.record_count, 1);
///
/// assert!(summarize_period(&[record], &employees, "2025年2月", &Settings::default()).is_none());
/// ```
pub fn summarize_period(
    records: &[PayrollRecord],
    employees: &[Employee],
    period: &str,
    settings: &Settings,
) -> Option<MonthlySummary> {
    let directory = EmployeeDirectory::new(employees);

    let mut derived = Vec::new();
    let mut excluded_records = Vec::new();
    for record in records.iter().filter(|r| same_period(&r.period, period)) {
        match derive_record(record, &directory, settings) {
            Ok(entry) => derived.push(entry),
            Err(excluded) => excluded_records.push(excluded),
        }
    }

    if derived.is_empty() {
        if excluded_records.is_empty() {
            debug!(period = %period, "No records for period");
        } else {
            warn!(
                period = %period,
                excluded = excluded_records.len(),
                "Every record in period failed derivation"
            );
        }
        return None;
    }

    let mut band_counts = BandCounts::default();
    for entry in &derived {
        band_counts.record(entry.derived.margin_band);
    }

    let average_margin = mean(derived.iter().map(|e| e.derived.profit_margin));

    let profits: Vec<EmployeeProfit> = derived
        .iter()
        .map(|e| EmployeeProfit {
            employee_id: e.employee.employee_id.clone(),
            name: e.employee.name.clone(),
            dispatch_company: e.employee.dispatch_company.clone(),
            billing_amount: e.derived.billing_amount,
            gross_profit: e.derived.gross_profit,
            profit_margin: e.derived.profit_margin,
        })
        .collect();

    Some(MonthlySummary {
        period: normalize_period(period),
        record_count: derived.len(),
        excluded_records,
        total_billing: total_of(&derived, |d| d.billing_amount),
        total_gross_salary: total_of(&derived, |d| d.gross_salary),
        total_company_cost: total_of(&derived, |d| d.total_company_cost.value),
        total_gross_profit: total_of(&derived, |d| d.gross_profit),
        total_paid_leave_hours: total_of(&derived, |d| d.paid_leave.paid_leave_hours),
        total_paid_leave_days: total_of(&derived, |d| d.paid_leave.paid_leave_days),
        average_margin,
        average_band: classify_margin(average_margin, settings.target_margin),
        band_counts,
        top_performers: top_performers(&profits),
        bottom_performers: bottom_performers(&profits),
    })
}

/// Returns the distinct normalized periods in `records`, newest first.
///
/// Tokens that do not parse as a year and month come last, in the order they
/// were first seen.
///
/// ```
/// use arari_engine::models::PayrollRecord;
/// use arari_engine::summary::list_periods;
///
/// let records = vec![
///     PayrollRecord::new("1", "2025年9月"),
///     PayrollRecord::new("2", "2025年10月"),
///     PayrollRecord::new("3", "2025-09"),
/// ];
/// assert_eq!(list_periods(&records), vec!["2025年10月", "2025年9月"]);
/// ```
pub fn list_periods(records: &[PayrollRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut periods: Vec<String> = records
        .iter()
        .map(|r| normalize_period(&r.period))
        .filter(|label| seen.insert(label.clone()))
        .collect();
    sort_periods_newest_first(&mut periods);
    periods
}
