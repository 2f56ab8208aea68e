//! Historical margin recalculation.
//!
//! Recomputes employer costs, profit and margin for previously stored records
//! using the current settings and reports which records moved. Nothing is
//! written back; callers decide what to persist from the report.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Settings;
use crate::models::{Employee, ExcludedRecord, PayrollRecord, StoredFinancials};

use super::financials::compute_record_financials;
use super::rate_card::EmployeeDirectory;

/// Profit movement, in yen, above which a record counts as changed.
pub const PROFIT_CHANGE_THRESHOLD: Decimal = Decimal::ONE;

/// Margin movement, in points, above which a record counts as changed.
pub const MARGIN_CHANGE_THRESHOLD: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// A record whose recomputed figures differ from the stored ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecalculationChange {
    /// The employee id.
    pub employee_id: String,
    /// Normalized period label.
    pub period: String,
    /// Previously stored gross profit (0 when none was stored).
    pub old_gross_profit: Decimal,
    /// Recomputed gross profit.
    pub new_gross_profit: Decimal,
    /// Previously stored margin (0 when none was stored).
    pub old_profit_margin: Decimal,
    /// Recomputed margin.
    pub new_profit_margin: Decimal,
    /// Recomputed employer health insurance plus welfare pension.
    pub company_social_insurance: Decimal,
    /// Recomputed employer employment insurance.
    pub company_employment_insurance: Decimal,
    /// Recomputed workers' compensation premium.
    pub company_workers_comp: Decimal,
    /// Recomputed total company cost.
    pub total_company_cost: Decimal,
}

/// Outcome of [`recalculate_records`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecalculationReport {
    /// Records examined.
    pub total_records: usize,
    /// Records whose figures moved past a threshold.
    pub updated: usize,
    /// Records within both thresholds.
    pub unchanged: usize,
    /// Records skipped because nothing was billed.
    pub skipped: usize,
    /// Records that could not be recomputed.
    pub failed: Vec<ExcludedRecord>,
    /// Details of every updated record, in input order.
    pub changes: Vec<RecalculationChange>,
}

/// Drops stored employer-side figures so they are rebuilt from `settings`.
///
/// Payslip amounts and the stored billing amount are kept.
fn without_stored_costs(record: &PayrollRecord) -> PayrollRecord {
    let mut record = record.clone();
    record.stored = StoredFinancials {
        billing_amount: record.stored.billing_amount,
        gross_profit: record.stored.gross_profit,
        profit_margin: record.stored.profit_margin,
        ..StoredFinancials::default()
    };
    record
}

/// Returns true when `new` differs from `old` by more than `threshold`.
///
/// A difference too large to represent has certainly moved.
fn moved(new: Decimal, old: Decimal, threshold: Decimal) -> bool {
    new.checked_sub(old).is_none_or(|difference| difference.abs() > threshold)
}

/// Recomputes every record against `settings` and compares with the stored
/// `gross_profit` and `profit_margin`.
///
/// Stored employer contributions and total company cost are ignored so the
/// current rates apply. A record is changed when profit moves by more than
/// [`PROFIT_CHANGE_THRESHOLD`] or margin by more than
/// [`MARGIN_CHANGE_THRESHOLD`]. Records with a zero billing amount are skipped.
pub fn recalculate_records(
    records: &[PayrollRecord],
    employees: &[Employee],
    settings: &Settings,
) -> RecalculationReport {
    let directory = EmployeeDirectory::new(employees);
    let mut report = RecalculationReport {
        total_records: records.len(),
        ..RecalculationReport::default()
    };

    for record in records {
        let derived = directory
            .get(&record.employee_id)
            .and_then(|employee| {
                compute_record_financials(&without_stored_costs(record), employee, settings)
            });
        let derived = match derived {
            Ok(derived) => derived,
            Err(err) => {
                warn!(
                    employee_id = %record.employee_id,
                    period = %record.period,
                    error = %err,
                    "Record could not be recalculated"
                );
                report.failed.push(ExcludedRecord {
                    employee_id: record.employee_id.clone(),
                    period: record.period.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
        };

        if derived.billing_amount.is_zero() {
            report.skipped += 1;
            continue;
        }

        let old_gross_profit = record.stored.gross_profit.unwrap_or(Decimal::ZERO);
        let old_profit_margin = record.stored.profit_margin.unwrap_or(Decimal::ZERO);
        let profit_moved = moved(derived.gross_profit, old_gross_profit, PROFIT_CHANGE_THRESHOLD);
        let margin_moved = moved(derived.profit_margin, old_profit_margin, MARGIN_CHANGE_THRESHOLD);

        if !(profit_moved || margin_moved) {
            report.unchanged += 1;
            continue;
        }

        report.updated += 1;
        report.changes.push(RecalculationChange {
            employee_id: derived.employee_id,
            period: derived.period,
            old_gross_profit,
            new_gross_profit: derived.gross_profit,
            old_profit_margin,
            new_profit_margin: derived.profit_margin,
            company_social_insurance: derived.company_social_insurance,
            company_employment_insurance: derived.company_employment_insurance,
            company_workers_comp: derived.company_workers_comp,
            total_company_cost: derived.total_company_cost.value,
        });
    }

    info!(
        total = report.total_records,
        updated = report.updated,
        unchanged = report.unchanged,
        skipped = report.skipped,
        failed = report.failed.len(),
        "Recalculation finished"
    );

    report
}
