//! Period and company summaries.
//!
//! Summaries are recomputed on demand from records and employees. A record
//! whose derivation fails is left out and listed in `excluded_records`; it
//! never aborts the rest of the summary.

mod company;
mod period;
mod ranking;

pub use company::summarize_company;
pub use period::{list_periods, summarize_period};
pub use ranking::{RANKING_SIZE, bottom_performers, top_performers};

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculation::{AMOUNT_LIMIT, EmployeeDirectory, compute_record_financials};
use crate::config::Settings;
use crate::models::{DerivedFields, Employee, ExcludedRecord, PayrollRecord};

/// A record paired with its employee and derived figures.
#[derive(Debug, Clone)]
pub(crate) struct DerivedRecord<'a> {
    pub(crate) employee: &'a Employee,
    pub(crate) derived: DerivedFields,
}

/// Derives one record, turning a failure into an [`ExcludedRecord`].
pub(crate) fn derive_record<'a>(
    record: &PayrollRecord,
    directory: &EmployeeDirectory<'a>,
    settings: &Settings,
) -> Result<DerivedRecord<'a>, ExcludedRecord> {
    let result = directory.get(&record.employee_id).and_then(|employee| {
        compute_record_financials(record, employee, settings)
            .map(|derived| DerivedRecord { employee, derived })
    });

    result.map_err(|err| {
        warn!(
            employee_id = %record.employee_id,
            period = %record.period,
            error = %err,
            "Excluding record from summary"
        );
        ExcludedRecord {
            employee_id: record.employee_id.clone(),
            period: record.period.clone(),
            reason: err.to_string(),
        }
    })
}

/// Sums one derived figure across `entries`.
///
/// Derivation bounds every summed figure by [`AMOUNT_LIMIT`], so the sum
/// cannot overflow.
pub(crate) fn total_of<F>(entries: &[DerivedRecord<'_>], field: F) -> Decimal
where
    F: Fn(&DerivedFields) -> Decimal,
{
    entries.iter().map(|e| field(&e.derived)).sum()
}

/// Arithmetic mean, or 0 for no values.
///
/// Callers pass margins of derived records or rates of validated employees,
/// all bounded by [`AMOUNT_LIMIT`].
pub(crate) fn mean<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    let mut count: u64 = 0;
    let mut total = Decimal::ZERO;
    for value in values {
        total += value;
        count += 1;
    }
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}
