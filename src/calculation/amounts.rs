//! Checked arithmetic shared by the calculators.
//!
//! Every multiplication and sum on the per-record path goes through these
//! helpers so that an overflow fails the one record instead of panicking.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};
use crate::models::{PayComponent, PayrollRecord};

/// Largest magnitude a rate or any derived figure of one record may take.
///
/// Sums of up to 7.9e10 such values stay inside `Decimal`'s range, so the
/// summaries can total them without overflow.
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

/// Returns `hours × rate × multiplier`.
pub(crate) fn bucket_amount(hours: Decimal, rate: Decimal, multiplier: Decimal) -> EngineResult<Decimal> {
    hours
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(multiplier))
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("{} hours x {} x {} overflows", hours, rate, multiplier),
        })
}

/// Sums `values`, failing on overflow.
pub(crate) fn checked_total(values: &[Decimal]) -> EngineResult<Decimal> {
    values.iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(*v).ok_or_else(|| EngineError::CalculationError {
            message: "sum overflows".to_string(),
        })
    })
}

/// Rejects the record if any named figure exceeds [`AMOUNT_LIMIT`] in magnitude.
pub(crate) fn ensure_within_limit(record: &PayrollRecord, figures: &[(&str, Decimal)]) -> EngineResult<()> {
    match figures.iter().find(|(_, value)| value.abs() > AMOUNT_LIMIT) {
        Some((name, value)) => Err(EngineError::InvalidRecord {
            employee_id: record.employee_id.clone(),
            period: record.period.clone(),
            message: format!("{} of {} exceeds the limit of {}", name, value, AMOUNT_LIMIT),
        }),
        None => Ok(()),
    }
}

/// Rounds to a whole yen, halves away from zero.
pub(crate) fn round_yen(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the hours the record carries for `component`.
pub(crate) fn hours_for(record: &PayrollRecord, component: PayComponent) -> Decimal {
    match component {
        PayComponent::Base => record.work_hours,
        PayComponent::Overtime => record.overtime_hours,
        PayComponent::OvertimeOver60h => record.overtime_over_60h,
        PayComponent::Night => record.night_hours,
        PayComponent::Holiday => record.holiday_hours,
    }
}

/// Rejects records with negative hours in any bucket.
pub(crate) fn validate_hours(record: &PayrollRecord) -> EngineResult<()> {
    for component in PayComponent::ALL {
        let hours = hours_for(record, component);
        if hours < Decimal::ZERO {
            return Err(EngineError::InvalidRecord {
                employee_id: record.employee_id.clone(),
                period: record.period.clone(),
                message: format!("{} hours must not be negative ({})", component.as_str(), hours),
            });
        }
    }
    Ok(())
}
