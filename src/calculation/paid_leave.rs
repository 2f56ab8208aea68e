//! Paid leave back-calculation.
//!
//! Paid leave arrives as a currency amount. For reporting it is converted back
//! into hours (via the hourly rate) and days (via the employee's average daily
//! hours in the period).

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, PaidLeaveBreakdown, PayrollRecord};

/// Daily hours assumed when a record has no attended days.
pub const DEFAULT_DAILY_WORK_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// The result of the paid leave back-calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct PaidLeaveResult {
    /// Paid leave in hours and days.
    pub breakdown: PaidLeaveBreakdown,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

fn division_error(what: &str) -> EngineError {
    EngineError::CalculationError {
        message: format!("{} overflows", what),
    }
}

/// Rounds a day count to the nearest half day.
fn round_half_day(days: Decimal) -> EngineResult<Decimal> {
    let doubled = days
        .checked_mul(Decimal::TWO)
        .ok_or_else(|| division_error("paid leave days"))?;
    Ok(doubled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) / Decimal::TWO)
}

/// Converts the record's paid leave amount into hours and days.
///
/// - `daily_work_hours = work_hours / work_days`, or 8 when `work_days` is 0
/// - `paid_leave_hours = paid_leave_amount / hourly_rate`, or 0 when the rate is 0
/// - `paid_leave_days = round(paid_leave_hours / daily_work_hours × 2) / 2`,
///   or 0 when `daily_work_hours` is 0
///
/// Both divisions are guarded, so a zero rate or an empty period yields zeros
/// rather than an error.
///
/// # Examples
///
/// ```
/// use arari_engine::calculation::calculate_paid_leave;
/// use arari_engine::models::PayrollRecord;
/// use rust_decimal::Decimal;
///
/// let mut record = PayrollRecord::new("200101", "2025年1月");
/// record.work_days = 20;
/// record.work_hours = Decimal::from(160);
/// record.paid_leave_amount = Decimal::from(12_000);
///
/// let result = calculate_paid_leave(&record, Decimal::from(1000), 1).unwrap();
/// assert_eq!(result.breakdown.paid_leave_hours, Decimal::from(12));
/// assert_eq!(result.breakdown.paid_leave_days, Decimal::new(15, 1));
/// ```
pub fn calculate_paid_leave(
    record: &PayrollRecord,
    hourly_rate: Decimal,
    step_number: u32,
) -> EngineResult<PaidLeaveResult> {
    let daily_work_hours = if record.work_days == 0 {
        DEFAULT_DAILY_WORK_HOURS
    } else {
        record
            .work_hours
            .checked_div(Decimal::from(record.work_days))
            .ok_or_else(|| division_error("daily work hours"))?
    };

    let paid_leave_hours = if hourly_rate.is_zero() {
        Decimal::ZERO
    } else {
        record
            .paid_leave_amount
            .checked_div(hourly_rate)
            .ok_or_else(|| division_error("paid leave hours"))?
    };

    let paid_leave_days = if daily_work_hours.is_zero() {
        Decimal::ZERO
    } else {
        let days = paid_leave_hours
            .checked_div(daily_work_hours)
            .ok_or_else(|| division_error("paid leave days"))?;
        round_half_day(days)?
    };

    let breakdown = PaidLeaveBreakdown {
        daily_work_hours,
        paid_leave_hours,
        paid_leave_days,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "paid_leave".to_string(),
        rule_name: "Paid Leave Back-calculation".to_string(),
        input: serde_json::json!({
            "paid_leave_amount": record.paid_leave_amount.to_string(),
            "hourly_rate": hourly_rate.to_string(),
            "work_days": record.work_days,
            "work_hours": record.work_hours.to_string()
        }),
        output: serde_json::json!({
            "daily_work_hours": daily_work_hours.normalize().to_string(),
            "paid_leave_hours": paid_leave_hours.normalize().to_string(),
            "paid_leave_days": paid_leave_days.normalize().to_string()
        }),
        reasoning: format!(
            "¥{} / ¥{}/h = {}h, over {}h days = {} days",
            record.paid_leave_amount.normalize(),
            hourly_rate.normalize(),
            paid_leave_hours.normalize(),
            daily_work_hours.normalize(),
            paid_leave_days.normalize()
        ),
    };

    Ok(PaidLeaveResult {
        breakdown,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_record(work_days: u32, work_hours: &str, amount: &str) -> PayrollRecord {
        let mut record = PayrollRecord::new("200101", "2025年1月");
        record.work_days = work_days;
        record.work_hours = dec(work_hours);
        record.paid_leave_amount = dec(amount);
        record
    }

    #[test]
    fn test_one_full_day() {
        let record = create_test_record(20, "160", "8000");
        let result = calculate_paid_leave(&record, dec("1000"), 1).unwrap();

        assert_eq!(result.breakdown.daily_work_hours, dec("8"));
        assert_eq!(result.breakdown.paid_leave_hours, dec("8"));
        assert_eq!(result.breakdown.paid_leave_days, dec("1"));
    }

    #[test]
    fn test_rounds_to_nearest_half_day() {
        // 10h over 8h days = 1.25 days -> 1.5
        let record = create_test_record(20, "160", "10000");
        let result = calculate_paid_leave(&record, dec("1000"), 1).unwrap();
        assert_eq!(result.breakdown.paid_leave_days, dec("1.5"));

        // 9h over 8h days = 1.125 days -> 1.0
        let record = create_test_record(20, "160", "9000");
        let result = calculate_paid_leave(&record, dec("1000"), 1).unwrap();
        assert_eq!(result.breakdown.paid_leave_days, dec("1"));
    }

    #[test]
    fn test_uses_actual_daily_hours() {
        // 7.5h days: 15h of leave is exactly 2 days.
        let record = create_test_record(20, "150", "15000");
        let result = calculate_paid_leave(&record, dec("1000"), 1).unwrap();

        assert_eq!(result.breakdown.daily_work_hours, dec("7.5"));
        assert_eq!(result.breakdown.paid_leave_days, dec("2"));
    }

    #[test]
    fn test_zero_work_days_defaults_to_eight_hours() {
        let record = create_test_record(0, "0", "16000");
        let result = calculate_paid_leave(&record, dec("1000"), 1).unwrap();

        assert_eq!(result.breakdown.daily_work_hours, dec("8"));
        assert_eq!(result.breakdown.paid_leave_days, dec("2"));
    }

    #[test]
    fn test_zero_hourly_rate_gives_zero_hours_and_days() {
        let record = create_test_record(20, "160", "16000");
        let result = calculate_paid_leave(&record, Decimal::ZERO, 1).unwrap();

        assert_eq!(result.breakdown.paid_leave_hours, Decimal::ZERO);
        assert_eq!(result.breakdown.paid_leave_days, Decimal::ZERO);
    }

    #[test]
    fn test_days_without_hours_gives_zero_days() {
        let record = create_test_record(5, "0", "16000");
        let result = calculate_paid_leave(&record, dec("1000"), 1).unwrap();

        assert_eq!(result.breakdown.daily_work_hours, Decimal::ZERO);
        assert_eq!(result.breakdown.paid_leave_hours, dec("16"));
        assert_eq!(result.breakdown.paid_leave_days, Decimal::ZERO);
    }

    #[test]
    fn test_is_idempotent() {
        let record = create_test_record(21, "163.5", "11111");
        let first = calculate_paid_leave(&record, dec("1234"), 1).unwrap();
        let second = calculate_paid_leave(&record, dec("1234"), 1).unwrap();

        assert_eq!(first.breakdown, second.breakdown);
        assert_eq!(first.audit_step, second.audit_step);
    }
}
