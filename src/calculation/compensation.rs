//! Compensation calculation.
//!
//! Computes each pay component from the record's hour buckets and the
//! employee's hourly rate, then totals gross salary.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{AuditStep, CompensationBreakdown, PayComponent, PayrollRecord, Resolved};

use super::amounts::{bucket_amount, checked_total, hours_for, validate_hours};

/// The result of calculating compensation, including the audit step.
#[derive(Debug, Clone)]
pub struct CompensationResult {
    /// The pay breakdown.
    pub breakdown: CompensationBreakdown,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns the stored payslip amount for `component`, if any.
fn stored_pay(record: &PayrollRecord, component: PayComponent) -> Option<Decimal> {
    match component {
        PayComponent::Base => record.base_salary,
        PayComponent::Overtime => record.overtime_pay,
        PayComponent::OvertimeOver60h => record.overtime_over_60h_pay,
        PayComponent::Night => record.night_pay,
        PayComponent::Holiday => record.holiday_pay,
    }
}

/// Resolves the pay for one component: the payslip amount when present,
/// otherwise `hours × hourly_rate × multiplier`.
pub fn component_pay(
    record: &PayrollRecord,
    component: PayComponent,
    hourly_rate: Decimal,
) -> EngineResult<Resolved> {
    Resolved::resolve(stored_pay(record, component), || {
        bucket_amount(hours_for(record, component), hourly_rate, component.multiplier())
    })
}

/// Calculates every pay component and gross salary for a record.
///
/// Gross salary is always
/// `base + overtime + overtime_over_60h + night + holiday + paid_leave
///  + transport + non_billable_allowances + other_allowances`.
/// Night pay is an additional 0.25 premium on hours that are also counted in
/// the regular or overtime buckets.
///
/// # Errors
///
/// Returns `InvalidRecord` if any hour bucket is negative, or
/// `CalculationError` on overflow.
///
/// # Examples
///
/// ```
/// use arari_engine::calculation::calculate_compensation;
/// use arari_engine::models::PayrollRecord;
/// use rust_decimal::Decimal;
///
/// let mut record = PayrollRecord::new("200101", "2025年1月");
/// record.work_hours = Decimal::from(160);
/// record.overtime_hours = Decimal::from(10);
///
/// let result = calculate_compensation(&record, Decimal::from(1000), 1).unwrap();
/// assert_eq!(result.breakdown.base_pay.value, Decimal::from(160_000));
/// assert_eq!(result.breakdown.overtime_pay.value, Decimal::from(12_500));
/// assert_eq!(result.breakdown.gross_salary, Decimal::from(172_500));
/// ```
pub fn calculate_compensation(
    record: &PayrollRecord,
    hourly_rate: Decimal,
    step_number: u32,
) -> EngineResult<CompensationResult> {
    validate_hours(record)?;

    let base_pay = component_pay(record, PayComponent::Base, hourly_rate)?;
    let overtime_pay = component_pay(record, PayComponent::Overtime, hourly_rate)?;
    let overtime_over_60h_pay = component_pay(record, PayComponent::OvertimeOver60h, hourly_rate)?;
    let night_pay = component_pay(record, PayComponent::Night, hourly_rate)?;
    let holiday_pay = component_pay(record, PayComponent::Holiday, hourly_rate)?;

    let gross_salary = checked_total(&[
        base_pay.value,
        overtime_pay.value,
        overtime_over_60h_pay.value,
        night_pay.value,
        holiday_pay.value,
        record.paid_leave_amount,
        record.transport_allowance,
        record.non_billable_allowances,
        record.other_allowances,
    ])?;

    let breakdown = CompensationBreakdown {
        base_pay,
        overtime_pay,
        overtime_over_60h_pay,
        night_pay,
        holiday_pay,
        paid_leave_amount: record.paid_leave_amount,
        transport_allowance: record.transport_allowance,
        non_billable_allowances: record.non_billable_allowances,
        other_allowances: record.other_allowances,
        gross_salary,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "compensation".to_string(),
        rule_name: "Compensation".to_string(),
        input: serde_json::json!({
            "hourly_rate": hourly_rate.to_string(),
            "work_hours": record.work_hours.to_string(),
            "overtime_hours": record.overtime_hours.to_string(),
            "overtime_over_60h": record.overtime_over_60h.to_string(),
            "night_hours": record.night_hours.to_string(),
            "holiday_hours": record.holiday_hours.to_string(),
            "paid_leave_amount": record.paid_leave_amount.to_string()
        }),
        output: serde_json::to_value(&breakdown).unwrap_or(serde_json::Value::Null),
        reasoning: format!(
            "Gross salary ¥{} from ¥{}/h ({} of 5 pay components taken from the payslip)",
            gross_salary.normalize(),
            hourly_rate.normalize(),
            [
                &breakdown.base_pay,
                &breakdown.overtime_pay,
                &breakdown.overtime_over_60h_pay,
                &breakdown.night_pay,
                &breakdown.holiday_pay,
            ]
            .iter()
            .filter(|r| r.is_stored())
            .count()
        ),
    };

    Ok(CompensationResult {
        breakdown,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::ValueSource;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_record() -> PayrollRecord {
        let mut record = PayrollRecord::new("200101", "2025年1月");
        record.work_days = 20;
        record.work_hours = dec("160");
        record.overtime_hours = dec("10");
        record
    }

    #[test]
    fn test_base_and_overtime_from_hours() {
        let record = create_test_record();
        let result = calculate_compensation(&record, dec("1000"), 2).unwrap();

        assert_eq!(result.breakdown.base_pay, Resolved::derived(dec("160000")));
        assert_eq!(result.breakdown.overtime_pay, Resolved::derived(dec("12500")));
        assert_eq!(result.breakdown.gross_salary, dec("172500"));
        assert_eq!(result.audit_step.step_number, 2);
        assert_eq!(result.audit_step.rule_id, "compensation");
    }

    #[test]
    fn test_every_bucket_uses_its_multiplier() {
        let mut record = create_test_record();
        record.overtime_over_60h = dec("4");
        record.night_hours = dec("8");
        record.holiday_hours = dec("6");

        let result = calculate_compensation(&record, dec("1000"), 1).unwrap();

        assert_eq!(result.breakdown.overtime_over_60h_pay.value, dec("6000"));
        assert_eq!(result.breakdown.night_pay.value, dec("2000"));
        assert_eq!(result.breakdown.holiday_pay.value, dec("8100"));
        assert_eq!(
            result.breakdown.gross_salary,
            dec("160000") + dec("12500") + dec("6000") + dec("2000") + dec("8100")
        );
    }

    #[test]
    fn test_night_premium_stacks_on_regular_hours() {
        // All 8 night hours are also inside the 160 regular hours.
        let mut record = create_test_record();
        record.overtime_hours = Decimal::ZERO;
        record.night_hours = dec("8");

        let result = calculate_compensation(&record, dec("1200"), 1).unwrap();

        assert_eq!(result.breakdown.base_pay.value, dec("192000"));
        assert_eq!(result.breakdown.night_pay.value, dec("2400"));
        assert_eq!(result.breakdown.gross_salary, dec("194400"));
    }

    #[test]
    fn test_gross_includes_leave_and_all_allowances() {
        let mut record = create_test_record();
        record.paid_leave_amount = dec("8000");
        record.transport_allowance = dec("5000");
        record.non_billable_allowances = dec("3000");
        record.other_allowances = dec("2000");

        let result = calculate_compensation(&record, dec("1000"), 1).unwrap();

        assert_eq!(result.breakdown.gross_salary, dec("190500"));
    }

    #[test]
    fn test_stored_payslip_amounts_take_precedence() {
        let mut record = create_test_record();
        record.base_salary = Some(dec("158000"));

        let result = calculate_compensation(&record, dec("1000"), 1).unwrap();

        assert_eq!(result.breakdown.base_pay.source, ValueSource::Stored);
        assert_eq!(result.breakdown.base_pay.value, dec("158000"));
        assert_eq!(result.breakdown.overtime_pay.source, ValueSource::Derived);
        assert_eq!(result.breakdown.gross_salary, dec("170500"));
        assert!(result.audit_step.reasoning.contains("1 of 5"));
    }

    #[test]
    fn test_zero_hourly_rate_gives_zero_derived_pay() {
        let record = create_test_record();
        let result = calculate_compensation(&record, Decimal::ZERO, 1).unwrap();

        assert_eq!(result.breakdown.gross_salary, Decimal::ZERO);
    }

    #[test]
    fn test_negative_hours_are_rejected() {
        let mut record = create_test_record();
        record.overtime_hours = dec("-2");

        assert!(matches!(
            calculate_compensation(&record, dec("1000"), 1),
            Err(EngineError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_component_pay_fractional_hours() {
        let mut record = create_test_record();
        record.overtime_hours = dec("10.5");

        let pay = component_pay(&record, PayComponent::Overtime, dec("1001")).unwrap();
        assert_eq!(pay.value, dec("13138.125"));
    }
}
