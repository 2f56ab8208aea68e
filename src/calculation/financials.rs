//! Per-record derivation.
//!
//! Runs every calculator for one payroll record in order and assembles the
//! [`DerivedFields`] together with its audit trace.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::Settings;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    normalize_period, AuditStep, AuditTrace, AuditWarning, DerivedFields, Employee,
    PayrollRecord, WarningSeverity,
};

use super::amounts::ensure_within_limit;
use super::billing::calculate_billing;
use super::compensation::calculate_compensation;
use super::employer_cost::calculate_employer_costs;
use super::margin::calculate_margin;
use super::paid_leave::calculate_paid_leave;
use super::rate_card::resolve_rate_card;

/// Derives every financial figure for `record`.
///
/// Steps, in audit order:
///
/// 1. rate card
/// 2. compensation
/// 3. paid leave
/// 4. billing
/// 5. employer cost
/// 6. margin
/// 7. net salary
///
/// The record is not modified. Identical inputs produce identical output.
///
/// # Errors
///
/// - `InvalidEmployee` / `EmployeeMismatch` from rate card resolution
/// - `InvalidRecord` if any hour bucket is negative, or a billed, cost,
///   profit, margin or paid-leave figure exceeds [`AMOUNT_LIMIT`](super::AMOUNT_LIMIT)
/// - `CalculationError` on arithmetic overflow
///
/// # Examples
///
/// ```
/// use arari_engine::calculation::compute_record_financials;
/// use arari_engine::config::Settings;
/// use arari_engine::models::{Employee, EmployeeStatus, MarginBand, PayrollRecord};
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     employee_id: "200101".to_string(),
///     name: "Yamada Taro".to_string(),
///     dispatch_company: "Toyota".to_string(),
///     hourly_rate: Decimal::from(1000),
///     billing_rate: Decimal::from(1500),
///     status: EmployeeStatus::Active,
/// };
/// let mut record = PayrollRecord::new("200101", "2025年1月");
/// record.work_days = 20;
/// record.work_hours = Decimal::from(160);
/// record.overtime_hours = Decimal::from(10);
/// record.deductions.social_insurance = Decimal::from(8000);
/// record.deductions.welfare_pension = Decimal::from(15000);
///
/// let derived = compute_record_financials(&record, &employee, &Settings::default()).unwrap();
/// assert_eq!(derived.gross_salary, Decimal::from(172_500));
/// assert_eq!(derived.billing_amount, Decimal::from(258_750));
/// assert_eq!(derived.gross_profit, Decimal::from(61_179));
/// assert_eq!(derived.margin_band, MarginBand::OnTarget);
/// ```
pub fn compute_record_financials(
    record: &PayrollRecord,
    employee: &Employee,
    settings: &Settings,
) -> EngineResult<DerivedFields> {
    let mut steps: Vec<AuditStep> = Vec::with_capacity(7);
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    let rate_card_result = resolve_rate_card(record, employee, step_number)?;
    let rate_card = rate_card_result.rate_card;
    steps.push(rate_card_result.audit_step);
    warnings.extend(rate_card_result.warnings);
    step_number += 1;

    let compensation_result = calculate_compensation(record, rate_card.hourly_rate, step_number)?;
    let compensation = compensation_result.breakdown;
    steps.push(compensation_result.audit_step);
    step_number += 1;

    let paid_leave_result = calculate_paid_leave(record, rate_card.hourly_rate, step_number)?;
    steps.push(paid_leave_result.audit_step);
    step_number += 1;

    let billing_result = calculate_billing(record, rate_card.billing_rate, step_number)?;
    let billing = billing_result.breakdown;
    steps.push(billing_result.audit_step);
    step_number += 1;

    let gross_salary = compensation.gross_salary;
    let billing_amount = billing.billing_amount.value;

    let employer_cost_result =
        calculate_employer_costs(record, gross_salary, settings, step_number)?;
    let employer_costs = employer_cost_result.costs;
    steps.push(employer_cost_result.audit_step);
    step_number += 1;

    let margin_result = calculate_margin(
        record,
        gross_salary,
        employer_costs.total_benefits,
        billing_amount,
        settings,
        step_number,
    )?;
    steps.push(margin_result.audit_step);
    warnings.extend(margin_result.warnings);
    step_number += 1;

    let total_deductions = record.deductions.total()?;
    let net_salary = gross_salary
        .checked_sub(total_deductions)
        .ok_or_else(|| EngineError::CalculationError {
            message: "net salary overflows".to_string(),
        })?;
    if net_salary < Decimal::ZERO {
        warnings.push(AuditWarning::new(
            "NEGATIVE_NET_SALARY",
            format!(
                "Deductions ¥{} exceed gross salary ¥{}",
                total_deductions.normalize(),
                gross_salary.normalize()
            ),
            WarningSeverity::Medium,
        ));
    }
    steps.push(AuditStep {
        step_number,
        rule_id: "net_salary".to_string(),
        rule_name: "Net Salary".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.to_string(),
            "total_deductions": total_deductions.to_string()
        }),
        output: serde_json::json!({ "net_salary": net_salary.to_string() }),
        reasoning: format!(
            "¥{} gross - ¥{} deductions = ¥{}",
            gross_salary.normalize(),
            total_deductions.normalize(),
            net_salary.normalize()
        ),
    });

    let company_social_insurance = employer_costs.social_insurance()?;
    ensure_within_limit(
        record,
        &[
            ("gross_salary", gross_salary),
            ("billing_amount", billing_amount),
            ("total_company_cost", margin_result.total_company_cost.value),
            ("gross_profit", margin_result.gross_profit),
            ("profit_margin", margin_result.profit_margin),
            ("paid_leave_hours", paid_leave_result.breakdown.paid_leave_hours),
            ("paid_leave_days", paid_leave_result.breakdown.paid_leave_days),
        ],
    )?;

    debug!(
        employee_id = %record.employee_id,
        period = %record.period,
        gross_salary = %gross_salary,
        billing_amount = %billing_amount,
        gross_profit = %margin_result.gross_profit,
        band = ?margin_result.band,
        "Derived record financials"
    );

    Ok(DerivedFields {
        employee_id: record.employee_id.clone(),
        period: normalize_period(&record.period),
        company_social_insurance,
        company_employment_insurance: employer_costs.employment_insurance.value,
        company_workers_comp: employer_costs.workers_comp.value,
        compensation,
        billing,
        employer_costs,
        paid_leave: paid_leave_result.breakdown,
        gross_salary,
        total_deductions,
        net_salary,
        billing_amount,
        total_company_cost: margin_result.total_company_cost,
        gross_profit: margin_result.gross_profit,
        profit_margin: margin_result.profit_margin,
        margin_band: margin_result.band,
        audit_trace: AuditTrace { steps, warnings },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::AMOUNT_LIMIT;
    use crate::models::{EmployeeStatus, MarginBand, ValueSource};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_employee(hourly: &str, billing: &str) -> Employee {
        Employee {
            employee_id: "200101".to_string(),
            name: "Yamada Taro".to_string(),
            dispatch_company: "Toyota".to_string(),
            hourly_rate: dec(hourly),
            billing_rate: dec(billing),
            status: EmployeeStatus::Active,
        }
    }

    fn create_test_record() -> PayrollRecord {
        let mut record = PayrollRecord::new("200101", "2025-01");
        record.work_days = 20;
        record.work_hours = dec("160");
        record.overtime_hours = dec("10");
        record.deductions.social_insurance = dec("8000");
        record.deductions.welfare_pension = dec("15000");
        record
    }

    #[test]
    fn test_worked_example() {
        let employee = create_test_employee("1000", "1500");
        let record = create_test_record();

        let derived = compute_record_financials(&record, &employee, &Settings::default()).unwrap();

        assert_eq!(derived.period, "2025年1月");
        assert_eq!(derived.gross_salary, dec("172500"));
        assert_eq!(derived.billing_amount, dec("258750"));
        assert_eq!(derived.company_social_insurance, dec("23000"));
        assert_eq!(derived.company_employment_insurance, dec("1553"));
        assert_eq!(derived.company_workers_comp, dec("518"));
        assert_eq!(derived.employer_costs.total_benefits, dec("25071"));
        assert_eq!(derived.total_company_cost.value, dec("197571"));
        assert_eq!(derived.gross_profit, dec("61179"));
        assert_eq!(derived.profit_margin.round_dp(2), dec("23.64"));
        assert_eq!(derived.margin_band, MarginBand::OnTarget);
        assert_eq!(derived.net_salary, dec("149500"));
    }

    #[test]
    fn test_audit_trace_is_numbered_in_order() {
        let employee = create_test_employee("1000", "1500");
        let derived =
            compute_record_financials(&create_test_record(), &employee, &Settings::default())
                .unwrap();

        let rule_ids: Vec<&str> = derived
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            rule_ids,
            vec![
                "rate_card",
                "compensation",
                "paid_leave",
                "billing",
                "employer_cost",
                "margin",
                "net_salary"
            ]
        );
        for (i, step) in derived.audit_trace.steps.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }
    }

    #[test]
    fn test_total_cost_is_gross_plus_benefits() {
        let employee = create_test_employee("1234", "1777");
        let mut record = create_test_record();
        record.night_hours = dec("12.5");
        record.holiday_hours = dec("8");
        record.transport_allowance = dec("7000");

        let derived = compute_record_financials(&record, &employee, &Settings::default()).unwrap();

        assert_eq!(
            derived.total_company_cost.value,
            derived.gross_salary + derived.employer_costs.total_benefits
        );
        assert_eq!(
            derived.gross_profit,
            derived.billing_amount - derived.total_company_cost.value
        );
    }

    #[test]
    fn test_is_idempotent() {
        let employee = create_test_employee("1000", "1500");
        let record = create_test_record();

        let first = compute_record_financials(&record, &employee, &Settings::default()).unwrap();
        let second = compute_record_financials(&record, &employee, &Settings::default()).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_zero_billing_rate_gives_zero_margin() {
        let employee = create_test_employee("1000", "0");
        let derived =
            compute_record_financials(&create_test_record(), &employee, &Settings::default())
                .unwrap();

        assert_eq!(derived.billing_amount, Decimal::ZERO);
        assert!(derived.gross_profit < Decimal::ZERO);
        assert_eq!(derived.profit_margin, Decimal::ZERO);
        assert!(derived.audit_trace.has_warning("NEGATIVE_RATE_SPREAD"));
    }

    #[test]
    fn test_negative_net_salary_is_kept_and_warned() {
        let employee = create_test_employee("1000", "1500");
        let mut record = create_test_record();
        record.deductions.rent_deduction = dec("200000");

        let derived = compute_record_financials(&record, &employee, &Settings::default()).unwrap();

        assert!(derived.net_salary < Decimal::ZERO);
        assert!(derived.audit_trace.has_warning("NEGATIVE_NET_SALARY"));
    }

    #[test]
    fn test_stored_values_are_reported_as_stored() {
        let employee = create_test_employee("1000", "1500");
        let mut record = create_test_record();
        record.stored.billing_amount = Some(dec("260000"));
        record.stored.gross_profit = Some(dec("1"));
        record.stored.profit_margin = Some(dec("99"));

        let derived = compute_record_financials(&record, &employee, &Settings::default()).unwrap();

        assert_eq!(derived.billing.billing_amount.source, ValueSource::Stored);
        assert_eq!(derived.billing_amount, dec("260000"));
        // Profit and margin are always derived from the resolved inputs.
        assert_eq!(derived.gross_profit, dec("260000") - dec("197571"));
    }

    #[test]
    fn test_low_margin_is_banded_and_warned() {
        let employee = create_test_employee("1000", "1100");
        let derived =
            compute_record_financials(&create_test_record(), &employee, &Settings::default())
                .unwrap();

        assert_eq!(derived.margin_band, MarginBand::Critical);
        assert!(derived.audit_trace.has_warning("MARGIN_BELOW_TARGET"));
    }

    #[test]
    fn test_negative_hours_fail() {
        let employee = create_test_employee("1000", "1500");
        let mut record = create_test_record();
        record.night_hours = dec("-1");

        assert!(matches!(
            compute_record_financials(&record, &employee, &Settings::default()),
            Err(EngineError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_overflowing_deductions_fail() {
        let employee = create_test_employee("1000", "1500");
        let mut record = create_test_record();
        record.deductions.social_insurance = Decimal::MAX;
        record.deductions.income_tax = dec("1");

        assert!(matches!(
            compute_record_financials(&record, &employee, &Settings::default()),
            Err(EngineError::CalculationError { .. })
        ));
    }

    #[test]
    fn test_stored_figures_beyond_limit_fail() {
        let employee = create_test_employee("1000", "1500");
        let mut record = create_test_record();
        record.stored.billing_amount = Some(dec("60000000000000000000000000000"));
        record.stored.total_company_cost = Some(dec("60000000000000000000000000000"));

        match compute_record_financials(&record, &employee, &Settings::default()) {
            Err(EngineError::InvalidRecord { message, .. }) => {
                assert!(message.starts_with("billing_amount"))
            }
            other => panic!("Expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_figures_at_limit_are_accepted() {
        let employee = create_test_employee("1000", "1500");
        let mut record = create_test_record();
        record.stored.billing_amount = Some(AMOUNT_LIMIT);
        record.stored.total_company_cost = Some(AMOUNT_LIMIT);

        let derived = compute_record_financials(&record, &employee, &Settings::default()).unwrap();
        assert_eq!(derived.gross_profit, Decimal::ZERO);
    }
}
