//! Employer cost calculation.
//!
//! Derives the employer's statutory contributions. Health insurance and
//! welfare pension are split 50/50 with the employee, so the employer share
//! mirrors the employee deduction. Employment insurance and workers'
//! compensation are configured fractions of gross salary, rounded to the yen.

use rust_decimal::Decimal;

use crate::config::Settings;
use crate::error::EngineResult;
use crate::models::{AuditStep, EmployerCosts, PayrollRecord, Resolved};

use super::amounts::{checked_total, round_yen};

/// The result of calculating employer costs, including the audit step.
#[derive(Debug, Clone)]
pub struct EmployerCostResult {
    /// The contribution breakdown.
    pub costs: EmployerCosts,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

fn rate_of(gross_salary: Decimal, rate: Decimal) -> EngineResult<Decimal> {
    gross_salary
        .checked_mul(rate)
        .map(round_yen)
        .ok_or_else(|| crate::error::EngineError::CalculationError {
            message: format!("gross salary {} x rate {} overflows", gross_salary, rate),
        })
}

/// Calculates employer-side contributions for a record.
///
/// | contribution | rule |
/// |---|---|
/// | health insurance | = employee `social_insurance` |
/// | welfare pension | = employee `welfare_pension` |
/// | employment insurance | round(gross × `employment_insurance_rate`) |
/// | workers' comp | round(gross × `workers_comp_rate`) |
///
/// Each contribution stored on the record is used as-is instead.
///
/// # Examples
///
/// ```
/// use arari_engine::calculation::calculate_employer_costs;
/// use arari_engine::config::Settings;
/// use arari_engine::models::PayrollRecord;
/// use rust_decimal::Decimal;
///
/// let mut record = PayrollRecord::new("200101", "2025年1月");
/// record.deductions.social_insurance = Decimal::from(8000);
/// record.deductions.welfare_pension = Decimal::from(15000);
///
/// let result =
///     calculate_employer_costs(&record, Decimal::from(172_500), &Settings::default(), 4).unwrap();
/// assert_eq!(result.costs.employment_insurance.value, Decimal::from(1553));
/// assert_eq!(result.costs.workers_comp.value, Decimal::from(518));
/// assert_eq!(result.costs.total_benefits, Decimal::from(25_071));
/// ```
pub fn calculate_employer_costs(
    record: &PayrollRecord,
    gross_salary: Decimal,
    settings: &Settings,
    step_number: u32,
) -> EngineResult<EmployerCostResult> {
    let stored = &record.stored;

    let health_insurance = Resolved::resolve(stored.company_health_insurance, || {
        Ok(record.deductions.social_insurance)
    })?;
    let welfare_pension = Resolved::resolve(stored.company_welfare_pension, || {
        Ok(record.deductions.welfare_pension)
    })?;
    let employment_insurance = Resolved::resolve(stored.company_employment_insurance, || {
        rate_of(gross_salary, settings.employment_insurance_rate)
    })?;
    let workers_comp = Resolved::resolve(stored.company_workers_comp, || {
        rate_of(gross_salary, settings.workers_comp_rate)
    })?;

    let total_benefits = checked_total(&[
        health_insurance.value,
        welfare_pension.value,
        employment_insurance.value,
        workers_comp.value,
    ])?;

    let costs = EmployerCosts {
        health_insurance,
        welfare_pension,
        employment_insurance,
        workers_comp,
        total_benefits,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "employer_cost".to_string(),
        rule_name: "Employer Statutory Contributions".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.to_string(),
            "social_insurance": record.deductions.social_insurance.to_string(),
            "welfare_pension": record.deductions.welfare_pension.to_string(),
            "employment_insurance_rate": settings.employment_insurance_rate.to_string(),
            "workers_comp_rate": settings.workers_comp_rate.to_string()
        }),
        output: serde_json::to_value(&costs).unwrap_or(serde_json::Value::Null),
        reasoning: format!(
            "¥{} health + ¥{} pension + ¥{} employment + ¥{} workers' comp = ¥{}",
            costs.health_insurance.value.normalize(),
            costs.welfare_pension.value.normalize(),
            costs.employment_insurance.value.normalize(),
            costs.workers_comp.value.normalize(),
            total_benefits.normalize()
        ),
    };

    Ok(EmployerCostResult { costs, audit_step })
}
