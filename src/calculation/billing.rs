//! Billing calculation.
//!
//! Mirrors the compensation buckets using the client billing rate. Billable
//! "other allowances" pass through at cost; transport and non-billable
//! allowances are absorbed by the company and never billed.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{AuditStep, BillingBreakdown, PayComponent, PayrollRecord, Resolved};

use super::amounts::{bucket_amount, checked_total, hours_for};

/// The result of calculating billing, including the audit step.
#[derive(Debug, Clone)]
pub struct BillingResult {
    /// The billing breakdown.
    pub breakdown: BillingBreakdown,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the amount billed to the client for a record.
///
/// Each hour bucket is billed at `hours × billing_rate × multiplier` with the
/// same multipliers as pay. Billable other allowances are added unscaled. A
/// billing amount stored on the record takes precedence over the computed sum;
/// the per-bucket lines are still reported.
///
/// # Examples
///
/// ```
/// use arari_engine::calculation::calculate_billing;
/// use arari_engine::models::PayrollRecord;
/// use rust_decimal::Decimal;
///
/// let mut record = PayrollRecord::new("200101", "2025年1月");
/// record.work_hours = Decimal::from(160);
/// record.overtime_hours = Decimal::from(10);
///
/// let result = calculate_billing(&record, Decimal::from(1500), 3).unwrap();
/// assert_eq!(result.breakdown.billing_amount.value, Decimal::from(258_750));
/// ```
pub fn calculate_billing(
    record: &PayrollRecord,
    billing_rate: Decimal,
    step_number: u32,
) -> EngineResult<BillingResult> {
    let bill = |component: PayComponent| {
        bucket_amount(hours_for(record, component), billing_rate, component.multiplier())
    };

    let base = bill(PayComponent::Base)?;
    let overtime = bill(PayComponent::Overtime)?;
    let overtime_over_60h = bill(PayComponent::OvertimeOver60h)?;
    let night = bill(PayComponent::Night)?;
    let holiday = bill(PayComponent::Holiday)?;
    let billable_allowances = record.other_allowances;

    let billing_amount = Resolved::resolve(record.stored.billing_amount, || {
        checked_total(&[
            base,
            overtime,
            overtime_over_60h,
            night,
            holiday,
            billable_allowances,
        ])
    })?;

    let breakdown = BillingBreakdown {
        base,
        overtime,
        overtime_over_60h,
        night,
        holiday,
        billable_allowances,
        billing_amount,
    };

    let reasoning = if billing_amount.is_stored() {
        format!(
            "Using stored billing amount ¥{} instead of computed lines",
            billing_amount.value.normalize()
        )
    } else {
        format!(
            "Billed ¥{} at ¥{}/h including ¥{} pass-through allowances",
            billing_amount.value.normalize(),
            billing_rate.normalize(),
            billable_allowances.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "billing".to_string(),
        rule_name: "Client Billing".to_string(),
        input: serde_json::json!({
            "billing_rate": billing_rate.to_string(),
            "other_allowances": record.other_allowances.to_string(),
            "stored_billing_amount": record.stored.billing_amount.map(|v| v.to_string())
        }),
        output: serde_json::to_value(&breakdown).unwrap_or(serde_json::Value::Null),
        reasoning,
    };

    Ok(BillingResult {
        breakdown,
        audit_step,
    })
}
