//! Margin engine.
//!
//! Combines billing, gross salary and employer contributions into gross
//! profit, margin percentage and a band relative to the target margin.

use rust_decimal::Decimal;

use crate::config::Settings;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditWarning, MarginBand, PayrollRecord, Resolved, WarningSeverity,
};

use super::amounts::checked_total;

/// Width of the near-target band below the target, in points.
pub const NEAR_TARGET_WIDTH: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

/// Distance below target where the warning band ends, in points.
pub const WARNING_WIDTH: Decimal = Decimal::from_parts(7, 0, 0, false, 0);

/// The result of the margin calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct MarginResult {
    /// Gross salary plus employer contributions.
    pub total_company_cost: Resolved,
    /// Billing amount minus total company cost.
    pub gross_profit: Decimal,
    /// Gross profit as a percentage of billing.
    pub profit_margin: Decimal,
    /// Band against the target.
    pub band: MarginBand,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Warnings raised by this calculation.
    pub warnings: Vec<AuditWarning>,
}

/// Returns `gross_profit / billing_amount × 100`, or 0 when nothing was billed.
///
/// ```
/// use arari_engine::calculation::calculate_profit_margin;
/// use rust_decimal::Decimal;
///
/// assert_eq!(
///     calculate_profit_margin(Decimal::from(25), Decimal::from(100)).unwrap(),
///     Decimal::from(25)
/// );
/// assert_eq!(
///     calculate_profit_margin(Decimal::from(-500), Decimal::ZERO).unwrap(),
///     Decimal::ZERO
/// );
/// ```
pub fn calculate_profit_margin(gross_profit: Decimal, billing_amount: Decimal) -> EngineResult<Decimal> {
    if billing_amount.is_zero() {
        return Ok(Decimal::ZERO);
    }

    gross_profit
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|v| v.checked_div(billing_amount))
        .ok_or_else(|| EngineError::CalculationError {
            message: format!(
                "margin of {} over {} overflows",
                gross_profit, billing_amount
            ),
        })
}

/// Places `margin` in a band relative to `target`.
///
/// Lower bounds are inclusive:
///
/// | margin | band |
/// |---|---|
/// | ≥ target | on target |
/// | [target − 3, target) | near target |
/// | [target − 7, target − 3) | warning |
/// | < target − 7 | critical |
///
/// ```
/// use arari_engine::calculation::classify_margin;
/// use arari_engine::models::MarginBand;
/// use rust_decimal::Decimal;
///
/// let target = Decimal::from(15);
/// assert_eq!(classify_margin(Decimal::from(15), target), MarginBand::OnTarget);
/// assert_eq!(classify_margin(Decimal::from(12), target), MarginBand::NearTarget);
/// assert_eq!(classify_margin(Decimal::from(8), target), MarginBand::Warning);
/// assert_eq!(classify_margin(Decimal::new(79, 1), target), MarginBand::Critical);
/// ```
pub fn classify_margin(margin: Decimal, target: Decimal) -> MarginBand {
    if margin >= target {
        MarginBand::OnTarget
    } else if margin >= target - NEAR_TARGET_WIDTH {
        MarginBand::NearTarget
    } else if margin >= target - WARNING_WIDTH {
        MarginBand::Warning
    } else {
        MarginBand::Critical
    }
}

/// Calculates total company cost, gross profit, margin and band.
///
/// `total_company_cost` is taken from the record when stored, otherwise it is
/// `gross_salary + total_benefits`. Gross profit and margin are always derived.
/// A band of warning or critical adds a `MARGIN_BELOW_TARGET` warning.
pub fn calculate_margin(
    record: &PayrollRecord,
    gross_salary: Decimal,
    total_benefits: Decimal,
    billing_amount: Decimal,
    settings: &Settings,
    step_number: u32,
) -> EngineResult<MarginResult> {
    let total_company_cost = Resolved::resolve(record.stored.total_company_cost, || {
        checked_total(&[gross_salary, total_benefits])
    })?;

    let gross_profit = billing_amount
        .checked_sub(total_company_cost.value)
        .ok_or_else(|| EngineError::CalculationError {
            message: "gross profit overflows".to_string(),
        })?;
    let profit_margin = calculate_profit_margin(gross_profit, billing_amount)?;
    let band = classify_margin(profit_margin, settings.target_margin);

    let mut warnings = Vec::new();
    if matches!(band, MarginBand::Warning | MarginBand::Critical) {
        let severity = if band == MarginBand::Critical {
            WarningSeverity::High
        } else {
            WarningSeverity::Medium
        };
        warnings.push(AuditWarning::new(
            "MARGIN_BELOW_TARGET",
            format!(
                "Margin {}% is more than {} points below the {}% target",
                profit_margin.round_dp(2),
                NEAR_TARGET_WIDTH,
                settings.target_margin.normalize()
            ),
            severity,
        ));
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "margin".to_string(),
        rule_name: "Gross Profit and Margin".to_string(),
        input: serde_json::json!({
            "billing_amount": billing_amount.to_string(),
            "gross_salary": gross_salary.to_string(),
            "total_benefits": total_benefits.to_string(),
            "target_margin": settings.target_margin.to_string()
        }),
        output: serde_json::json!({
            "total_company_cost": total_company_cost,
            "gross_profit": gross_profit.to_string(),
            "profit_margin": profit_margin.to_string(),
            "band": band
        }),
        reasoning: format!(
            "¥{} billed - ¥{} cost = ¥{} ({}%)",
            billing_amount.normalize(),
            total_company_cost.value.normalize(),
            gross_profit.normalize(),
            profit_margin.round_dp(2)
        ),
    };

    Ok(MarginResult {
        total_company_cost,
        gross_profit,
        profit_margin,
        band,
        audit_step,
        warnings,
    })
}
