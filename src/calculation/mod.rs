//! Calculation logic for the margin engine.
//!
//! This module contains the per-record calculators: rate card resolution,
//! compensation, paid leave back-calculation, client billing, employer
//! contributions and the margin engine. [`compute_record_financials`] runs
//! them in order for one record, and [`recalculate_records`] reruns them over
//! stored history.

pub(crate) mod amounts;
mod billing;
mod compensation;
mod employer_cost;
mod financials;
mod margin;
mod paid_leave;
mod rate_card;
mod recalculation;

pub use amounts::AMOUNT_LIMIT;
pub use billing::{BillingResult, calculate_billing};
pub use compensation::{CompensationResult, calculate_compensation, component_pay};
pub use employer_cost::{EmployerCostResult, calculate_employer_costs};
pub use financials::compute_record_financials;
pub use margin::{
    MarginResult, NEAR_TARGET_WIDTH, WARNING_WIDTH, calculate_margin, calculate_profit_margin,
    classify_margin,
};
pub use paid_leave::{DEFAULT_DAILY_WORK_HOURS, PaidLeaveResult, calculate_paid_leave};
pub use rate_card::{EmployeeDirectory, RateCard, RateCardResult, resolve_rate_card};
pub use recalculation::{
    MARGIN_CHANGE_THRESHOLD, PROFIT_CHANGE_THRESHOLD, RecalculationChange, RecalculationReport,
    recalculate_records,
};
