//! HTTP API module for the margin engine.
//!
//! This module exposes record derivation, period and company summaries,
//! historical recalculation and the settings-update path over JSON.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CompanySummaryRequest, FinancialsRequest, PeriodSummaryRequest, RecalculationRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
