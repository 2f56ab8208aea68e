//! Payroll margin engine for staffing dispatch.
//!
//! This crate turns payroll records and employee rate cards into billing
//! amounts, statutory employer costs, gross profit and margin, and rolls the
//! results up into period and company summaries.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod summary;
