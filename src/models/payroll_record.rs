//! Payroll record model.
//!
//! A [`PayrollRecord`] is one employee's payslip for one period, as supplied by
//! the ingestion layer. Amount fields the payslip may already carry are
//! optional; when absent the engine derives them from hours and rates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::amounts::checked_total;
use crate::error::EngineResult;

/// Employee-side deductions withheld from gross salary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deductions {
    /// Health insurance premium (employee share).
    pub social_insurance: Decimal,
    /// Welfare pension premium (employee share).
    pub welfare_pension: Decimal,
    /// Employment insurance premium (employee share).
    pub employment_insurance: Decimal,
    /// Withheld income tax.
    pub income_tax: Decimal,
    /// Withheld resident tax.
    pub resident_tax: Decimal,
    /// Company housing rent.
    pub rent_deduction: Decimal,
    /// Utilities for company housing.
    pub utilities_deduction: Decimal,
    /// Meals provided by the company.
    pub meal_deduction: Decimal,
    /// Advance payments recovered this period.
    pub advance_payment: Decimal,
    /// Year-end tax adjustment. Negative when it is a refund.
    pub year_end_adjustment: Decimal,
    /// Anything not covered above.
    pub other_deductions: Decimal,
}

impl Deductions {
    /// Returns the sum of all deductions.
    ///
    /// # Errors
    ///
    /// Returns `CalculationError` if the sum overflows.
    pub fn total(&self) -> EngineResult<Decimal> {
        checked_total(&[
            self.social_insurance,
            self.welfare_pension,
            self.employment_insurance,
            self.income_tax,
            self.resident_tax,
            self.rent_deduction,
            self.utilities_deduction,
            self.meal_deduction,
            self.advance_payment,
            self.year_end_adjustment,
            self.other_deductions,
        ])
    }
}

/// Derived values that an upstream system may have persisted already.
///
/// The employer-cost, billing and total-cost fields are trusted as overrides
/// when present. `gross_profit` and `profit_margin` are the previously persisted
/// results; they are only compared against during recalculation and never
/// trusted as inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredFinancials {
    /// Amount billed to the client.
    pub billing_amount: Option<Decimal>,
    /// Employer share of health insurance.
    pub company_health_insurance: Option<Decimal>,
    /// Employer share of welfare pension.
    pub company_welfare_pension: Option<Decimal>,
    /// Employer share of employment insurance.
    pub company_employment_insurance: Option<Decimal>,
    /// Workers' compensation premium.
    pub company_workers_comp: Option<Decimal>,
    /// Gross salary plus all employer contributions.
    pub total_company_cost: Option<Decimal>,
    /// Previously persisted gross profit.
    pub gross_profit: Option<Decimal>,
    /// Previously persisted profit margin in percent.
    pub profit_margin: Option<Decimal>,
}

/// One employee's payroll for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// The employee this record belongs to.
    pub employee_id: String,
    /// Year-month token, e.g. "2025年10月".
    pub period: String,

    /// Days attended.
    #[serde(default)]
    pub work_days: u32,
    /// Regular hours worked.
    #[serde(default)]
    pub work_hours: Decimal,
    /// Overtime hours up to the 60 hour monthly threshold.
    #[serde(default)]
    pub overtime_hours: Decimal,
    /// Overtime hours beyond 60 in the month.
    #[serde(default)]
    pub overtime_over_60h: Decimal,
    /// Late-night hours. These also sit in a regular or overtime bucket.
    #[serde(default)]
    pub night_hours: Decimal,
    /// Statutory holiday hours.
    #[serde(default)]
    pub holiday_hours: Decimal,

    /// Paid leave paid out this period, as a currency amount.
    #[serde(default)]
    pub paid_leave_amount: Decimal,

    /// Base pay as printed on the payslip.
    #[serde(default)]
    pub base_salary: Option<Decimal>,
    /// Overtime pay (up to 60 hours) as printed on the payslip.
    #[serde(default)]
    pub overtime_pay: Option<Decimal>,
    /// Overtime pay beyond 60 hours as printed on the payslip.
    #[serde(default)]
    pub overtime_over_60h_pay: Option<Decimal>,
    /// Late-night premium as printed on the payslip.
    #[serde(default)]
    pub night_pay: Option<Decimal>,
    /// Holiday pay as printed on the payslip.
    #[serde(default)]
    pub holiday_pay: Option<Decimal>,

    /// Commuting allowance. Absorbed by the company.
    #[serde(default)]
    pub transport_allowance: Decimal,
    /// Allowances the company absorbs.
    #[serde(default)]
    pub non_billable_allowances: Decimal,
    /// Allowances passed through to the client at cost.
    #[serde(default)]
    pub other_allowances: Decimal,

    /// Employee-side deductions.
    #[serde(default)]
    pub deductions: Deductions,

    /// Values persisted by an upstream system.
    #[serde(default)]
    pub stored: StoredFinancials,
}

impl PayrollRecord {
    /// Creates a record with only identity fields set and everything else zero or absent.
    ///
    /// # Example
    ///
    /// ```
    /// use arari_engine::models::PayrollRecord;
    /// use rust_decimal::Decimal;
    ///
    /// let mut record = PayrollRecord::new("200101", "2025年1月");
    /// record.work_hours = Decimal::from(160);
    /// assert_eq!(record.work_days, 0);
    /// assert!(record.base_salary.is_none());
    /// ```
    pub fn new(employee_id: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            period: period.into(),
            work_days: 0,
            work_hours: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            overtime_over_60h: Decimal::ZERO,
            night_hours: Decimal::ZERO,
            holiday_hours: Decimal::ZERO,
            paid_leave_amount: Decimal::ZERO,
            base_salary: None,
            overtime_pay: None,
            overtime_over_60h_pay: None,
            night_pay: None,
            holiday_pay: None,
            transport_allowance: Decimal::ZERO,
            non_billable_allowances: Decimal::ZERO,
            other_allowances: Decimal::ZERO,
            deductions: Deductions::default(),
            stored: StoredFinancials::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let json = r#"{"employee_id": "200101", "period": "2025年1月"}"#;
        let record: PayrollRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record, PayrollRecord::new("200101", "2025年1月"));
    }

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "employee_id": "200101",
            "period": "2025年10月",
            "work_days": 20,
            "work_hours": "160",
            "overtime_hours": "10.5",
            "night_hours": 4,
            "paid_leave_amount": "8000",
            "base_salary": "160000",
            "transport_allowance": "5000",
            "deductions": {"social_insurance": "8000", "welfare_pension": "15000"},
            "stored": {"company_workers_comp": "518"}
        }"#;
        let record: PayrollRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.work_days, 20);
        assert_eq!(record.overtime_hours, dec("10.5"));
        assert_eq!(record.night_hours, dec("4"));
        assert_eq!(record.base_salary, Some(dec("160000")));
        assert_eq!(record.overtime_pay, None);
        assert_eq!(record.deductions.welfare_pension, dec("15000"));
        assert_eq!(record.deductions.income_tax, Decimal::ZERO);
        assert_eq!(record.stored.company_workers_comp, Some(dec("518")));
        assert_eq!(record.stored.billing_amount, None);
    }

    #[test]
    fn test_deductions_total_includes_every_field() {
        let deductions = Deductions {
            social_insurance: dec("8000"),
            welfare_pension: dec("15000"),
            employment_insurance: dec("1000"),
            income_tax: dec("3000"),
            resident_tax: dec("6000"),
            rent_deduction: dec("30000"),
            utilities_deduction: dec("5000"),
            meal_deduction: dec("2000"),
            advance_payment: dec("10000"),
            year_end_adjustment: dec("-2500"),
            other_deductions: dec("500"),
        };

        assert_eq!(deductions.total().unwrap(), dec("78000"));
    }

    #[test]
    fn test_deductions_total_overflow_is_an_error() {
        let deductions = Deductions {
            social_insurance: Decimal::MAX,
            income_tax: dec("1"),
            ..Deductions::default()
        };

        assert!(matches!(
            deductions.total(),
            Err(crate::error::EngineError::CalculationError { .. })
        ));
    }
}
