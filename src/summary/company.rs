//! Company drill-down: company, then employees, then periods.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculation::{EmployeeDirectory, classify_margin};
use crate::config::Settings;
use crate::models::{
    CompanyEmployeeBreakdown, CompanyPeriodBreakdown, CompanySummary, Employee,
    EmployeePeriodResult, PayrollRecord, compare_periods,
};

use super::{DerivedRecord, derive_record, mean, total_of};

fn matches_company(employee: &Employee, company: &str) -> bool {
    employee.dispatch_company.trim() == company.trim()
}

/// Groups entries by a key, keeping first-seen key order.
fn group_by<'r, 'a, F>(entries: &'r [DerivedRecord<'a>], key: F) -> Vec<(String, Vec<DerivedRecord<'a>>)>
where
    F: Fn(&DerivedRecord<'a>) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<DerivedRecord<'a>>)> = Vec::new();
    for entry in entries {
        let k = key(entry);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(entry.clone()),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![entry.clone()]));
            }
        }
    }
    groups
}

/// Summarizes everything billed to `company`.
///
/// Employees belong to the company when their `dispatch_company` matches
/// after trimming. Records are attributed through their employee; records
/// whose employee is unknown cannot be attributed and are ignored.
///
/// Always returns a summary. A company with no records has zero totals.
/// Employees whose rate card fails validation are left out of the employee
/// counts and rate averages; their records land in `excluded_records`.
///
/// - `periods` is sorted newest first
/// - `employees` is sorted by total gross profit, highest first, with ties in
///   employee list order; each employee's periods are newest first
pub fn summarize_company(
    records: &[PayrollRecord],
    employees: &[Employee],
    company: &str,
    settings: &Settings,
) -> CompanySummary {
    let directory = EmployeeDirectory::new(employees);

    let mut seen = HashSet::new();
    let company_employees: Vec<&Employee> = employees
        .iter()
        .filter(|e| matches_company(e, company))
        .filter(|e| seen.insert(e.employee_id.trim().to_string()))
        .filter(|e| match e.validate() {
            Ok(()) => true,
            Err(err) => {
                warn!(employee_id = %e.employee_id, error = %err, "Leaving invalid employee out of company summary");
                false
            }
        })
        .collect();

    let mut derived = Vec::new();
    let mut excluded_records = Vec::new();
    for record in records {
        match directory.get(&record.employee_id) {
            Ok(employee) if matches_company(employee, company) => {}
            Ok(_) => continue,
            Err(_) => {
                debug!(employee_id = %record.employee_id, "Record has no known employee");
                continue;
            }
        }
        match derive_record(record, &directory, settings) {
            Ok(entry) => derived.push(entry),
            Err(excluded) => excluded_records.push(excluded),
        }
    }

    let average_margin = mean(derived.iter().map(|e| e.derived.profit_margin));

    let mut periods: Vec<CompanyPeriodBreakdown> = group_by(&derived, |e| e.derived.period.clone())
        .into_iter()
        .map(|(period, entries)| CompanyPeriodBreakdown {
            period,
            record_count: entries.len(),
            total_billing: total_of(&entries, |d| d.billing_amount),
            total_company_cost: total_of(&entries, |d| d.total_company_cost.value),
            total_gross_profit: total_of(&entries, |d| d.gross_profit),
            average_margin: mean(entries.iter().map(|e| e.derived.profit_margin)),
        })
        .collect();
    periods.sort_by(|a, b| compare_periods(&b.period, &a.period));

    let by_employee = group_by(&derived, |e| e.employee.employee_id.trim().to_string());
    let mut employee_breakdowns: Vec<CompanyEmployeeBreakdown> = company_employees
        .iter()
        .map(|employee| {
            let entries = by_employee
                .iter()
                .find(|(id, _)| id == employee.employee_id.trim())
                .map(|(_, entries)| entries.as_slice())
                .unwrap_or(&[]);
            employee_breakdown(employee, entries)
        })
        .collect();
    employee_breakdowns.sort_by(|a, b| b.total_gross_profit.cmp(&a.total_gross_profit));

    CompanySummary {
        company: company.trim().to_string(),
        employee_count: company_employees.len(),
        active_employee_count: company_employees.iter().filter(|e| e.is_active()).count(),
        record_count: derived.len(),
        excluded_records,
        total_billing: total_of(&derived, |d| d.billing_amount),
        total_gross_salary: total_of(&derived, |d| d.gross_salary),
        total_company_cost: total_of(&derived, |d| d.total_company_cost.value),
        total_gross_profit: total_of(&derived, |d| d.gross_profit),
        average_margin,
        average_band: classify_margin(average_margin, settings.target_margin),
        average_hourly_rate: mean(company_employees.iter().map(|e| e.hourly_rate)),
        average_billing_rate: mean(company_employees.iter().map(|e| e.billing_rate)),
        average_profit_per_hour: mean(company_employees.iter().map(|e| e.profit_per_hour())),
        periods,
        employees: employee_breakdowns,
    }
}

fn employee_breakdown(employee: &Employee, entries: &[DerivedRecord<'_>]) -> CompanyEmployeeBreakdown {
    let mut periods: Vec<EmployeePeriodResult> = entries
        .iter()
        .map(|e| EmployeePeriodResult {
            period: e.derived.period.clone(),
            gross_salary: e.derived.gross_salary,
            billing_amount: e.derived.billing_amount,
            billing_source: e.derived.billing.billing_amount.source,
            total_company_cost: e.derived.total_company_cost.value,
            gross_profit: e.derived.gross_profit,
            profit_margin: e.derived.profit_margin,
            margin_band: e.derived.margin_band,
            paid_leave_days: e.derived.paid_leave.paid_leave_days,
        })
        .collect();
    periods.sort_by(|a, b| compare_periods(&b.period, &a.period));

    CompanyEmployeeBreakdown {
        employee_id: employee.employee_id.clone(),
        name: employee.name.clone(),
        hourly_rate: employee.hourly_rate,
        billing_rate: employee.billing_rate,
        profit_per_hour: employee.profit_per_hour(),
        record_count: entries.len(),
        total_billing: total_of(entries, |d| d.billing_amount),
        total_gross_profit: total_of(entries, |d| d.gross_profit),
        average_margin: mean(entries.iter().map(|e| e.derived.profit_margin)),
        periods,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeStatus, MarginBand, ValueSource};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_employee(id: &str, company: &str, hourly: &str, billing: &str) -> Employee {
        Employee {
            employee_id: id.to_string(),
            name: format!("Employee {}", id),
            dispatch_company: company.to_string(),
            hourly_rate: dec(hourly),
            billing_rate: dec(billing),
            status: EmployeeStatus::Active,
        }
    }

    fn create_test_record(id: &str, period: &str, hours: &str) -> PayrollRecord {
        let mut record = PayrollRecord::new(id, period);
        record.work_days = 20;
        record.work_hours = dec(hours);
        record
    }

    fn zero_rate_settings() -> Settings {
        Settings {
            employment_insurance_rate: Decimal::ZERO,
            workers_comp_rate: Decimal::ZERO,
            ..Settings::default()
        }
    }

    fn create_test_data() -> (Vec<Employee>, Vec<PayrollRecord>) {
        let mut inactive = create_test_employee("3", "Toyota", "1200", "1500");
        inactive.status = EmployeeStatus::Inactive;
        let employees = vec![
            create_test_employee("1", "Toyota", "1000", "1500"),
            create_test_employee("2", "Toyota", "1000", "1300"),
            inactive,
            create_test_employee("9", "Honda", "1000", "2000"),
        ];
        let records = vec![
            create_test_record("1", "2025年9月", "100"),
            create_test_record("2", "2025年9月", "100"),
            create_test_record("1", "2025年10月", "100"),
            create_test_record("9", "2025年10月", "100"),
        ];
        (employees, records)
    }

    #[test]
    fn test_company_totals_and_counts() {
        let (employees, records) = create_test_data();
        let summary = summarize_company(&records, &employees, "Toyota", &zero_rate_settings());

        assert_eq!(summary.employee_count, 3);
        assert_eq!(summary.active_employee_count, 2);
        assert_eq!(summary.record_count, 3);
        // 150,000 + 130,000 + 150,000 billed against 100,000 each.
        assert_eq!(summary.total_billing, dec("430000"));
        assert_eq!(summary.total_gross_salary, dec("300000"));
        assert_eq!(summary.total_gross_profit, dec("130000"));
        assert_eq!(summary.average_hourly_rate.round_dp(2), dec("1066.67"));
        assert_eq!(summary.average_billing_rate.round_dp(2), dec("1433.33"));
        assert_eq!(summary.average_profit_per_hour.round_dp(2), dec("366.67"));
        assert_eq!(summary.average_band, MarginBand::OnTarget);
    }

    #[test]
    fn test_periods_are_newest_first() {
        let (employees, records) = create_test_data();
        let summary = summarize_company(&records, &employees, "Toyota", &zero_rate_settings());

        let periods: Vec<_> = summary.periods.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(periods, vec!["2025年10月", "2025年9月"]);
        assert_eq!(summary.periods[1].record_count, 2);
        assert_eq!(summary.periods[1].total_gross_profit, dec("80000"));
    }

    #[test]
    fn test_employee_drill_down() {
        let (employees, records) = create_test_data();
        let summary = summarize_company(&records, &employees, "Toyota", &zero_rate_settings());

        let ids: Vec<_> = summary.employees.iter().map(|e| e.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        let top = &summary.employees[0];
        assert_eq!(top.record_count, 2);
        assert_eq!(top.total_gross_profit, dec("100000"));
        assert_eq!(top.periods[0].period, "2025年10月");
        assert_eq!(top.periods[0].billing_source, ValueSource::Derived);

        let idle = &summary.employees[2];
        assert_eq!(idle.record_count, 0);
        assert!(idle.periods.is_empty());
        assert_eq!(idle.average_margin, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_company_is_zeroed() {
        let (employees, records) = create_test_data();
        let summary = summarize_company(&records, &employees, "Nissan", &Settings::default());

        assert_eq!(summary.employee_count, 0);
        assert_eq!(summary.record_count, 0);
        assert_eq!(summary.total_billing, Decimal::ZERO);
        assert_eq!(summary.average_margin, Decimal::ZERO);
        assert!(summary.periods.is_empty());
    }

    #[test]
    fn test_failing_record_is_excluded() {
        let (employees, mut records) = create_test_data();
        records[1].holiday_hours = dec("-1");

        let summary = summarize_company(&records, &employees, "Toyota", &zero_rate_settings());

        assert_eq!(summary.record_count, 2);
        assert_eq!(summary.excluded_records.len(), 1);
        assert_eq!(summary.excluded_records[0].employee_id, "2");
    }

    #[test]
    fn test_employees_with_rates_beyond_limit_are_left_out() {
        let (mut employees, mut records) = create_test_data();
        let huge = "60000000000000000000000000000";
        employees.push(create_test_employee("4", "Toyota", huge, huge));
        employees.push(create_test_employee("5", "Toyota", huge, huge));
        records.push(create_test_record("4", "2025年10月", "100"));

        let summary = summarize_company(&records, &employees, "Toyota", &zero_rate_settings());

        assert_eq!(summary.employee_count, 3);
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.excluded_records.len(), 1);
        assert_eq!(summary.excluded_records[0].employee_id, "4");
        assert_eq!(summary.average_hourly_rate.round_dp(2), dec("1066.67"));
    }
}
