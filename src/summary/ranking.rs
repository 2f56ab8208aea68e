//! Top and bottom performer ranking.

use crate::models::EmployeeProfit;

/// How many employees each ranking holds.
pub const RANKING_SIZE: usize = 5;

/// The highest gross profits, best first.
///
/// The sort is stable, so ties keep their input order.
pub fn top_performers(entries: &[EmployeeProfit]) -> Vec<EmployeeProfit> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.gross_profit.cmp(&a.gross_profit));
    sorted.truncate(RANKING_SIZE);
    sorted
}

/// The lowest gross profits, worst first.
///
/// The sort is stable, so ties keep their input order.
pub fn bottom_performers(entries: &[EmployeeProfit]) -> Vec<EmployeeProfit> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| a.gross_profit.cmp(&b.gross_profit));
    sorted.truncate(RANKING_SIZE);
    sorted
}
