//! Payroll period tokens.
//!
//! Periods arrive as free text ("2025年10月", "2025年1月分(2月17日支給)",
//! "2025-10"). [`Period::parse`] is the single place that turns such a token
//! into a numeric year and month; every sort and filter goes through it.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Year, then either `年` month `月` or a `-`, `/` or `.` separated month.
static PERIOD_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9])([0-9]{4})(?:年([0-9]{1,2})月|[-/.]([0-9]{1,2}))").ok()
});

/// A parsed year-month.
///
/// Ordering is chronological.
///
/// # Example
///
/// ```
/// use arari_engine::models::Period;
///
/// let october = Period::parse("2025年10月").unwrap();
/// let september = Period::parse("2025年9月").unwrap();
/// assert!(october > september);
/// assert_eq!(october.to_string(), "2025年10月");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Four-digit calendar year.
    pub year: i32,
    /// Month, 1 through 12.
    pub month: u32,
}

impl Period {
    /// Creates a period, returning `None` if the month is not 1 through 12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Extracts the first year-month found in `token`.
    ///
    /// A year is exactly four ASCII digits, followed by `年`, `-`, `/` or `.`
    /// and a one or two digit month. With `年` the month must be closed by `月`;
    /// with the other separators it must not be followed by a further digit.
    /// Anything else in the token is ignored, so payslip headers such as
    /// "2025年1月分(2月17日支給)" parse as January 2025.
    ///
    /// Returns `None` when no such pattern exists or the month is out of range.
    pub fn parse(token: &str) -> Option<Self> {
        let pattern = PERIOD_PATTERN.as_ref()?;
        pattern.captures_iter(token).find_map(|caps| {
            let end = caps.get(0)?.end();
            let digit_follows = token[end..].starts_with(|c: char| c.is_ascii_digit());
            let month = match (caps.get(2), caps.get(3)) {
                (Some(month), _) => month,
                (None, Some(month)) if !digit_follows => month,
                _ => return None,
            };
            Self::new(caps[1].parse().ok()?, month.as_str().parse().ok()?)
        })
    }

    /// Returns the period label used throughout the dashboard.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}年{}月", self.year, self.month)
    }
}

/// Compares two period tokens chronologically.
///
/// Parsed tokens compare by year then month. An unparseable token sorts before
/// every parsed one, so a newest-first sort leaves it last; two unparseable
/// tokens compare equal and keep their relative order under a stable sort.
///
/// ```
/// use arari_engine::models::compare_periods;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_periods("2025年10月", "2025年9月"), Ordering::Greater);
/// assert_eq!(compare_periods("unknown", "2025年1月"), Ordering::Less);
/// ```
pub fn compare_periods(a: &str, b: &str) -> Ordering {
    match (Period::parse(a), Period::parse(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts period tokens newest first, unparseable tokens last.
pub fn sort_periods_newest_first<S: AsRef<str>>(periods: &mut [S]) {
    periods.sort_by(|a, b| compare_periods(b.as_ref(), a.as_ref()));
}

/// Returns the display label for a token: the normalized year-month when it
/// parses, otherwise the trimmed token itself.
pub fn normalize_period(token: &str) -> String {
    match Period::parse(token) {
        Some(period) => period.label(),
        None => token.trim().to_string(),
    }
}

/// Returns true when two tokens name the same period.
///
/// Tokens that both parse compare by year and month; otherwise the trimmed
/// text must match exactly.
pub fn same_period(a: &str, b: &str) -> bool {
    match (Period::parse(a), Period::parse(b)) {
        (Some(a), Some(b)) => a == b,
        (None, None) => a.trim() == b.trim(),
        _ => false,
    }
}
