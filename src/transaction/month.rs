//! Converts a month selector such as "2024-02" into a date range.

use time::{Date, Duration, Month, OffsetDateTime};

/// The day of the month used as the inclusive upper bound of every month.
///
/// Months shorter than this roll over into the following month, e.g.
/// "2024-02" ends at 2024-03-02T00:00Z and "2024-04" at 2024-05-01T00:00Z.
const LAST_DAY_OF_MONTH: i64 = 31;

/// An inclusive range of date-times selected by a "YYYY-MM" string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    /// Midnight UTC on the first day of the month.
    pub start: OffsetDateTime,
    /// Midnight UTC on day 31 of the month, rolled over for shorter months.
    pub end: OffsetDateTime,
}

impl MonthRange {
    /// Parse a "YYYY-MM" month selector.
    ///
    /// Returns `None` when `selector` is not four year digits, a dash and two
    /// month digits for a month between 01 and 12. Callers treat `None` as a
    /// range that matches nothing.
    pub fn from_selector(selector: &str) -> Option<Self> {
        let (year, month) = selector.split_once('-')?;

        if year.len() != 4
            || month.len() != 2
            || !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let year: i32 = year.parse().ok()?;
        let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
        let start = Date::from_calendar_date(year, month, 1)
            .ok()?
            .midnight()
            .assume_utc();
        let end = start + Duration::days(LAST_DAY_OF_MONTH - 1);

        Some(Self { start, end })
    }
}
