//! Combines the monthly statistics and both charts into a single report.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, transaction::MonthRange};

use super::{
    categories::{CategoryCount, get_category_distribution},
    histogram::{PriceRangeCount, get_price_histogram},
    statistics::{MonthlyStatistics, get_monthly_statistics},
};

/// Every analytic for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    /// Sales totals, see [get_monthly_statistics].
    pub statistics: MonthlyStatistics,
    /// Counts per price range, see [get_price_histogram].
    pub bar_chart: Vec<PriceRangeCount>,
    /// Counts per category, see [get_category_distribution].
    pub pie_chart: Vec<CategoryCount>,
}

/// Build the [CombinedReport] for `month`.
///
/// # Errors
/// Returns the first error from any of the parts; no partial report is produced.
pub fn get_combined_report(
    month: Option<MonthRange>,
    connection: &Connection,
) -> Result<CombinedReport, Error> {
    Ok(CombinedReport {
        statistics: get_monthly_statistics(month, connection)?,
        bar_chart: get_price_histogram(month, connection)?,
        pie_chart: get_category_distribution(month, connection)?,
    })
}
