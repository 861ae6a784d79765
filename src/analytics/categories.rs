//! Counts a month's transactions per category for the pie chart.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    transaction::{MonthRange, TransactionFilter, count_by_category},
};

/// The number of transactions in one category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category label.
    #[serde(rename = "_id")]
    pub category: String,
    /// The number of transactions in the category.
    pub count: u64,
}

/// Count the transactions dated within `month` for each category that has any.
///
/// The order of the categories is whatever the grouping query produces.
///
/// # Errors
/// Returns [Error::SqlError] if the store cannot be queried.
pub fn get_category_distribution(
    month: Option<MonthRange>,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    let filter = TransactionFilter::new().month(month);

    let counts = count_by_category(&filter, connection)?
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();

    Ok(counts)
}
