//! Sales totals for a month.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    transaction::{MonthRange, TransactionFilter, count_transactions, sum_prices},
};

/// How much sold in a month and how many items did and did not sell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStatistics {
    /// The summed price of the items that sold.
    pub total_sales: f64,
    /// The number of items that sold.
    pub sold_items: u64,
    /// The number of items that did not sell.
    pub not_sold_items: u64,
}

/// Compute the [MonthlyStatistics] for transactions dated within `month`.
///
/// An unparsable month (`None`) produces all zeros.
///
/// # Errors
/// Returns [Error::SqlError] if the store cannot be queried.
pub fn get_monthly_statistics(
    month: Option<MonthRange>,
    connection: &Connection,
) -> Result<MonthlyStatistics, Error> {
    let sold = TransactionFilter::new().month(month).sold(true);
    let not_sold = TransactionFilter::new().month(month).sold(false);

    Ok(MonthlyStatistics {
        total_sales: sum_prices(&sold, connection)?,
        sold_items: count_transactions(&sold, connection)?,
        not_sold_items: count_transactions(&not_sold, connection)?,
    })
}
