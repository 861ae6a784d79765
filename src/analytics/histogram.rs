//! Counts a month's transactions by price range for the bar chart.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    transaction::{MonthRange, TransactionFilter, count_transactions},
};

/// A price bucket covering `min <= price < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    /// The label shown on the chart.
    pub label: &'static str,
    /// The inclusive lower bound.
    pub min: f64,
    /// The exclusive upper bound, `None` for no upper bound.
    pub max: Option<f64>,
}

/// The bar chart buckets in display order.
///
/// Each bucket starts one above the previous bucket's upper bound, so prices
/// such as 100, 100.5 or 200 fall between buckets and are not counted.
pub const PRICE_RANGES: [PriceRange; 10] = [
    PriceRange { label: "0-100", min: 0.0, max: Some(100.0) },
    PriceRange { label: "101-200", min: 101.0, max: Some(200.0) },
    PriceRange { label: "201-300", min: 201.0, max: Some(300.0) },
    PriceRange { label: "301-400", min: 301.0, max: Some(400.0) },
    PriceRange { label: "401-500", min: 401.0, max: Some(500.0) },
    PriceRange { label: "501-600", min: 501.0, max: Some(600.0) },
    PriceRange { label: "601-700", min: 601.0, max: Some(700.0) },
    PriceRange { label: "701-800", min: 701.0, max: Some(800.0) },
    PriceRange { label: "801-900", min: 801.0, max: Some(900.0) },
    PriceRange { label: "901-above", min: 901.0, max: None },
];

/// The number of transactions in one price range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRangeCount {
    /// The label of the price range, e.g. "101-200".
    pub range: String,
    /// The number of transactions priced within the range.
    pub count: u64,
}

/// Count the transactions dated within `month` in each of the [PRICE_RANGES].
///
/// Always returns one entry per range, in order, even when counts are zero.
///
/// # Errors
/// Returns [Error::SqlError] if the store cannot be queried.
pub fn get_price_histogram(
    month: Option<MonthRange>,
    connection: &Connection,
) -> Result<Vec<PriceRangeCount>, Error> {
    PRICE_RANGES
        .iter()
        .map(|price_range| -> Result<PriceRangeCount, Error> {
            let filter = TransactionFilter::new()
                .month(month)
                .price_range(price_range.min, price_range.max);

            Ok(PriceRangeCount {
                range: price_range.label.to_owned(),
                count: count_transactions(&filter, connection)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        test_utils::get_test_connection,
        transaction::{MonthRange, Transaction, TransactionFilter, count_transactions, replace_all_transactions},
    };

    use super::{PRICE_RANGES, get_price_histogram};

    fn counts(prices: &[f64], selector: &str) -> Vec<u64> {
        let conn = get_test_connection();
        let transactions: Vec<_> = prices
            .iter()
            .map(|&price| Transaction::build("item", price, datetime!(2022-06-10 0:00 UTC)))
            .collect();
        replace_all_transactions(&transactions, &conn).unwrap();

        get_price_histogram(MonthRange::from_selector(selector), &conn)
            .unwrap()
            .into_iter()
            .map(|bucket| bucket.count)
            .collect()
    }

    #[test]
    fn returns_ten_labelled_buckets_in_order() {
        let conn = get_test_connection();

        let got = get_price_histogram(MonthRange::from_selector("2022-06"), &conn).unwrap();

        let labels: Vec<_> = got.iter().map(|bucket| bucket.range.as_str()).collect();
        assert_eq!(
            labels,
            [
                "0-100", "101-200", "201-300", "301-400", "401-500", "501-600", "601-700",
                "701-800", "801-900", "901-above"
            ]
        );
        assert!(got.iter().all(|bucket| bucket.count == 0));
    }

    #[test]
    fn places_prices_in_buckets() {
        let got = counts(&[0.0, 99.99, 101.0, 150.0, 450.0, 899.0, 901.0, 5000.0], "2022-06");

        assert_eq!(got, [2, 2, 0, 0, 1, 0, 0, 0, 1, 2]);
    }

    #[test]
    fn prices_in_the_gaps_are_not_counted() {
        let got = counts(&[100.0, 100.5, 200.0, 900.5], "2022-06");

        assert_eq!(got, [0; 10]);
    }

    #[test]
    fn bucket_counts_never_exceed_transactions_in_month() {
        let conn = get_test_connection();
        let transactions: Vec<_> = (0..120)
            .map(|i| Transaction::build("item", i as f64 * 9.7, datetime!(2022-06-10 0:00 UTC)))
            .collect();
        replace_all_transactions(&transactions, &conn).unwrap();
        let month = MonthRange::from_selector("2022-06");

        let got: u64 = get_price_histogram(month, &conn)
            .unwrap()
            .iter()
            .map(|bucket| bucket.count)
            .sum();
        let in_month = count_transactions(&TransactionFilter::new().month(month), &conn).unwrap();

        assert!(got <= in_month, "{got} > {in_month}");
    }

    #[test]
    fn other_months_are_not_counted() {
        let got = counts(&[50.0, 150.0], "2022-07");

        assert_eq!(got, [0; 10]);
    }

    #[test]
    fn invalid_month_has_ten_empty_buckets() {
        let got = counts(&[50.0, 150.0], "June");

        assert_eq!(got.len(), PRICE_RANGES.len());
        assert!(got.iter().all(|&count| count == 0));
    }
}
