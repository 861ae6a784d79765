//! Builds SQL filters over the transaction table and runs the queries that use them.

use rusqlite::{
    Connection, ParamsFromIter, Row,
    functions::FunctionFlags,
    params_from_iter,
    types::{Type, Value},
};

use crate::Error;

use super::{
    core::{TRANSACTION_COLUMNS, Transaction, map_transaction_row, to_unix_millis},
    month::MonthRange,
};

/// A set of conditions on transactions, all of which must hold.
///
/// Conditions are rendered with positional `?` parameters, so the clause from
/// [TransactionFilter::where_clause] must be used with the parameters from
/// [TransactionFilter::params] and no others placed before them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    conditions: Vec<String>,
    params: Vec<Value>,
}

impl TransactionFilter {
    /// A filter that matches every transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match transactions whose title, description or price contains `text`,
    /// ignoring case.
    ///
    /// Prices are matched in their shortest form, so a price of 100 reads as
    /// "100" and 109.95 as "109.95". An empty `text` adds no condition.
    ///
    /// The connection must have had [register_search_functions] called on it.
    pub fn search(mut self, text: &str) -> Self {
        if text.is_empty() {
            return self;
        }

        let pattern = format!("%{}%", escape_like_pattern(&text.to_lowercase()));

        self.conditions.push(
            "(unicode_lower(title) LIKE ? ESCAPE '\\' \
            OR unicode_lower(description) LIKE ? ESCAPE '\\' \
            OR price_text(price) LIKE ? ESCAPE '\\')"
                .to_owned(),
        );
        self.params.extend(std::iter::repeat_n(Value::Text(pattern), 3));

        self
    }

    /// Match transactions sold within `month`.
    ///
    /// A `None` month, i.e. a selector that could not be parsed, matches nothing.
    pub fn month(mut self, month: Option<MonthRange>) -> Self {
        match month {
            Some(range) => {
                self.conditions
                    .push("date_of_sale BETWEEN ? AND ?".to_owned());
                self.params.push(Value::Integer(to_unix_millis(range.start)));
                self.params.push(Value::Integer(to_unix_millis(range.end)));
            }
            None => self.conditions.push("0 = 1".to_owned()),
        }

        self
    }

    /// Match transactions by whether they sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.conditions.push("sold = ?".to_owned());
        self.params.push(Value::Integer(sold.into()));
        self
    }

    /// Match transactions with `min <= price < max`, or `min <= price` if `max` is `None`.
    pub fn price_range(mut self, min: f64, max: Option<f64>) -> Self {
        self.conditions.push("price >= ?".to_owned());
        self.params.push(Value::Real(min));

        if let Some(max) = max {
            self.conditions.push("price < ?".to_owned());
            self.params.push(Value::Real(max));
        }

        self
    }

    /// The `WHERE` clause for the filter, or an empty string if there are no conditions.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// The parameters for the placeholders in [TransactionFilter::where_clause].
    pub fn params(&self) -> ParamsFromIter<std::slice::Iter<'_, Value>> {
        params_from_iter(self.params.iter())
    }
}

/// Register the SQL functions used by [TransactionFilter::search] on `connection`.
///
/// - `unicode_lower(text)` lowercases every letter, not just ASCII ones.
/// - `price_text(price)` formats a price without a trailing ".0".
///
/// # Errors
/// Returns [Error::SqlError] if a function could not be registered.
pub fn register_search_functions(connection: &Connection) -> Result<(), Error> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    connection.create_scalar_function("unicode_lower", 1, flags, |context| {
        let text: Option<String> = context.get(0)?;
        Ok(text.map(|text| text.to_lowercase()))
    })?;

    connection.create_scalar_function("price_text", 1, flags, |context| {
        let price: Option<f64> = context.get(0)?;
        Ok(price.map(|price| price.to_string()))
    })?;

    Ok(())
}

/// Escape the LIKE wildcards in `text` so that they match literally.
fn escape_like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Count the transactions matching `filter`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn count_transactions(filter: &TransactionFilter, connection: &Connection) -> Result<u64, Error> {
    let query = format!(
        "SELECT COUNT(*) FROM \"transaction\" {}",
        filter.where_clause()
    );

    connection
        .prepare(&query)?
        .query_row(filter.params(), |row| get_count(row, 0))
        .map_err(Error::from)
}

/// Read a `COUNT(*)` column.
fn get_count(row: &Row, index: usize) -> Result<u64, rusqlite::Error> {
    let count: i64 = row.get(index)?;

    u64::try_from(count).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(error))
    })
}

/// Sum the prices of the transactions matching `filter`, zero if none match.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn sum_prices(filter: &TransactionFilter, connection: &Connection) -> Result<f64, Error> {
    let query = format!(
        "SELECT COALESCE(SUM(price), 0.0) FROM \"transaction\" {}",
        filter.where_clause()
    );

    connection
        .prepare(&query)?
        .query_row(filter.params(), |row| row.get(0))
        .map_err(Error::from)
}

/// Get up to `limit` transactions matching `filter` after skipping `offset` of them.
///
/// Transactions are returned in insertion order.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped.
pub fn get_transactions(
    filter: &TransactionFilter,
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" {} ORDER BY id ASC LIMIT {} OFFSET {}",
        filter.where_clause(),
        i64::try_from(limit).unwrap_or(i64::MAX),
        i64::try_from(offset).unwrap_or(i64::MAX),
    );

    connection
        .prepare(&query)?
        .query_map(filter.params(), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Count the transactions matching `filter` for each distinct category.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn count_by_category(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<(String, u64)>, Error> {
    let query = format!(
        "SELECT category, COUNT(*) FROM \"transaction\" {} GROUP BY category",
        filter.where_clause()
    );

    connection
        .prepare(&query)?
        .query_map(filter.params(), |row| Ok((row.get(0)?, get_count(row, 1)?)))?
        .map(|count_result| count_result.map_err(Error::from))
        .collect()
}
