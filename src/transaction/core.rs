//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior, types::Type};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

/// Alias for the integer type used for transaction IDs.
pub type TransactionId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// A product listing and whether, and when, it sold.
///
/// Transactions are read back from the database after being stored from a
/// [TransactionBuilder].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction, assigned by the database.
    #[serde(rename = "_id")]
    pub id: TransactionId,
    /// The product name.
    pub title: String,
    /// A longer text description of the product.
    pub description: String,
    /// The listed price of the product. Never negative.
    pub price: f64,
    /// The category label of the product, e.g. "electronics".
    pub category: String,
    /// A URL to an image of the product.
    pub image: String,
    /// Whether the product was sold.
    pub sold: bool,
    /// When the product was sold, or listed if it has not sold.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
}

#[cfg(test)]
impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(title: &str, price: f64, date_of_sale: OffsetDateTime) -> TransactionBuilder {
        TransactionBuilder {
            title: title.to_owned(),
            description: String::new(),
            price,
            category: String::new(),
            image: String::new(),
            sold: false,
            date_of_sale,
        }
    }
}

/// A transaction that has not been stored yet.
///
/// This is also the shape of a record in the seed feed. Fields the feed
/// carries that are not listed here, such as the feed's own `id`, are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBuilder {
    /// The product name.
    pub title: String,
    /// A longer text description of the product.
    #[serde(default)]
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// The category label of the product.
    #[serde(default)]
    pub category: String,
    /// A URL to an image of the product.
    #[serde(default)]
    pub image: String,
    /// Whether the product was sold.
    #[serde(default)]
    pub sold: bool,
    /// When the product was sold.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set the image URL for the transaction.
    pub fn image(mut self, image: &str) -> Self {
        self.image = image.to_owned();
        self
    }

    /// Set whether the product sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table and its date index if they do not exist.
///
/// Dates are stored as milliseconds since the unix epoch (UTC) so that range
/// filters compare integers.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL CHECK (price >= 0),
                category TEXT NOT NULL,
                image TEXT NOT NULL,
                sold INTEGER NOT NULL,
                date_of_sale INTEGER NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_of_sale ON \"transaction\"(date_of_sale)",
        (),
    )?;

    Ok(())
}

/// Delete every stored transaction and insert `transactions` in their place.
///
/// Both steps run inside a single SQL transaction, so a failed insert leaves
/// the previous records untouched.
///
/// # Errors
/// Returns [Error::SqlError] if a record violates the table constraints
/// (e.g. a negative price) or there is some other SQL error.
pub fn replace_all_transactions(
    transactions: &[TransactionBuilder],
    connection: &Connection,
) -> Result<usize, Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let deleted = sql_transaction.execute("DELETE FROM \"transaction\"", ())?;
    tracing::debug!("deleted {deleted} transactions");

    {
        let mut statement = sql_transaction.prepare(
            "INSERT INTO \"transaction\" (title, description, price, category, image, sold, date_of_sale)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;

        for transaction in transactions {
            statement.execute((
                &transaction.title,
                &transaction.description,
                transaction.price,
                &transaction.category,
                &transaction.image,
                transaction.sold,
                to_unix_millis(transaction.date_of_sale),
            ))?;
        }
    }

    sql_transaction.commit()?;

    Ok(transactions.len())
}

/// The columns to select for [map_transaction_row], in order.
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, title, description, price, category, image, sold, date_of_sale";

/// Map a database row to a [Transaction].
///
/// The row must contain the columns listed in [TRANSACTION_COLUMNS].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let date_millis: i64 = row.get(7)?;

    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        category: row.get(4)?,
        image: row.get(5)?,
        sold: row.get(6)?,
        date_of_sale: from_unix_millis(date_millis).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(7, Type::Integer, Box::new(error))
        })?,
    })
}

/// Convert a date-time to the millisecond timestamp stored in the database.
pub(crate) fn to_unix_millis(date_time: OffsetDateTime) -> i64 {
    (date_time.unix_timestamp_nanos() / 1_000_000) as i64
}

fn from_unix_millis(millis: i64) -> Result<OffsetDateTime, time::error::ComponentRange> {
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        test_utils::get_test_connection,
        transaction::{
            Transaction, TransactionFilter, count_transactions, get_transactions,
        },
    };

    use super::{TransactionBuilder, replace_all_transactions};

    #[test]
    fn replace_all_stores_every_field() {
        let conn = get_test_connection();
        let want = Transaction::build("Fjallraven Backpack", 109.95, datetime!(2021-11-27 20:29:54 +5:30))
            .description("Fits 15 inch laptops")
            .category("men's clothing")
            .image("https://example.com/backpack.jpg")
            .sold(true);

        replace_all_transactions(std::slice::from_ref(&want), &conn).unwrap();

        let got = get_transactions(&TransactionFilter::new(), 10, 0, &conn).unwrap();
        assert_eq!(got.len(), 1);
        let got = &got[0];
        assert_eq!(got.title, want.title);
        assert_eq!(got.description, want.description);
        assert_eq!(got.price, want.price);
        assert_eq!(got.category, want.category);
        assert_eq!(got.image, want.image);
        assert_eq!(got.sold, want.sold);
        assert_eq!(got.date_of_sale, want.date_of_sale);
    }

    #[test]
    fn replace_all_discards_previous_records() {
        let conn = get_test_connection();
        let date = datetime!(2022-01-01 0:00 UTC);
        let first: Vec<_> = (0..5)
            .map(|i| Transaction::build(&format!("old #{i}"), 10.0, date))
            .collect();
        let second: Vec<_> = (0..3)
            .map(|i| Transaction::build(&format!("new #{i}"), 20.0, date))
            .collect();

        replace_all_transactions(&first, &conn).unwrap();
        let inserted = replace_all_transactions(&second, &conn).unwrap();

        assert_eq!(inserted, 3);
        assert_eq!(count_transactions(&TransactionFilter::new(), &conn).unwrap(), 3);
        let titles: Vec<_> = get_transactions(&TransactionFilter::new(), 10, 0, &conn)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.title)
            .collect();
        assert_eq!(titles, ["new #0", "new #1", "new #2"]);
    }

    #[test]
    fn negative_price_rolls_back_the_whole_replace() {
        let conn = get_test_connection();
        let date = datetime!(2022-01-01 0:00 UTC);
        replace_all_transactions(&[Transaction::build("kept", 1.0, date)], &conn).unwrap();

        let result = replace_all_transactions(
            &[
                Transaction::build("fine", 1.0, date),
                Transaction::build("negative", -1.0, date),
            ],
            &conn,
        );

        assert!(result.is_err());
        let got = get_transactions(&TransactionFilter::new(), 10, 0, &conn).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].title, "kept");
    }

    #[test]
    fn deserializes_feed_record() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 329.85,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "sold": false,
            "dateOfSale": "2021-11-27T20:29:54+05:30"
        }"#;

        let got: TransactionBuilder = serde_json::from_str(json).unwrap();

        assert_eq!(
            got,
            Transaction::build("Fjallraven Backpack", 329.85, datetime!(2021-11-27 20:29:54 +5:30))
                .description("Your perfect pack for everyday use")
                .category("men's clothing")
                .image("https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg")
        );
    }
}
