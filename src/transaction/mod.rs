//! Transaction records and the queries over them.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Conversion of "YYYY-MM" month selectors into date ranges
//! - A filter builder and the database queries that use it
//! - The route handler for searching transactions page by page

mod core;
mod month;
mod query;
mod search;

pub use self::core::{TransactionBuilder, create_transaction_table, replace_all_transactions};
pub use month::MonthRange;
pub use query::{
    TransactionFilter, count_by_category, count_transactions, register_search_functions,
    sum_prices,
};
pub use search::get_transactions_endpoint;

#[cfg(test)]
pub use self::core::Transaction;
#[cfg(test)]
pub use query::get_transactions;
