//! Defines the route handler for searching transactions one page at a time.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    db::lock_connection,
    internal_server_error::InternalServerError,
    pagination::{PaginationConfig, page_count, parse_positive_or},
    query_params::QueryParams,
};

use super::{
    core::Transaction,
    query::{TransactionFilter, count_transactions, get_transactions},
};

/// The state needed for searching transactions.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsPage {
    /// The transactions on this page.
    pub transactions: Vec<Transaction>,
    /// The number of transactions matching the search across all pages.
    pub total: u64,
    /// The page number that was requested.
    pub current_page: u64,
    /// The number of pages needed to show every match.
    pub pages: u64,
}

/// Get the transactions matching `search` on the 1-based `page`, `per_page` at a time.
///
/// # Errors
/// Returns [Error::SqlError] if the store cannot be queried.
pub fn search_transactions(
    search: &str,
    page: u64,
    per_page: u64,
    connection: &Connection,
) -> Result<TransactionsPage, Error> {
    let filter = TransactionFilter::new().search(search);
    let offset = page.saturating_sub(1).saturating_mul(per_page);

    let transactions = get_transactions(&filter, per_page, offset, connection)?;
    let total = count_transactions(&filter, connection)?;

    Ok(TransactionsPage {
        transactions,
        total,
        current_page: page,
        pages: page_count(total, per_page),
    })
}

/// Route handler for listing transactions with search and pagination.
///
/// Reads the query parameters `page` (1-based), `perPage` and `search`.
/// Missing, repeated or malformed values fall back to the defaults instead of
/// rejecting the request.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionsState>,
    params: QueryParams,
) -> Result<Json<TransactionsPage>, InternalServerError> {
    const MESSAGE: &str = "Error fetching transactions";

    let config = &state.pagination_config;
    let page = parse_positive_or(params.get("page"), config.default_page);
    let per_page = parse_positive_or(params.get("perPage"), config.default_page_size);
    let search = params.get("search").unwrap_or_default();

    let connection = lock_connection(&state.db_connection).map_err(|error| error.with_message(MESSAGE))?;

    search_transactions(search, page, per_page, &connection)
        .map(Json)
        .map_err(|error| error.with_message(MESSAGE))
}
