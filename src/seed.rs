//! Seeds the database from the third-party transaction feed.
//!
//! Seeding is a full replace: every stored transaction is deleted and the
//! feed's records are inserted in their place.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    db::lock_connection,
    internal_server_error::InternalServerError,
    transaction::{TransactionBuilder, replace_all_transactions},
};

/// Where the seed data is fetched from unless configured otherwise.
pub const DEFAULT_FEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// Fetches the JSON array of transactions used to seed the database.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: reqwest::Client,
    url: String,
}

impl FeedClient {
    /// Create a client for the feed at `url`.
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_owned(),
        }
    }

    /// The URL of the feed.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download and decode the feed.
    ///
    /// # Errors
    /// Returns [Error::UpstreamFetch] if the feed cannot be reached, responds
    /// with a non-2xx status, or the body is not a JSON array of transactions.
    pub async fn fetch(&self) -> Result<Vec<TransactionBuilder>, Error> {
        tracing::info!("fetching seed data from {}", self.url);

        let transactions = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<TransactionBuilder>>()
            .await?;

        tracing::info!("fetched {} transactions", transactions.len());

        Ok(transactions)
    }
}

/// Fetch the feed and replace every stored transaction with its records.
///
/// The feed is downloaded before the database lock is taken.
///
/// # Errors
/// Returns [Error::UpstreamFetch] if the feed cannot be fetched, or a store
/// error if the records cannot be written. The stored transactions are left
/// as they were in both cases.
pub async fn reseed(feed: &FeedClient, db_connection: &Mutex<Connection>) -> Result<usize, Error> {
    let transactions = feed.fetch().await?;

    let connection = lock_connection(db_connection)?;
    let inserted = replace_all_transactions(&transactions, &connection)?;
    tracing::info!("seeded database with {inserted} transactions");

    Ok(inserted)
}

/// The state needed for seeding the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection for writing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The client for the seed feed.
    pub feed: FeedClient,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            feed: state.feed.clone(),
        }
    }
}

/// The response body for a successful reseed.
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    /// A human readable confirmation.
    pub message: &'static str,
}

/// Route handler that reseeds the database from the feed.
pub async fn initialize_db_endpoint(
    State(state): State<SeedState>,
) -> Result<Json<SeedResponse>, InternalServerError> {
    reseed(&state.feed, &state.db_connection)
        .await
        .map(|_| {
            Json(SeedResponse {
                message: "Database initialized with seed data!",
            })
        })
        .map_err(|error| error.with_message("Error initializing database"))
}
