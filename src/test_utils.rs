//! Helpers shared by the unit tests.

use rusqlite::Connection;

use crate::{AppState, PaginationConfig, db::initialize, seed::FeedClient};

/// An initialized in-memory database.
pub fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&conn).expect("Could not initialize database");
    conn
}

/// App state backed by an in-memory database.
///
/// The feed URL points at a port nothing listens on, tests that reseed should
/// replace `feed` with one pointing at a test server.
pub fn get_test_state() -> AppState {
    let conn = Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(
        conn,
        FeedClient::new("http://127.0.0.1:9/product_transaction.json"),
        PaginationConfig::default(),
    )
    .expect("Could not create app state")
}
