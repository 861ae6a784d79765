use std::error::Error;
use std::sync::Mutex;

use clap::Parser;
use rusqlite::Connection;

use sales_insights::{DEFAULT_FEED_URL, FeedClient, initialize_db, reseed};

/// A utility for seeding the sales_insights database from the transaction feed.
///
/// Any transactions already in the database are replaced.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database, created if it does not exist.
    #[arg(long, short, env = "DB_PATH", default_value = "transactions.db")]
    db_path: String,

    /// The URL of the JSON feed to seed from.
    #[arg(long, env = "FEED_URL", default_value = DEFAULT_FEED_URL)]
    feed_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    println!("Opening database at {:#?}", args.db_path);
    let conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;

    let feed = FeedClient::new(&args.feed_url);
    println!("Fetching transactions from {}...", feed.url());
    let inserted = reseed(&feed, &Mutex::new(conn)).await?;

    println!("Seeded {inserted} transactions!");

    Ok(())
}
