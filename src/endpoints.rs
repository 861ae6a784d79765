//! The API endpoints URIs.

/// The route for reseeding the database from the transaction feed.
pub const INITIALIZE_DB: &str = "/api/initialize-db";
/// The route for searching transactions page by page.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for the sales totals of a month.
pub const STATISTICS: &str = "/api/statistics";
/// The route for the price range histogram of a month.
pub const BAR_CHART: &str = "/api/bar-chart";
/// The route for the category breakdown of a month.
pub const PIE_CHART: &str = "/api/pie-chart";
/// The route for the statistics and both charts of a month.
pub const COMBINED_DATA: &str = "/api/combined-data";
