//! Route handlers for the monthly analytics.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::lock_connection,
    internal_server_error::InternalServerError,
    query_params::QueryParams,
    transaction::MonthRange,
};

use super::{
    categories::{CategoryCount, get_category_distribution},
    histogram::{PriceRangeCount, get_price_histogram},
    report::{CombinedReport, get_combined_report},
    statistics::{MonthlyStatistics, get_monthly_statistics},
};

/// The state needed for computing analytics.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The month selected by the "month" query parameter, formatted as "YYYY-MM".
///
/// `None` if the parameter is missing, repeated or malformed.
fn selected_month(params: &QueryParams) -> Option<MonthRange> {
    params.get("month").and_then(MonthRange::from_selector)
}

/// Lock the database and run `run` for the requested month, attaching
/// `message` to any error.
fn run_monthly_query<T>(
    state: &AnalyticsState,
    params: &QueryParams,
    message: &'static str,
    run: impl FnOnce(Option<MonthRange>, &Connection) -> Result<T, Error>,
) -> Result<Json<T>, InternalServerError> {
    let connection =
        lock_connection(&state.db_connection).map_err(|error| error.with_message(message))?;

    run(selected_month(params), &connection)
        .map(Json)
        .map_err(|error| error.with_message(message))
}

/// Route handler for the sales totals of a month.
pub async fn get_statistics_endpoint(
    State(state): State<AnalyticsState>,
    params: QueryParams,
) -> Result<Json<MonthlyStatistics>, InternalServerError> {
    run_monthly_query(
        &state,
        &params,
        "Error fetching statistics",
        get_monthly_statistics,
    )
}

/// Route handler for the price range bar chart of a month.
pub async fn get_bar_chart_endpoint(
    State(state): State<AnalyticsState>,
    params: QueryParams,
) -> Result<Json<Vec<PriceRangeCount>>, InternalServerError> {
    run_monthly_query(
        &state,
        &params,
        "Error fetching bar chart data",
        get_price_histogram,
    )
}

/// Route handler for the category pie chart of a month.
pub async fn get_pie_chart_endpoint(
    State(state): State<AnalyticsState>,
    params: QueryParams,
) -> Result<Json<Vec<CategoryCount>>, InternalServerError> {
    run_monthly_query(
        &state,
        &params,
        "Error fetching pie chart data",
        get_category_distribution,
    )
}

/// Route handler for the statistics and both charts of a month in one response.
pub async fn get_combined_data_endpoint(
    State(state): State<AnalyticsState>,
    params: QueryParams,
) -> Result<Json<CombinedReport>, InternalServerError> {
    run_monthly_query(
        &state,
        &params,
        "Error fetching combined data",
        get_combined_report,
    )
}
