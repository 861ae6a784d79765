//! Application router configuration.

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    analytics::{
        get_bar_chart_endpoint, get_combined_data_endpoint, get_pie_chart_endpoint,
        get_statistics_endpoint,
    },
    endpoints,
    seed::initialize_db_endpoint,
    transaction::get_transactions_endpoint,
};

/// Return a router with all the app's routes.
///
/// Every route accepts cross-origin requests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::INITIALIZE_DB, get(initialize_db_endpoint))
        .route(endpoints::TRANSACTIONS, get(get_transactions_endpoint))
        .route(endpoints::STATISTICS, get(get_statistics_endpoint))
        .route(endpoints::BAR_CHART, get(get_bar_chart_endpoint))
        .route(endpoints::PIE_CHART, get(get_pie_chart_endpoint))
        .route(endpoints::COMBINED_DATA, get(get_combined_data_endpoint))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;

    use crate::{build_router, endpoints, test_utils::get_test_state};

    fn get_test_server() -> TestServer {
        TestServer::try_new(build_router(get_test_state())).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn serves_every_read_endpoint() {
        let server = get_test_server();

        for endpoint in [
            endpoints::TRANSACTIONS,
            endpoints::STATISTICS,
            endpoints::BAR_CHART,
            endpoints::PIE_CHART,
            endpoints::COMBINED_DATA,
        ] {
            server.get(endpoint).await.assert_status_ok();
        }
    }

    #[tokio::test]
    async fn allows_cross_origin_requests() {
        let server = get_test_server();

        let response = server
            .get(endpoints::STATISTICS)
            .add_header(
                HeaderName::from_static("origin"),
                HeaderValue::from_static("http://localhost:3000"),
            )
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header("access-control-allow-origin"),
            HeaderValue::from_static("*")
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        server
            .get("/api/coffee")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
