//! Lenient extraction of query string parameters.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

/// The key-value pairs of a request's query string, in order.
///
/// Unlike a typed [Query], extracting these never rejects the request. A
/// query string that cannot be decoded is treated as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// The value of `key`, or `None` if `key` is missing or given more than once.
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut values = self
            .0
            .iter()
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.as_str());

        match (values.next(), values.next()) {
            (Some(value), None) => Some(value),
            _ => None,
        }
    }
}

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
            Ok(Query(pairs)) => Ok(Self(pairs)),
            Err(rejection) => {
                tracing::warn!("ignoring malformed query string {:?}: {rejection}", parts.uri.query());
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;

    use super::QueryParams;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        QueryParams(
            pairs
                .iter()
                .map(|&(key, value)| (key.to_owned(), value.to_owned()))
                .collect(),
        )
    }

    #[test]
    fn gets_single_value() {
        let got = params(&[("month", "2022-03"), ("page", "2")]);

        assert_eq!(got.get("month"), Some("2022-03"));
        assert_eq!(got.get("page"), Some("2"));
    }

    #[test]
    fn missing_key_is_none() {
        assert_eq!(params(&[("page", "2")]).get("month"), None);
    }

    #[test]
    fn repeated_key_is_none() {
        let got = params(&[("month", "2022-03"), ("month", "2022-04")]);

        assert_eq!(got.get("month"), None);
    }

    #[tokio::test]
    async fn extracts_from_query_string() {
        let app = Router::new().route(
            "/",
            get(|params: QueryParams| async move {
                format!("{:?} {:?}", params.get("search"), params.get("page"))
            }),
        );
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server
            .get("/")
            .add_query_param("search", "café au lait")
            .add_query_param("page", "1")
            .add_query_param("page", "2")
            .await;

        response.assert_status_ok();
        response.assert_text("Some(\"café au lait\") None");
    }
}
