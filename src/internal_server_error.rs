//! Defines the response returned when a request fails.
//!
//! Every failure is reported as a 500 with a JSON body holding a short
//! description of what was attempted and the underlying error text.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::Error;

/// An error paired with the message to show the client.
///
/// Create one with [Error::with_message].
#[derive(Debug)]
pub struct InternalServerError {
    /// What the request was trying to do, e.g. "Error fetching statistics".
    pub message: &'static str,
    /// The error that caused the request to fail.
    pub error: Error,
}

impl IntoResponse for InternalServerError {
    fn into_response(self) -> Response {
        tracing::error!("{}: {}", self.message, self.error);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "message": self.message,
                "error": self.error.to_string(),
            })),
        )
            .into_response()
    }
}
