// SPDX-License-Identifier: MIT OR Apache-2.0

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Wraps an [`imgfs_db::Error`] so it can be returned directly from a route
/// handler.
///
/// Every engine error surfaces as `500 Internal Server Error` with the
/// textual message, including `DuplicateId` from `insert` — no route gets
/// a special status mapping for it.
pub struct HttpError(pub imgfs_db::Error);

impl From<imgfs_db::Error> for HttpError {
    fn from(e: imgfs_db::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        tracing::warn!(error = %message, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}
