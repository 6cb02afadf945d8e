// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use imgfs_db::{resolution_from_str, Engine, Error, ListMode};

use crate::error::HttpError;

/// Shared state handed to every route handler: one engine per process,
/// reference-counted so each `tokio` connection task can hold its own
/// handle without copying the container.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub index_html: Arc<str>,
}

/// Builds the routing table: exact method + URI prefix match. Unknown
/// paths fall through to [`not_found`] via the router's own fallback;
/// a known path hit with the wrong method also reaches [`not_found`]
/// (rather than axum's default `405 Method Not Allowed`) because each
/// per-path `MethodRouter` is given the same fallback.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).fallback(not_found))
        .route("/index.html", get(index).fallback(not_found))
        .route("/imgfs/list", get(list_images).fallback(not_found))
        .route("/imgfs/read", get(read_image).fallback(not_found))
        .route("/imgfs/delete", get(delete_image).fallback(not_found))
        .route("/imgfs/insert", post(insert_image).fallback(not_found))
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// One `info!` line per request with structured fields.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::info!(
        method = %method,
        path = %path,
        status = %response.status(),
        "handled request"
    );
    response
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.index_html.to_string())
}

async fn list_images(State(state): State<AppState>) -> Result<Response, HttpError> {
    let body = state.engine.list(ListMode::Json)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

async fn read_image(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, HttpError> {
    let img_id = params.get("img_id").ok_or(Error::InvalidArgument)?;
    let res = params.get("res").ok_or(Error::InvalidArgument)?;
    let resolution = resolution_from_str(res)?;
    let bytes = state.engine.read(img_id, resolution)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "image/jpeg")],
        bytes,
    )
        .into_response())
}

async fn delete_image(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, HttpError> {
    let img_id = params.get("img_id").ok_or(Error::InvalidArgument)?;
    state.engine.delete(img_id)?;
    Ok(found_redirect())
}

async fn insert_image(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let name = params.get("name").ok_or(Error::InvalidArgument)?;
    state.engine.insert(&body, name)?;
    Ok(found_redirect())
}

/// `302 Found` to `/index.html`. `axum::response::Redirect::to` issues a
/// `303 See Other` and has no public constructor for other status codes,
/// so the response is built by hand to match the status this route
/// contracts to return.
fn found_redirect() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/index.html")]).into_response()
}

async fn not_found() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "no such route".to_string(),
    )
        .into_response()
}
