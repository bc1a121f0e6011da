// HTTP request handlers
use crate::presentation::app_state::AppState;
use crate::presentation::page::render_page;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::Arc;

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.contains("application/json"))
        .unwrap_or(false)
}

/// The dashboard: HTML page for browsers, the current chart description for JSON clients
pub async fn dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let chart = state.chart_service.latest();

    if wants_json(&headers) {
        return (
            [(header::CACHE_CONTROL, "no-store"), (header::VARY, "accept")],
            Json(chart.as_ref()),
        )
            .into_response();
    }

    match render_page(&chart, state.refresh_interval.as_millis()) {
        Ok(page) => ([(header::VARY, "accept")], Html(page)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render dashboard page");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
