//! Request handlers for the info server.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;

use crate::server::AppState;

/// Minimal landing page pointing a human at the API.
const LANDING_PAGE: &str = "<!DOCTYPE html>\n\
<html>\n\
<head><title>Lottery</title></head>\n\
<body>\n\
  <h1>Lottery</h1>\n\
  <p>Contract metadata is served at <a href=\"/api/contract-info\">/api/contract-info</a>.</p>\n\
</body>\n\
</html>\n";

pub async fn index() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

/// `GET /api/contract-info`
///
/// Re-reads the store on every request, so a deploy that finished after the
/// server started is visible without a restart.
pub async fn contract_info(State(state): State<AppState>) -> Response {
    match state.store.load() {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": "Contract not deployed yet. Run the `deploy` binary first."
            })),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Failed to read deployment record");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Deployment record exists but is unreadable"
                })),
            )
                .into_response()
        }
    }
}
