use crate::app::state::AppState;
use crate::view::render_history;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use tracing::{error, info};

/// Handler for GET /history
pub async fn history_handler(State(state): State<AppState>) -> (StatusCode, Html<String>) {
    match state.history.all_records().await {
        Ok(records) => {
            info!(count = records.len(), "Rendering classification history");
            (StatusCode::OK, Html(render_history(&records, None)))
        }
        Err(e) => {
            error!(error = %e, "Failed to load classification history");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_history(&[], Some("History is unavailable right now."))),
            )
        }
    }
}
