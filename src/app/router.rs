use crate::app::state::AppState;
use crate::handler::health::health_handler;
use crate::handler::history::history_handler;
use crate::handler::home::{form_handler, submit_handler};
use axum::Router;
use axum::routing::get;

/// Build the HTTP router (classifier form, history page, health).
pub fn main_router(state: AppState) -> Router {
    let health_router = Router::new().route("/v1/health", get(health_handler));

    let page_router = Router::new()
        .route("/", get(form_handler).post(submit_handler))
        .route("/history", get(history_handler))
        .with_state(state);

    Router::new().merge(health_router).merge(page_router)
}
