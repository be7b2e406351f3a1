use crate::app::state::AppState;
use crate::domain::NewEmailRecord;
use crate::view::{HomeView, render_home};
use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::response::Html;
use serde::Deserialize;
use tracing::{debug, error, info};

#[derive(Debug, Default, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub email_text: String,
}

/// Handler for GET /
pub async fn form_handler() -> Html<String> {
    Html(render_home(&HomeView::default()))
}

/// Handler for POST /
///
/// A missing or unreadable form body is classified as empty text.
/// A failed save is logged and the classification is still rendered.
pub async fn submit_handler(
    State(state): State<AppState>,
    form: Result<Form<SubmitForm>, FormRejection>,
) -> Html<String> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(e) => {
            debug!(error = %e, "Form body rejected, using empty text");
            SubmitForm::default()
        }
    };
    let email_text = form.email_text;
    let classification = state.pipeline.classify(&email_text).await;
    info!(
        length = email_text.len(),
        spam = classification.is_spam(),
        source = ?classification.source(),
        "Classified submission"
    );

    let record = NewEmailRecord::from_classification(&email_text, &classification);
    match state.history.append(record).await {
        Ok(id) => info!(id, "Saved classification"),
        Err(e) => error!(error = %e, "DB save error"),
    }

    Html(render_home(&HomeView {
        result: Some(classification.display_text()),
        confidence: classification.confidence_text(),
        email_text,
    }))
}
