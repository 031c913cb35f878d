use crate::services::pdf;
use crate::state::SharedState;
use crate::web::error::ApiError;
use crate::web::session::ActiveSession;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};

pub fn router(state: SharedState) -> Router {
    Router::new().route("/pdf", get(export_pdf)).with_state(state)
}

async fn export_pdf(
    ActiveSession(session_id): ActiveSession,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let email = state
        .read_session(session_id, |ctx| ctx.email.clone())
        .await
        .ok_or(ApiError::Unauthorized)?;

    let document = pdf::render_plan_document(&email);
    tracing::info!("Generated plan PDF ({} bytes) for {}", document.len(), email);

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", pdf::FILE_NAME),
            ),
        ],
        document,
    ))
}
