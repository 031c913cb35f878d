use crate::services::mailer;
use crate::state::SharedState;
use crate::web::error::ApiError;
use crate::web::session::ActiveSession;
use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct ReminderResponse {
    message: &'static str,
    to: String,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/email", post(send_reminder))
        .with_state(state)
}

async fn send_reminder(
    ActiveSession(session_id): ActiveSession,
    State(state): State<SharedState>,
) -> Result<Json<ReminderResponse>, ApiError> {
    let mail = state
        .read_session(session_id, |ctx| {
            mailer::reminder_mail(&ctx.email, ctx.profile.goal.label())
        })
        .await
        .ok_or(ApiError::Unauthorized)?;

    let Some(slot) = state.reminder_throttle.acquire(session_id).await else {
        tracing::warn!("Reminder throttled for session {}", session_id);
        return Err(ApiError::TooManyRequests);
    };

    // Single attempt; a failure goes straight back to the user and costs no slot.
    if let Err(e) = state.mailer.send(&mail).await {
        state.reminder_throttle.release(slot).await;
        tracing::error!("Reminder to {} failed: {}", mail.to, e);
        return Err(ApiError::Mail(e));
    }

    Ok(Json(ReminderResponse {
        message: "Email Reminder Sent!",
        to: mail.to,
    }))
}
