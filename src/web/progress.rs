use crate::domain::models::{self, ProgressSample};
use crate::domain::progress::ProgressView;
use crate::state::SharedState;
use crate::web::error::ApiError;
use crate::web::session::ActiveSession;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct AddProgressPayload {
    /// Read as a plain number so negative or fractional days reach the range check.
    day: f64,
    /// Falls back to the profile's current weight, like the form default.
    weight: Option<f64>,
}

#[derive(Serialize)]
struct AddProgressResponse {
    message: &'static str,
    samples: Vec<ProgressSample>,
}

const DAY_RANGE_MESSAGE: &str = "day must be a whole number of at least 1";

fn check_day(day: f64) -> Result<u32, ApiError> {
    if day.fract() != 0.0 || day < 1.0 || day > f64::from(u32::MAX) {
        return Err(ApiError::BadRequest(DAY_RANGE_MESSAGE.to_string()));
    }
    Ok(day as u32)
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(view).post(add))
        .with_state(state)
}

async fn view(
    ActiveSession(session_id): ActiveSession,
    State(state): State<SharedState>,
) -> Result<Json<ProgressView>, ApiError> {
    let view = state
        .read_session(session_id, |ctx| ctx.ledger.render())
        .await
        .ok_or(ApiError::Unauthorized)?;
    Ok(Json(view))
}

async fn add(
    ActiveSession(session_id): ActiveSession,
    State(state): State<SharedState>,
    payload: Result<Json<AddProgressPayload>, JsonRejection>,
) -> Result<Json<AddProgressResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        tracing::warn!("Progress entry rejected: {}", e.body_text());
        ApiError::BadRequest(e.body_text())
    })?;

    // The ledger takes anything; the form's input limits are enforced here.
    let day = check_day(payload.day)?;
    if let Some(weight) = payload.weight {
        models::check_weight(weight)?;
    }

    let samples = state
        .update_session(session_id, |ctx| {
            let weight = payload.weight.unwrap_or(ctx.profile.weight);
            ctx.ledger.append(day, weight).to_vec()
        })
        .await
        .ok_or(ApiError::Unauthorized)?;

    tracing::info!(
        "Session {} logged day {} ({} samples)",
        session_id,
        day,
        samples.len()
    );
    Ok(Json(AddProgressResponse {
        message: "Progress added!",
        samples,
    }))
}
