use crate::domain::dashboard::{self, Dashboard};
use crate::state::SharedState;
use crate::web::error::ApiError;
use crate::web::session::ActiveSession;
use axum::{extract::State, routing::get, Json, Router};

pub fn router(state: SharedState) -> Router {
    Router::new().route("/", get(get_dashboard)).with_state(state)
}

async fn get_dashboard(
    ActiveSession(session_id): ActiveSession,
    State(state): State<SharedState>,
) -> Result<Json<Dashboard>, ApiError> {
    let view = state
        .read_session(session_id, |ctx| dashboard::build(&ctx.email, &ctx.profile))
        .await
        .ok_or(ApiError::Unauthorized)?;
    Ok(Json(view))
}
