use crate::domain::models::{Goal, PlanEntry, UserProfile, WeeklySchedule};
use crate::domain::plan::{self, ResolvedPlan};
use crate::state::SharedState;
use crate::web::error::ApiError;
use crate::web::session::ActiveSession;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct PlanResponse {
    pub goal: &'static str,
    pub calories: i32,
    pub height_cm: f64,
    pub height_display: String,
    /// Hidden until the user asks for it.
    pub diet: Option<&'static [PlanEntry; 3]>,
    pub exercise: &'static [PlanEntry; 3],
    pub schedule: WeeklySchedule,
}

impl PlanResponse {
    fn build(profile: &UserProfile, diet_generated: bool) -> Self {
        let ResolvedPlan {
            goal_label,
            calories,
            diet,
            exercise,
            schedule,
            ..
        } = plan::resolve(profile.goal);
        let height_cm = plan::height_cm(profile.height_feet, profile.height_inches);
        Self {
            goal: goal_label,
            calories,
            height_cm,
            height_display: plan::format_height_cm(height_cm),
            diet: diet_generated.then_some(diet),
            exercise,
            schedule,
        }
    }
}

#[derive(Serialize)]
pub struct GoalOption {
    pub value: Goal,
    pub label: &'static str,
    pub calories: i32,
}

pub fn profile_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(get_profile).put(put_profile))
        .with_state(state)
}

pub fn plan_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(get_plan))
        .route("/diet", post(generate_diet))
        .route("/goals", get(list_goals))
        .with_state(state)
}

async fn list_goals() -> Json<Vec<GoalOption>> {
    Json(
        Goal::ALL
            .iter()
            .map(|&goal| GoalOption {
                value: goal,
                label: goal.label(),
                calories: plan::calories(goal),
            })
            .collect(),
    )
}

async fn get_profile(
    ActiveSession(session_id): ActiveSession,
    State(state): State<SharedState>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state
        .read_session(session_id, |ctx| ctx.profile.clone())
        .await
        .ok_or(ApiError::Unauthorized)?;
    Ok(Json(profile))
}

async fn put_profile(
    ActiveSession(session_id): ActiveSession,
    State(state): State<SharedState>,
    Json(payload): Json<UserProfile>,
) -> Result<Json<UserProfile>, ApiError> {
    payload.check_ranges().map_err(|e| {
        tracing::warn!("Profile update rejected: {}", e);
        e
    })?;

    let profile = state
        .update_session(session_id, |ctx| {
            ctx.profile = payload;
            ctx.profile.clone()
        })
        .await
        .ok_or(ApiError::Unauthorized)?;
    Ok(Json(profile))
}

async fn get_plan(
    ActiveSession(session_id): ActiveSession,
    State(state): State<SharedState>,
) -> Result<Json<PlanResponse>, ApiError> {
    let resp = state
        .read_session(session_id, |ctx| {
            PlanResponse::build(&ctx.profile, ctx.diet_generated)
        })
        .await
        .ok_or(ApiError::Unauthorized)?;
    Ok(Json(resp))
}

async fn generate_diet(
    ActiveSession(session_id): ActiveSession,
    State(state): State<SharedState>,
) -> Result<Json<PlanResponse>, ApiError> {
    let resp = state
        .update_session(session_id, |ctx| {
            ctx.diet_generated = true;
            PlanResponse::build(&ctx.profile, true)
        })
        .await
        .ok_or(ApiError::Unauthorized)?;
    Ok(Json(resp))
}
