use crate::domain::dashboard;
use crate::state::SharedState;
use crate::web::error::ApiError;
use crate::web::session::{self, ActiveSession};
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

const PASSWORD_HINT: &str = "Password should be at least 6 characters";

#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub email: String,
    pub display_name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub message: &'static str,
}

#[derive(Clone, Copy)]
enum Entry {
    Login,
    Signup,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/logout", post(logout))
        .with_state(state)
}

async fn login(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    enter(&state, &headers, payload, Entry::Login).await
}

async fn signup(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    enter(&state, &headers, payload, Entry::Signup).await
}

/// Any non-empty email/password pair is accepted; nothing is stored or checked.
async fn enter(
    state: &SharedState,
    headers: &HeaderMap,
    payload: CredentialsRequest,
    entry: Entry,
) -> Result<(HeaderMap, Json<LoginResponse>), ApiError> {
    let CredentialsRequest { email, password } = payload;
    if email.is_empty() || password.is_empty() {
        tracing::warn!("Rejected entry with missing credentials");
        return Err(ApiError::MissingCredentials);
    }

    // A still-valid session keeps its context (and ledger); only the email changes.
    let reused = match session::current_session(headers, state).await {
        Some(id) => state
            .update_session(id, |ctx| {
                ctx.email = email.clone();
                (id, ctx.expires_at)
            })
            .await,
        None => None,
    };
    let (session_id, expires_at) = match reused {
        Some(found) => found,
        None => state.open_session(email.clone()).await,
    };

    let token = session::sign_session(session_id, expires_at, &state.config.session_key)
        .map_err(|e| ApiError::Internal(format!("session signing failed: {e}")))?;
    let max_age = (expires_at - Utc::now()).num_seconds().max(0);

    let mut out_headers = HeaderMap::new();
    out_headers.insert(header::SET_COOKIE, session::session_cookie(&token, max_age)?);

    let (message, hint) = match entry {
        Entry::Login => (format!("Logged in as {email}"), None),
        Entry::Signup => (
            format!("Account created! Logged in as {email}"),
            Some(PASSWORD_HINT),
        ),
    };
    tracing::info!("Session {} entered for {}", session_id, email);

    Ok((
        out_headers,
        Json(LoginResponse {
            display_name: dashboard::display_name(&email),
            email,
            message,
            hint,
        }),
    ))
}

async fn logout(
    ActiveSession(session_id): ActiveSession,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    state.close_session(session_id).await;

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, session::clear_cookie());
    (headers, Json(LogoutResponse { message: "Logged out" }))
}
