use crate::state::SharedState;
use crate::web::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap, HeaderValue},
};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use once_cell::sync::Lazy;
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

pub const COOKIE_NAME: &str = "session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub session_id: Uuid,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid token format")]
    Invalid,
    #[error("signature mismatch")]
    Signature,
    #[error("expired")]
    Expired,
}

pub fn sign_session(
    session_id: Uuid,
    expires_at: DateTime<Utc>,
    key: &[u8],
) -> Result<String, SessionError> {
    let payload = format!("{}|{}", session_id, expires_at.timestamp());
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::Invalid)?;
    mac.update(payload.as_bytes());
    let sig = mac.finalize().into_bytes();
    Ok(format!(
        "{}.{}",
        general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes()),
        general_purpose::URL_SAFE_NO_PAD.encode(sig)
    ))
}

pub fn verify_session(token: &str, key: &[u8]) -> Result<SessionClaims, SessionError> {
    let (payload_b64, sig_b64) = token.split_once('.').ok_or(SessionError::Invalid)?;
    let payload_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| SessionError::Invalid)?;
    let sig_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(sig_b64)
        .map_err(|_| SessionError::Invalid)?;

    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SessionError::Invalid)?;
    mac.update(&payload_bytes);
    mac.verify_slice(&sig_bytes)
        .map_err(|_| SessionError::Signature)?;

    let payload = String::from_utf8(payload_bytes).map_err(|_| SessionError::Invalid)?;
    let (id_raw, exp_raw) = payload.split_once('|').ok_or(SessionError::Invalid)?;
    let session_id = Uuid::parse_str(id_raw).map_err(|_| SessionError::Invalid)?;
    let exp: i64 = exp_raw.parse().map_err(|_| SessionError::Invalid)?;
    if Utc::now().timestamp() > exp {
        return Err(SessionError::Expired);
    }
    Ok(SessionClaims { session_id })
}

pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers.get(header::AUTHORIZATION) {
        if let Ok(val) = auth.to_str() {
            if let Some(bearer) = val.strip_prefix("Bearer ") {
                return Some(bearer.trim().to_string());
            }
        }
    }
    let cookie = headers.get(header::COOKIE)?.to_str().ok()?;
    cookie.split(';').find_map(|pair| {
        pair.trim()
            .strip_prefix("session=")
            .map(|rest| rest.to_string())
    })
}

static SECURE_COOKIES: Lazy<bool> = Lazy::new(|| {
    std::env::var("PRODUCTION").is_ok()
        || std::env::var("RAILWAY_ENVIRONMENT").is_ok()
        || std::env::var("FLY_APP_NAME").is_ok()
});

pub fn session_cookie(token: &str, max_age_secs: i64) -> Result<HeaderValue, ApiError> {
    let secure_flag = if *SECURE_COOKIES { "; Secure" } else { "" };
    HeaderValue::from_str(&format!(
        "{COOKIE_NAME}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}{secure_flag}"
    ))
    .map_err(|e| ApiError::Internal(format!("bad cookie header: {e}")))
}

pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

/// Session id from a valid token whose context is still alive, if any.
pub async fn current_session(headers: &HeaderMap, state: &SharedState) -> Option<Uuid> {
    let token = extract_token(headers)?;
    let claims = verify_session(&token, &state.config.session_key).ok()?;
    state
        .read_session(claims.session_id, |_| ())
        .await
        .map(|_| claims.session_id)
}

/// Axum extractor resolving the caller's live session id.
///
/// Rejects with `401` when the token is missing, tampered, expired, or its
/// context has been discarded.
pub struct ActiveSession(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for ActiveSession
where
    S: Send + Sync,
    SharedState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let shared_state = SharedState::from_ref(state);

        let token = extract_token(&parts.headers).ok_or(ApiError::Unauthorized)?;

        let claims = verify_session(&token, &shared_state.config.session_key).map_err(|e| {
            tracing::warn!("Session verification failed: {}", e);
            ApiError::Unauthorized
        })?;

        if shared_state
            .read_session(claims.session_id, |_| ())
            .await
            .is_none()
        {
            tracing::warn!("Session {} has no live context", claims.session_id);
            return Err(ApiError::Unauthorized);
        }

        Ok(ActiveSession(claims.session_id))
    }
}
