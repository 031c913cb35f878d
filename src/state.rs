use crate::config::AppConfig;
use crate::domain::models::UserProfile;
use crate::domain::progress::ProgressLedger;
use crate::middleware::SendThrottle;
use crate::services::mailer::MailTransport;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Everything one browser session owns. Dropped on logout or expiry.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub email: String,
    pub profile: UserProfile,
    pub diet_generated: bool,
    pub ledger: ProgressLedger,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(email: String, now: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            email,
            profile: UserProfile::default(),
            diet_generated: false,
            ledger: ProgressLedger::new(),
            created_at: now,
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub sessions: RwLock<HashMap<Uuid, SessionContext>>, // session_id -> context
    pub mailer: Arc<dyn MailTransport>,
    pub reminder_throttle: SendThrottle,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: AppConfig, mailer: Arc<dyn MailTransport>) -> Self {
        let reminder_throttle = SendThrottle::new(config.reminder_limit, config.reminder_window_secs);
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
            mailer,
            reminder_throttle,
        }
    }

    /// Creates a fresh context and returns its id together with the expiry.
    pub async fn open_session(&self, email: String) -> (Uuid, DateTime<Utc>) {
        let now = Utc::now();
        let expires_at = now + self.config.session_ttl;
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, SessionContext::new(email, now, expires_at));
        (id, expires_at)
    }

    pub async fn close_session(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        self.reminder_throttle.forget(id).await;
        if let Some(ctx) = &removed {
            let minutes = (Utc::now() - ctx.created_at).num_minutes();
            tracing::info!("Session {} for {} closed after {} min", id, ctx.email, minutes);
        }
        removed.is_some()
    }

    pub async fn read_session<T>(&self, id: Uuid, f: impl FnOnce(&SessionContext) -> T) -> Option<T> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .filter(|ctx| !ctx.is_expired(Utc::now()))
            .map(f)
    }

    pub async fn update_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut SessionContext) -> T,
    ) -> Option<T> {
        let mut sessions = self.sessions.write().await;
        sessions
            .get_mut(&id)
            .filter(|ctx| !ctx.is_expired(Utc::now()))
            .map(f)
    }

    /// Removes expired contexts and returns how many were dropped.
    pub async fn prune_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, ctx| !ctx.is_expired(now));
        before - sessions.len()
    }
}
