//! Per-session send budget for reminder mail.
//!
//! A session holds at most `limit` slots inside a sliding window. A slot is
//! taken before the send and handed back when the send fails, so only
//! delivered mail counts against the budget.
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Proof of a taken slot; pass it back to [`SendThrottle::release`] to refund it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendSlot {
    session: Uuid,
    taken_at: Instant,
}

#[derive(Clone)]
pub struct SendThrottle {
    sent: Arc<Mutex<HashMap<Uuid, VecDeque<Instant>>>>,
    limit: usize,
    window: Duration,
}

impl SendThrottle {
    pub fn new(limit: usize, window_secs: u64) -> Self {
        Self {
            sent: Arc::new(Mutex::new(HashMap::new())),
            limit,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Takes a slot for `session`, or `None` when its window is full.
    pub async fn acquire(&self, session: Uuid) -> Option<SendSlot> {
        let now = Instant::now();
        let mut sent = self.sent.lock().await;
        let stamps = sent.entry(session).or_default();
        drain_expired(stamps, now, self.window);

        if stamps.len() >= self.limit {
            return None;
        }
        stamps.push_back(now);
        Some(SendSlot {
            session,
            taken_at: now,
        })
    }

    /// Gives a slot back after a failed send.
    pub async fn release(&self, slot: SendSlot) {
        let mut sent = self.sent.lock().await;
        if let Some(stamps) = sent.get_mut(&slot.session) {
            if let Some(pos) = stamps.iter().rposition(|&at| at == slot.taken_at) {
                stamps.remove(pos);
            }
            if stamps.is_empty() {
                sent.remove(&slot.session);
            }
        }
    }

    /// Drops the budget of a session that has been closed.
    pub async fn forget(&self, session: Uuid) {
        self.sent.lock().await.remove(&session);
    }

    /// Drops sessions whose slots have all aged out; returns how many remain.
    pub async fn prune(&self) -> usize {
        let now = Instant::now();
        let mut sent = self.sent.lock().await;
        sent.retain(|_, stamps| {
            drain_expired(stamps, now, self.window);
            !stamps.is_empty()
        });
        sent.len()
    }
}

// Stamps are pushed in time order, so expired ones sit at the front.
fn drain_expired(stamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&oldest) = stamps.front() {
        if now.duration_since(oldest) < window {
            break;
        }
        stamps.pop_front();
    }
}
