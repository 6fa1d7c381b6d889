use super::session::{GameSession, SessionPhase};
use crate::types::ChatId;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

#[derive(Debug)]
struct SessionSlot {
    session: GameSession,
    last_activity: Instant,
}

impl SessionSlot {
    fn new() -> Self {
        Self {
            session: GameSession::new(),
            last_activity: Instant::now(),
        }
    }
}

/// Exclusive access to one chat's session. Other events for the same chat
/// wait until the guard is dropped.
pub struct SessionGuard {
    chat_id: ChatId,
    inner: OwnedMutexGuard<SessionSlot>,
}

impl SessionGuard {
    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }
}

impl Deref for SessionGuard {
    type Target = GameSession;

    fn deref(&self) -> &GameSession {
        &self.inner.session
    }
}

impl DerefMut for SessionGuard {
    fn deref_mut(&mut self) -> &mut GameSession {
        &mut self.inner.session
    }
}

/// Chat id → session map with one lock per chat
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<ChatId, Arc<Mutex<SessionSlot>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, chat_id: ChatId) -> Arc<Mutex<SessionSlot>> {
        let existing = self.sessions.read().await.get(&chat_id).cloned();
        if let Some(slot) = existing {
            return slot;
        }

        self.sessions
            .write()
            .await
            .entry(chat_id)
            .or_insert_with(|| {
                tracing::debug!(chat_id, "Creating session");
                Arc::new(Mutex::new(SessionSlot::new()))
            })
            .clone()
    }

    /// Lock a chat's session, creating an empty one on first use
    pub async fn lock(&self, chat_id: ChatId) -> SessionGuard {
        let slot = self.slot(chat_id).await;
        let mut inner = slot.lock_owned().await;
        inner.last_activity = Instant::now();
        SessionGuard { chat_id, inner }
    }

    /// Snapshot of a chat's session, creating an empty one on first use
    pub async fn get_or_create(&self, chat_id: ChatId) -> GameSession {
        self.lock(chat_id).await.clone()
    }

    /// Overwrite a chat's session
    pub async fn save(&self, chat_id: ChatId, session: GameSession) {
        *self.lock(chat_id).await = session;
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Number of chats with a live word. Sessions busy with an event are skipped.
    pub async fn active_rounds(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .filter(|slot| {
                slot.try_lock()
                    .map(|s| matches!(s.session.phase(), SessionPhase::WordHidden { .. }))
                    .unwrap_or(false)
            })
            .count()
    }

    /// Drop fresh sessions that have not seen an event for `ttl`. A session
    /// that ever started a game keeps its host, word and restart cooldown.
    /// Sessions that are locked or about to be locked are kept.
    /// Returns the number removed.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(s) => !s.session.is_fresh() || s.last_activity.elapsed() < ttl,
                Err(_) => true,
            }
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }
}

/// Periodically evict sessions idle for longer than `ttl`
pub fn spawn_session_sweeper(store: Arc<SessionStore>, ttl: Duration, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            store.evict_idle(ttl).await;
        }
    });
}
