//! The session store.
//!
//! Maps session ids to games. Each game sits behind its own async mutex,
//! so actions against one session run strictly one after another while
//! other sessions proceed in parallel. The id map itself is only locked
//! long enough to look up, insert, or drop entries.

use pawsmonaut_core::{Game, GameSnapshot, PlayerAction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::Result;

/// Opaque session identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for SessionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug)]
struct Session {
    game: Game,
    last_active: Instant,
}

impl Session {
    fn touch(&mut self) {
        self.last_active = Instant::now();
    }
}

type SessionHandle = Arc<Mutex<Session>>;

/// Concurrent store of running games.
///
/// # Lifecycle
///
/// `create` → `submit` / `snapshot` by id → `remove`, idle expiry, or
/// eviction when the store is full.
///
/// # Example
///
/// ```rust
/// use pawsmonaut_core::{Location, PlayerAction};
/// use pawsmonaut_session::{SessionConfig, SessionStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), pawsmonaut_session::SessionError> {
/// let store = SessionStore::new(SessionConfig::default())?;
/// let (id, start) = store.create(Some("Pawsmonaut Prime")).await?;
/// assert_eq!(start.turn, 1);
///
/// let day = store.submit(id, PlayerAction::night(Location::MedBay)).await?;
/// assert_eq!(day.turn, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SessionStore {
    config: SessionConfig,
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionStore {
    /// Creates an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] or a wrapped game configuration
    /// error if the configuration is unusable.
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        info!(
            max_sessions = config.max_sessions,
            idle_timeout_secs = config.idle_timeout_secs,
            "session store initialized"
        );
        Ok(Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Starts a new game and returns its id and first snapshot.
    pub async fn create(&self, player_name: Option<&str>) -> Result<(SessionId, GameSnapshot)> {
        let game = Game::new(self.config.game.clone(), player_name)?;
        let snapshot = game.snapshot();
        let id = SessionId::generate();

        let mut sessions = self.sessions.write().await;
        self.make_room(&mut sessions)?;
        sessions.insert(
            id,
            Arc::new(Mutex::new(Session {
                game,
                last_active: Instant::now(),
            })),
        );

        info!(session = %id, live = sessions.len(), "session created");
        Ok((id, snapshot))
    }

    /// Applies an action to the session's game.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotFound`] for unknown or expired ids
    /// - [`SessionError::Game`] when the game rejects the action
    pub async fn submit(&self, id: SessionId, action: PlayerAction) -> Result<GameSnapshot> {
        let handle = self.handle(id).await?;
        let mut session = self.lock_live(id, &handle).await?;

        debug!(session = %id, ?action, "applying action");
        let snapshot = session.game.submit(action)?;
        session.touch();
        Ok(snapshot)
    }

    /// Parses a JSON action and applies it.
    pub async fn submit_json(
        &self,
        id: SessionId,
        payload: serde_json::Value,
    ) -> Result<GameSnapshot> {
        let handle = self.handle(id).await?;
        let mut session = self.lock_live(id, &handle).await?;

        let snapshot = session.game.submit_json(payload)?;
        session.touch();
        Ok(snapshot)
    }

    /// Current snapshot of a session's game.
    pub async fn snapshot(&self, id: SessionId) -> Result<GameSnapshot> {
        let handle = self.handle(id).await?;
        let mut session = self.lock_live(id, &handle).await?;
        session.touch();
        Ok(session.game.snapshot())
    }

    /// Drops a session. Returns whether it existed.
    pub async fn remove(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            debug!(session = %id, "session removed");
        }
        removed
    }

    /// Drops every session idle past the timeout. Returns how many went.
    pub async fn evict_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let expired = self.expired_ids(&sessions);
        for id in &expired {
            sessions.remove(id);
            warn!(session = %id, "session expired");
        }
        expired.len()
    }

    /// Number of sessions held, expired ones included until evicted.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    async fn handle(&self, id: SessionId) -> Result<SessionHandle> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    /// Locks a session, dropping it instead if it sat idle too long.
    async fn lock_live<'a>(
        &self,
        id: SessionId,
        handle: &'a SessionHandle,
    ) -> Result<tokio::sync::MutexGuard<'a, Session>> {
        let session = handle.lock().await;
        if self.is_expired(&session, Instant::now()) {
            drop(session);
            self.sessions.write().await.remove(&id);
            warn!(session = %id, "session expired");
            return Err(SessionError::NotFound(id));
        }
        Ok(session)
    }

    fn is_expired(&self, session: &Session, now: Instant) -> bool {
        now.saturating_duration_since(session.last_active) > self.config.idle_timeout()
    }

    /// Ids of idle sessions. Sessions locked by an in-flight action are
    /// active and skipped.
    fn expired_ids(&self, sessions: &HashMap<SessionId, SessionHandle>) -> Vec<SessionId> {
        let now = Instant::now();
        sessions
            .iter()
            .filter(|(_, handle)| {
                handle
                    .try_lock()
                    .map(|session| self.is_expired(&session, now))
                    .unwrap_or(false)
            })
            .map(|(id, _)| *id)
            .collect()
    }

    /// Frees a slot when the store is full: expired sessions first, then
    /// the least recently active one.
    fn make_room(&self, sessions: &mut HashMap<SessionId, SessionHandle>) -> Result<()> {
        let limit = self.config.max_sessions;
        if sessions.len() < limit {
            return Ok(());
        }

        for id in self.expired_ids(sessions) {
            sessions.remove(&id);
            warn!(session = %id, "session expired");
        }
        if sessions.len() < limit {
            return Ok(());
        }

        let oldest = sessions
            .iter()
            .filter_map(|(id, handle)| {
                handle
                    .try_lock()
                    .ok()
                    .map(|session| (*id, session.last_active))
            })
            .min_by_key(|(_, last_active)| *last_active)
            .map(|(id, _)| id);

        match oldest {
            Some(id) => {
                sessions.remove(&id);
                warn!(session = %id, "evicted least recently active session");
                Ok(())
            }
            None => Err(SessionError::CapacityExceeded { limit }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawsmonaut_core::{GameError, Location};
    use std::time::Duration;

    fn store_with(max_sessions: usize) -> SessionStore {
        let mut config = SessionConfig::default();
        config.game.seed = Some(11);
        config.max_sessions = max_sessions;
        config.idle_timeout_secs = 60;
        SessionStore::new(config).unwrap()
    }

    #[test]
    fn test_session_id_parse_and_display() {
        let id = SessionId::generate();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<SessionId>().is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SessionConfig {
            max_sessions: 0,
            ..SessionConfig::default()
        };
        assert!(SessionStore::new(config).is_err());
    }

    #[tokio::test]
    async fn test_create_and_submit() {
        let store = store_with(4);
        let (id, start) = store.create(None).await.unwrap();
        assert_eq!(start.turn, 1);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.config().idle_timeout(), Duration::from_secs(60));

        let day = store
            .submit(id, PlayerAction::night(Location::Cafeteria))
            .await
            .unwrap();
        assert_eq!(day.turn, 1);
        assert_eq!(store.snapshot(id).await.unwrap(), day);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let store = store_with(4);
        let id = SessionId::generate();
        let err = store.submit(id, PlayerAction::abstain()).await.unwrap_err();
        assert!(matches!(err, SessionError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_game_errors_pass_through() {
        let store = store_with(4);
        let (id, _) = store.create(None).await.unwrap();
        let err = store
            .submit_json(id, serde_json::json!({"type": "night_action"}))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Game(GameError::InvalidAction(_))));
        assert!(err.is_rejected_action());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = store_with(4);
        let (id, _) = store.create(None).await.unwrap();
        assert!(store.remove(id).await);
        assert!(!store.remove(id).await);
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_expire() {
        let store = store_with(4);
        let (stale, _) = store.create(None).await.unwrap();
        tokio::time::advance(Duration::from_secs(45)).await;
        let (fresh, _) = store.create(None).await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;

        assert_eq!(store.evict_expired().await, 1);
        assert!(matches!(
            store.snapshot(stale).await,
            Err(SessionError::NotFound(_))
        ));
        assert!(store.snapshot(fresh).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_session_rejected_on_access() {
        let store = store_with(4);
        let (id, _) = store.create(None).await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;

        let err = store.submit(id, PlayerAction::abstain()).await.unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_store_evicts_least_recently_active() {
        let store = store_with(2);
        let (first, _) = store.create(None).await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        let (second, _) = store.create(None).await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;

        // Touch the first so the second becomes the oldest.
        store.snapshot(first).await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;

        let (third, _) = store.create(None).await.unwrap();
        assert_eq!(store.len().await, 2);
        assert!(store.snapshot(first).await.is_ok());
        assert!(store.snapshot(third).await.is_ok());
        assert!(matches!(
            store.snapshot(second).await,
            Err(SessionError::NotFound(_))
        ));
    }
}
