//! # Pawsmonaut Sessions
//!
//! Keeps many games alive at once, keyed by an opaque session id.
//!
//! ## Guarantees
//!
//! | Concern | Behaviour |
//! |---------|-----------|
//! | Same session | Actions applied strictly in arrival order |
//! | Different sessions | Run in parallel, no shared lock held during play |
//! | Idle sessions | Dropped after `idle_timeout_secs` without activity |
//! | Full store | Expired sessions go first, then the least recently active |
//!
//! ## Architecture
//!
//! ```text
//!   create ──▶ ┌──────────────────────────────────────┐
//!   submit ──▶ │ SessionStore                          │
//!              │  RwLock<HashMap<SessionId, Handle>>   │
//!              └───────┬───────────────┬──────────────┘
//!                      ▼               ▼
//!               Mutex<Session>   Mutex<Session>   ...
//!                 (Game)           (Game)
//! ```
//!
//! Unknown and expired ids both surface as [`SessionError::NotFound`], the
//! per-session equivalent of the core's "no active game".

pub mod config;
pub mod error;
pub mod store;

pub use config::SessionConfig;
pub use error::SessionError;
pub use store::{SessionId, SessionStore};

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
