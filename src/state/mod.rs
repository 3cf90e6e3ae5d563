use std::sync::Arc;
use std::time::Instant;

use moka::future::Cache;
use sea_orm::DatabaseConnection;

use crate::accounts::generate_token;
use crate::config::{ChamberConfig, SessionConfig};

#[derive(Clone)]
pub struct AppState {
    pub database: DatabaseConnection,
    pub sessions: Arc<SessionStore>,
    pub chamber: ChamberConfig,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        database: DatabaseConnection,
        sessions: Arc<SessionStore>,
        chamber: ChamberConfig,
    ) -> Self {
        assert!(
            chamber.fallback_member_limit > 0,
            "Fallback member limit must be positive"
        );
        Self {
            database,
            sessions,
            chamber,
            start_time: Instant::now(),
        }
    }
}

/// Bearer tokens issued at login, mapped to account ids.
///
/// Entries expire after the configured TTL regardless of activity.
pub struct SessionStore {
    tokens: Cache<String, i32>,
    ttl_seconds: u64,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        assert!(config.max_sessions >= 10, "Session capacity threshold");
        let tokens = Cache::builder()
            .max_capacity(config.max_sessions)
            .time_to_live(config.ttl())
            .build();
        Self {
            tokens,
            ttl_seconds: config.ttl_seconds,
        }
    }

    pub async fn issue(&self, user_id: i32) -> String {
        let token = generate_token();
        self.tokens.insert(token.clone(), user_id).await;
        token
    }

    pub async fn resolve(&self, token: &str) -> Option<i32> {
        self.tokens.get(token).await
    }

    pub async fn revoke(&self, token: &str) {
        self.tokens.invalidate(token).await;
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn entry_count(&self) -> u64 {
        self.tokens.entry_count()
    }
}
