//! Session: one user's in-progress SOW.
//!
//! Held only in process memory. Each session sits behind its own mutex; the
//! store's map lock is held just long enough to clone the handle out.
//! Sessions idle for longer than the store's TTL are evicted when the next
//! session is created.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::document::timeline::TimelineTable;
use crate::intake::models::IntakeRecord;

/// Cover-page inputs supplied by the user.
#[derive(Debug, Clone)]
pub struct Branding {
    pub customer_logo: Option<Bytes>,
    pub document_date: NaiveDate,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            customer_logo: None,
            document_date: Local::now().date_naive(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SowSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub intake: IntakeRecord,
    /// Last generated (or user-edited) document text. Empty until generated.
    pub generated_text: String,
    pub timeline: TimelineTable,
    pub branding: Branding,
}

/// JSON view of a session. Logo bytes are reported, not echoed.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub intake: IntakeRecord,
    pub generated_text: String,
    pub timeline: TimelineTable,
    pub document_date: NaiveDate,
    pub has_customer_logo: bool,
}

impl SowSession {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            intake: IntakeRecord::default(),
            generated_text: String::new(),
            timeline: TimelineTable::default(),
            branding: Branding::default(),
        }
    }

    /// Returns every field to its default. The id and creation time survive.
    pub fn reset(&mut self) {
        *self = Self {
            id: self.id,
            created_at: self.created_at,
            ..Self::new(self.id)
        };
    }

    pub fn has_document(&self) -> bool {
        !self.generated_text.trim().is_empty()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            created_at: self.created_at,
            intake: self.intake.clone(),
            generated_text: self.generated_text.clone(),
            timeline: self.timeline.clone(),
            document_date: self.branding.document_date,
            has_customer_logo: self.branding.customer_logo.is_some(),
        }
    }
}

pub type SessionHandle = Arc<Mutex<SowSession>>;

struct StoredSession {
    handle: SessionHandle,
    last_touched: Instant,
}

/// In-memory session registry shared across handlers.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, StoredSession>>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl,
        }
    }

    pub async fn create(&self) -> SessionHandle {
        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(SowSession::new(id)));
        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions);
        sessions.insert(
            id,
            StoredSession {
                handle: handle.clone(),
                last_touched: Instant::now(),
            },
        );
        handle
    }

    /// Looks up a session and marks it as used.
    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions.get_mut(&id)?;
        stored.last_touched = Instant::now();
        Some(stored.handle.clone())
    }

    /// Returns `false` when no such session exists.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions idle past the TTL. A session whose handle is still held
    /// by a request is in use and stays.
    fn evict_idle(&self, sessions: &mut HashMap<Uuid, StoredSession>) {
        let before = sessions.len();
        sessions.retain(|_, stored| {
            stored.last_touched.elapsed() < self.idle_ttl || Arc::strong_count(&stored.handle) > 1
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle session(s)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::timeline::PocDuration;

    #[test]
    fn test_reset_restores_defaults_and_keeps_identity() {
        let id = Uuid::new_v4();
        let mut session = SowSession::new(id);
        let created_at = session.created_at;
        session.generated_text = "# 1 TABLE OF CONTENTS".to_string();
        session.intake.industry = "Telecom".to_string();
        session.timeline.set_duration(PocDuration::TwoWeeks);
        session.branding.customer_logo = Some(Bytes::from_static(b"png"));

        session.reset();

        assert_eq!(session.id, id);
        assert_eq!(session.created_at, created_at);
        assert!(!session.has_document());
        assert_eq!(session.intake, IntakeRecord::default());
        assert_eq!(session.timeline, TimelineTable::default());
        assert!(session.branding.customer_logo.is_none());
    }

    #[test]
    fn test_snapshot_reports_logo_presence() {
        let mut session = SowSession::new(Uuid::new_v4());
        assert!(!session.snapshot().has_customer_logo);
        session.branding.customer_logo = Some(Bytes::from_static(b"png"));
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["has_customer_logo"], true);
        assert_eq!(json["timeline"]["duration"], "four_weeks");
    }

    const TTL: Duration = Duration::from_secs(60 * 60);

    async fn create_id(store: &SessionStore) -> Uuid {
        let handle = store.create().await;
        let id = handle.lock().await.id;
        id
    }

    #[tokio::test]
    async fn test_store_create_get_and_remove() {
        let store = SessionStore::new(TTL);
        let id = create_id(&store).await;
        assert!(store.get(id).await.is_some());
        assert!(store.get(Uuid::new_v4()).await.is_none());
        assert_eq!(store.len().await, 1);

        assert!(store.remove(id).await);
        assert!(!store.remove(id).await);
        assert!(store.get(id).await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_evicted_on_create() {
        let store = SessionStore::new(TTL);
        let stale = create_id(&store).await;
        let active = create_id(&store).await;

        tokio::time::advance(TTL / 2).await;
        assert!(store.get(active).await.is_some());
        tokio::time::advance(TTL / 2 + Duration::from_secs(1)).await;

        let fresh = create_id(&store).await;
        assert!(store.get(stale).await.is_none());
        assert!(store.get(active).await.is_some());
        assert!(store.get(fresh).await.is_some());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sessions_in_use_survive_eviction() {
        let store = SessionStore::new(TTL);
        let held = store.create().await;
        let id = held.lock().await.id;

        tokio::time::advance(TTL * 2).await;
        create_id(&store).await;

        assert!(store.get(id).await.is_some());
        drop(held);
    }
}
