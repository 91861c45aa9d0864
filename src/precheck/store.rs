use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::Mutex;

use crate::precheck::session::PrecheckSession;

/// In-memory session repository with idle-based eviction.
///
/// The map is safe for concurrent create/read/invalidate across serving
/// contexts; the per-session mutex serializes writers against the same id.
/// Completed and abandoned sessions age out after the configured idle time.
pub struct SessionStore {
    sessions: Cache<String, Arc<Mutex<PrecheckSession>>>,
}

impl SessionStore {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let sessions = Cache::builder()
            .max_capacity(capacity)
            .time_to_idle(Duration::from_secs(ttl_secs))
            .build();

        Self { sessions }
    }

    pub async fn put(&self, session: PrecheckSession) {
        self.sessions
            .insert(session.session_id.clone(), Arc::new(Mutex::new(session)))
            .await;
    }

    pub async fn get(&self, session_id: &str) -> Option<Arc<Mutex<PrecheckSession>>> {
        self.sessions.get(session_id).await
    }

    pub async fn remove(&self, session_id: &str) {
        self.sessions.invalidate(session_id).await;
    }

    pub fn entry_count(&self) -> u64 {
        self.sessions.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_remove() {
        let store = SessionStore::new(100, 60);
        store
            .put(PrecheckSession::new("s1".into(), "u1".into(), "p1".into()))
            .await;

        let entry = store.get("s1").await.expect("session present");
        assert_eq!(entry.lock().await.user_id, "u1");

        store.remove("s1").await;
        assert!(store.get("s1").await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let store = SessionStore::new(100, 60);
        assert!(store.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_same_id_writers_serialize() {
        let store = Arc::new(SessionStore::new(100, 60));
        store
            .put(PrecheckSession::new("s1".into(), "u1".into(), "p1".into()))
            .await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let entry = store.get("s1").await.unwrap();
                let mut session = entry.lock().await;
                session.turn_count += 1;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let entry = store.get("s1").await.unwrap();
        assert_eq!(entry.lock().await.turn_count, 8);
    }
}
