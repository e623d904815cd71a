//! In-memory session registry.
//!
//! Keeps sessions in registration order so broadcasts fan out in a stable
//! sequence.
//!
//! # Thread Safety
//!
//! Uses a single `RwLock` over both the ordered map and the id index, so each
//! register/unregister is applied atomically and a snapshot never observes a
//! half-applied change. Snapshots (reads) vastly outnumber joins and leaves.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::broadcast::RegistryError;
use crate::domain::foundation::SessionId;
use crate::ports::{Session, SessionRegistry};

#[derive(Default)]
struct Entries {
    /// Registration slot → session. Iteration order is registration order.
    by_slot: BTreeMap<u64, Arc<dyn Session>>,

    /// Session id → slot for O(log n) removal.
    slots: HashMap<SessionId, u64>,

    next_slot: u64,
}

/// Registry of live sessions backed by process memory.
pub struct InMemorySessionRegistry {
    entries: RwLock<Entries>,
}

impl InMemorySessionRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
        }
    }

    /// Check whether a session id is currently registered.
    pub async fn contains(&self, session_id: &SessionId) -> bool {
        self.entries.read().await.slots.contains_key(session_id)
    }
}

impl Default for InMemorySessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn register(&self, session: Arc<dyn Session>) -> Result<(), RegistryError> {
        let session_id = session.id();
        let mut entries = self.entries.write().await;

        if entries.slots.contains_key(&session_id) {
            return Err(RegistryError::DuplicateSession(session_id));
        }

        let slot = entries.next_slot;
        entries.next_slot += 1;
        entries.slots.insert(session_id, slot);
        entries.by_slot.insert(slot, session);

        tracing::debug!(session_id = %session_id, total = entries.slots.len(), "Session registered");
        Ok(())
    }

    async fn unregister(&self, session_id: &SessionId) -> bool {
        let mut entries = self.entries.write().await;

        match entries.slots.remove(session_id) {
            Some(slot) => {
                entries.by_slot.remove(&slot);
                tracing::debug!(session_id = %session_id, total = entries.slots.len(), "Session unregistered");
                true
            }
            None => false,
        }
    }

    async fn snapshot(&self) -> Vec<Arc<dyn Session>> {
        self.entries.read().await.by_slot.values().cloned().collect()
    }

    async fn len(&self) -> usize {
        self.entries.read().await.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::session::InMemorySession;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn session() -> Arc<InMemorySession> {
        Arc::new(InMemorySession::new())
    }

    fn ids(sessions: &[Arc<dyn Session>]) -> Vec<SessionId> {
        sessions.iter().map(|s| s.id()).collect()
    }

    #[tokio::test]
    async fn register_adds_session() {
        let registry = InMemorySessionRegistry::new();
        let a = session();

        registry.register(a.clone()).await.unwrap();

        assert_eq!(registry.len().await, 1);
        assert!(registry.contains(&a.id()).await);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_id() {
        let registry = InMemorySessionRegistry::new();
        let id = SessionId::new();
        registry
            .register(Arc::new(InMemorySession::with_id(id)))
            .await
            .unwrap();

        let result = registry.register(Arc::new(InMemorySession::with_id(id))).await;

        assert_eq!(result, Err(RegistryError::DuplicateSession(id)));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn unregister_removes_session() {
        let registry = InMemorySessionRegistry::new();
        let a = session();
        registry.register(a.clone()).await.unwrap();

        assert!(registry.unregister(&a.id()).await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn unregister_unknown_is_noop() {
        let registry = InMemorySessionRegistry::new();
        registry.register(session()).await.unwrap();

        assert!(!registry.unregister(&SessionId::new()).await);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn snapshot_preserves_registration_order() {
        let registry = InMemorySessionRegistry::new();
        let (a, b, c) = (session(), session(), session());
        registry.register(a.clone()).await.unwrap();
        registry.register(b.clone()).await.unwrap();
        registry.register(c.clone()).await.unwrap();

        let snapshot = registry.snapshot().await;

        assert_eq!(ids(&snapshot), vec![a.id(), b.id(), c.id()]);
    }

    #[tokio::test]
    async fn snapshot_is_independent_of_later_changes() {
        let registry = InMemorySessionRegistry::new();
        let (a, b) = (session(), session());
        registry.register(a.clone()).await.unwrap();

        let snapshot = registry.snapshot().await;
        registry.register(b).await.unwrap();
        registry.unregister(&a.id()).await;

        assert_eq!(ids(&snapshot), vec![a.id()]);
    }

    #[tokio::test]
    async fn reregister_after_unregister_is_allowed() {
        let registry = InMemorySessionRegistry::new();
        let id = SessionId::new();
        registry
            .register(Arc::new(InMemorySession::with_id(id)))
            .await
            .unwrap();
        registry.unregister(&id).await;

        let result = registry.register(Arc::new(InMemorySession::with_id(id))).await;

        assert!(result.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_register_and_snapshot_stay_consistent() {
        let registry = Arc::new(InMemorySessionRegistry::new());
        let mut tasks = Vec::new();

        for _ in 0..32 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                let s = Arc::new(InMemorySession::new());
                let id = s.id();
                registry.register(s).await.unwrap();
                assert!(ids(&registry.snapshot().await).contains(&id));
                registry.unregister(&id).await;
                assert!(!ids(&registry.snapshot().await).contains(&id));
            }));
        }

        for task in tasks {
            task.await.unwrap();
        }
        assert!(registry.is_empty().await);
    }

    proptest! {
        #[test]
        fn snapshot_matches_model(ops in prop::collection::vec((0usize..8, any::<bool>()), 0..64)) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            let pool: Vec<SessionId> = (0..8).map(|_| SessionId::new()).collect();

            rt.block_on(async {
                let registry = InMemorySessionRegistry::new();
                let mut model: BTreeSet<SessionId> = BTreeSet::new();

                for (index, add) in ops {
                    let id = pool[index];
                    if add {
                        let result = registry
                            .register(Arc::new(InMemorySession::with_id(id)))
                            .await;
                        prop_assert_eq!(result.is_ok(), model.insert(id));
                    } else {
                        prop_assert_eq!(registry.unregister(&id).await, model.remove(&id));
                    }

                    let snapshot: BTreeSet<SessionId> =
                        ids(&registry.snapshot().await).into_iter().collect();
                    prop_assert_eq!(&snapshot, &model);
                }
                Ok::<(), TestCaseError>(())
            })?;
        }
    }
}
