//! Shared gateway state: the ERP client plus the two transient stores
//! (dashboard sessions, in-flight enrollment flows). Nothing here is
//! persisted; losing the process only forces re-login and re-starting
//! incomplete enrollments.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use campusgate_erp::{ErpClient, ErpSession};
use campusgate_students::EnrollmentContext;

/// In-memory session store keyed by the opaque cookie value.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, ErpSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fresh session and return the cookie key for it.
    pub async fn insert(&self, session: ErpSession) -> String {
        let key = Uuid::now_v7().simple().to_string();
        self.inner.write().await.insert(key.clone(), session);
        key
    }

    pub async fn get(&self, key: &str) -> Option<ErpSession> {
        self.inner.read().await.get(key).cloned()
    }

    pub async fn remove(&self, key: &str) {
        self.inner.write().await.remove(key);
    }
}

/// In-memory store of in-flight enrollment flows.
///
/// Each flow holds its context behind its own mutex. Handlers that move a
/// flow forward lock the entry across the remote call, so two concurrent
/// requests for the same flow cannot both read the old context and issue
/// duplicate creations; the second waits and sees the updated state.
#[derive(Clone, Default)]
pub struct FlowStore {
    inner: Arc<RwLock<HashMap<Uuid, Arc<Mutex<EnrollmentContext>>>>>,
}

impl FlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::now_v7();
        let entry = Arc::new(Mutex::new(EnrollmentContext::new()));
        self.inner.write().await.insert(id, entry);
        id
    }

    /// The flow's lockable entry, for handlers that read-modify-write.
    pub async fn entry(&self, id: &Uuid) -> Option<Arc<Mutex<EnrollmentContext>>> {
        self.inner.read().await.get(id).cloned()
    }

    /// Snapshot of the current context, for read-only handlers.
    pub async fn get(&self, id: &Uuid) -> Option<EnrollmentContext> {
        let entry = self.entry(id).await?;
        let context = entry.lock().await.clone();
        Some(context)
    }

    pub async fn set(&self, id: Uuid, context: EnrollmentContext) {
        let entry = Arc::new(Mutex::new(context));
        self.inner.write().await.insert(id, entry);
    }

    /// Drop a finished flow without comment. Used when the workflow reached
    /// `Complete` and there is nothing left to reconcile.
    pub async fn remove(&self, id: &Uuid) -> Option<EnrollmentContext> {
        let entry = self.inner.write().await.remove(id)?;
        let context = entry.lock().await.clone();
        Some(context)
    }

    /// Drop an abandoned flow. Already-created ERP records are NOT deleted;
    /// the ids are logged so an operator can reconcile orphans by hand.
    pub async fn cancel(&self, id: &Uuid) -> Option<EnrollmentContext> {
        let context = self.remove(id).await?;
        let created = context.created_ids();
        if !created.is_empty() && !context.is_complete() {
            tracing::warn!(
                flow = %id,
                ?created,
                "enrollment cancelled, leaving partial records in the ERP"
            );
        }
        Some(context)
    }
}

pub struct AppServices {
    pub erp: Arc<ErpClient>,
    pub sessions: SessionStore,
    pub flows: FlowStore,
}

impl AppServices {
    pub fn new(erp: Arc<ErpClient>) -> Self {
        Self {
            erp,
            sessions: SessionStore::new(),
            flows: FlowStore::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remove_drops_the_flow_and_returns_its_context() {
        let flows = FlowStore::new();
        let id = flows.create().await;

        let context = flows.remove(&id).await.unwrap();
        assert_eq!(context, EnrollmentContext::new());
        assert!(flows.get(&id).await.is_none());
        assert!(flows.remove(&id).await.is_none());
    }

    #[tokio::test]
    async fn entry_lock_serializes_access_to_one_flow() {
        let flows = FlowStore::new();
        let id = flows.create().await;

        let entry = flows.entry(&id).await.unwrap();
        let guard = entry.lock().await;

        let same = flows.entry(&id).await.unwrap();
        assert!(same.try_lock().is_err());

        drop(guard);
        assert!(same.try_lock().is_ok());
    }
}
