#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::RwLock;

use choubo::modules::event::EventManager;
use choubo::modules::export::ExportManager;
use choubo::modules::ledger::LedgerManager;
use choubo::modules::storage::LocalStore;
use choubo::modules::sync::{RelayStore, SyncError, SyncManager};
use choubo::LedgerDocument;

/// リレー呼び出しを記録する共有モックリレー。複数デバイスから同時に使う
pub struct MockRelay {
    documents: Arc<RwLock<HashMap<String, LedgerDocument>>>,
    pushes: Arc<RwLock<Vec<(String, LedgerDocument)>>>,
    failing: Arc<RwLock<bool>>,
}

impl MockRelay {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            pushes: Arc::new(RwLock::new(Vec::new())),
            failing: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    pub async fn remote(&self, key: &str) -> Option<LedgerDocument> {
        self.documents.read().await.get(key).cloned()
    }

    pub async fn push_count(&self) -> usize {
        self.pushes.read().await.len()
    }
}

#[async_trait]
impl RelayStore for MockRelay {
    async fn create(&self, doc: &LedgerDocument) -> Result<String, SyncError> {
        if *self.failing.read().await {
            return Err(SyncError::RelayUnavailable("simulated outage".to_string()));
        }

        let key = format!("shared-{}", self.documents.read().await.len() + 1);
        self.documents
            .write()
            .await
            .insert(key.clone(), doc.clone());
        Ok(key)
    }

    async fn push(&self, key: &str, doc: &LedgerDocument) -> Result<(), SyncError> {
        if *self.failing.read().await {
            return Err(SyncError::RelayUnavailable("simulated outage".to_string()));
        }

        self.pushes
            .write()
            .await
            .push((key.to_string(), doc.clone()));
        self.documents
            .write()
            .await
            .insert(key.to_string(), doc.clone());
        Ok(())
    }

    async fn pull(&self, key: &str) -> Result<Option<LedgerDocument>, SyncError> {
        if *self.failing.read().await {
            return Err(SyncError::RelayUnavailable("simulated outage".to_string()));
        }

        Ok(self.documents.read().await.get(key).cloned())
    }
}

/// 1 台のデバイス相当のモジュール一式
pub struct Device {
    pub events: Arc<EventManager>,
    pub store: Arc<LocalStore>,
    pub sync: Arc<SyncManager>,
    pub ledger: Arc<LedgerManager>,
    pub export: Arc<ExportManager>,
    _temp_dir: TempDir,
}

impl Device {
    pub fn new(relay: Arc<MockRelay>) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let events = Arc::new(EventManager::new());
        let store = Arc::new(LocalStore::new(
            temp_dir.path().to_path_buf(),
            Arc::clone(&events),
        ));
        let sync = Arc::new(SyncManager::new(Arc::clone(&store), relay));
        let ledger = Arc::new(LedgerManager::new(Arc::clone(&store), Arc::clone(&sync)));
        let export = Arc::new(ExportManager::new(Arc::clone(&store), Arc::clone(&sync)));

        Self {
            events,
            store,
            sync,
            ledger,
            export,
            _temp_dir: temp_dir,
        }
    }
}
