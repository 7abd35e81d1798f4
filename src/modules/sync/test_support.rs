use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::{Result, SyncError};
use super::relay::RelayStore;
use crate::modules::ledger::types::LedgerDocument;

/// リレー呼び出しを受け取ったまま記録するテスト用実装
pub struct MockRelay {
    documents: Arc<RwLock<HashMap<String, LedgerDocument>>>,
    creates: Arc<RwLock<Vec<LedgerDocument>>>,
    pushes: Arc<RwLock<Vec<(String, LedgerDocument)>>>,
    pull_count: Arc<RwLock<u32>>,
    failing: Arc<RwLock<bool>>,
}

impl MockRelay {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            creates: Arc::new(RwLock::new(Vec::new())),
            pushes: Arc::new(RwLock::new(Vec::new())),
            pull_count: Arc::new(RwLock::new(0)),
            failing: Arc::new(RwLock::new(false)),
        }
    }

    /// 全リクエストが失敗するリレー（停止状態のシミュレーション）
    pub fn failing() -> Self {
        Self {
            failing: Arc::new(RwLock::new(true)),
            ..Self::new()
        }
    }

    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    pub async fn set_remote(&self, key: &str, doc: LedgerDocument) {
        self.documents.write().await.insert(key.to_string(), doc);
    }

    pub async fn remote(&self, key: &str) -> Option<LedgerDocument> {
        self.documents.read().await.get(key).cloned()
    }

    pub async fn creates(&self) -> Vec<LedgerDocument> {
        self.creates.read().await.clone()
    }

    pub async fn pushes(&self) -> Vec<(String, LedgerDocument)> {
        self.pushes.read().await.clone()
    }

    pub async fn push_count(&self) -> usize {
        self.pushes.read().await.len()
    }

    pub async fn create_count(&self) -> usize {
        self.creates.read().await.len()
    }

    pub async fn pull_count(&self) -> u32 {
        *self.pull_count.read().await
    }
}

#[async_trait]
impl RelayStore for MockRelay {
    async fn create(&self, doc: &LedgerDocument) -> Result<String> {
        if *self.failing.read().await {
            return Err(SyncError::RelayUnavailable("simulated outage".to_string()));
        }

        self.creates.write().await.push(doc.clone());
        let key = format!("mock-{}", self.creates.read().await.len());
        self.documents
            .write()
            .await
            .insert(key.clone(), doc.clone());
        Ok(key)
    }

    async fn push(&self, key: &str, doc: &LedgerDocument) -> Result<()> {
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

    async fn pull(&self, key: &str) -> Result<Option<LedgerDocument>> {
        if *self.failing.read().await {
            return Err(SyncError::RelayUnavailable("simulated outage".to_string()));
        }

        *self.pull_count.write().await += 1;
        Ok(self.documents.read().await.get(key).cloned())
    }
}
