use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::error::{Result, SyncError};
use crate::modules::ledger::types::LedgerDocument;
use crate::shared::config::RelayConfig;

/// JSON ドキュメントリレーへの操作。実装は送信前に securityLogs を必ず空にする
#[async_trait]
pub trait RelayStore: Send + Sync {
    /// ドキュメントを初期値として新しいリモートドキュメントを作成し、キーを返す
    async fn create(&self, doc: &LedgerDocument) -> Result<String>;

    /// キーに対応するリモートドキュメントを丸ごと置き換える
    async fn push(&self, key: &str, doc: &LedgerDocument) -> Result<()>;

    /// キーに対応するリモートドキュメントを取得する。存在しなければ None
    async fn pull(&self, key: &str) -> Result<Option<LedgerDocument>>;
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    #[serde(default)]
    id: Option<String>,
}

/// npoint.io 互換リレーの HTTP クライアント
pub struct RelayClient {
    base_url: String,
    client: reqwest::Client,
}

impl RelayClient {
    pub fn new(config: &RelayConfig) -> Result<Self> {
        // タイムアウトを付けないと失敗したリクエストが同期ガードを占有し続ける
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn document_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[async_trait]
impl RelayStore for RelayClient {
    async fn create(&self, doc: &LedgerDocument) -> Result<String> {
        let response = self
            .client
            .post(&self.base_url)
            .json(&doc.stripped())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::RelayUnavailable(format!(
                "relay rejected document creation: {}",
                response.status()
            )));
        }

        let body: CreateResponse = response.json().await?;
        match body.id {
            Some(id) if !id.is_empty() => {
                debug!("Created remote document: {}", id);
                Ok(id)
            }
            _ => Err(SyncError::RelayUnavailable(
                "relay response carried no document id".to_string(),
            )),
        }
    }

    async fn push(&self, key: &str, doc: &LedgerDocument) -> Result<()> {
        let response = self
            .client
            .put(self.document_url(key))
            .json(&doc.stripped())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::RelayUnavailable(format!(
                "relay rejected push: {}",
                response.status()
            )));
        }

        debug!("Pushed ledger document to relay: {}", key);
        Ok(())
    }

    async fn pull(&self, key: &str) -> Result<Option<LedgerDocument>> {
        let response = self.client.get(self.document_url(key)).send().await?;

        if !response.status().is_success() {
            debug!(
                "No remote document available for {} ({})",
                key,
                response.status()
            );
            return Ok(None);
        }

        let raw = response.text().await?;
        let mut doc: LedgerDocument = serde_json::from_str(&raw)
            .map_err(|e| SyncError::MalformedRemoteDocument(e.to_string()))?;

        // リモート側の securityLogs はこのデバイスへ決して取り込まない
        doc.security_logs.clear();
        Ok(Some(doc))
    }
}
