use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::error::{Result, SyncError};
use super::reconciler::reconcile;
use super::relay::RelayStore;
use crate::modules::ledger::types::LedgerDocument;
use crate::modules::storage::LocalStore;

/// 同期状態のスナップショット
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SyncStatus {
    pub is_syncing: bool,
    pub last_sync: Option<i64>,
    pub sync_errors: u32,
}

/// 同期セッション（同期キーの作成・参加・解除）と定期リコンサイルの管理者。
/// リモート読みでローカルを上書きしてよいのはこのマネージャーだけ
pub struct SyncManager {
    store: Arc<LocalStore>,
    relay: Arc<dyn RelayStore>,
    status: Arc<RwLock<SyncStatus>>,
}

impl SyncManager {
    pub fn new(store: Arc<LocalStore>, relay: Arc<dyn RelayStore>) -> Self {
        Self {
            store,
            relay,
            status: Arc::new(RwLock::new(SyncStatus {
                is_syncing: false,
                last_sync: None,
                sync_errors: 0,
            })),
        }
    }

    /// 同期キーが設定されているか
    pub fn is_linked(&self) -> bool {
        self.store.sync_key().is_some()
    }

    pub fn sync_key(&self) -> Option<String> {
        self.store.sync_key()
    }

    /// 現在のローカルドキュメントを初期値として新しい同期セッションを作成する。
    /// リレーへの作成が失敗した場合はキーを設定せず RelayUnavailable を返す
    pub async fn start_new_sync(&self) -> Result<String> {
        let doc = self.store.read();
        let key = self.relay.create(&doc.stripped()).await?;
        self.store.set_sync_key(Some(&key))?;

        info!("Created new sync session: {}", key);
        Ok(key)
    }

    /// 既存の同期キーに参加する。キーの実在確認は次回の pull に委ねる
    pub async fn join_sync(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(SyncError::InvalidKey(
                "sync key must not be empty".to_string(),
            ));
        }

        self.store.set_sync_key(Some(key))?;
        info!("Joined sync session: {}", key);
        Ok(())
    }

    /// 同期セッションを解除する。ローカルデータはそのまま残る
    pub async fn leave_sync(&self) -> Result<()> {
        self.store.set_sync_key(None)?;
        info!("Left sync session");
        Ok(())
    }

    /// pull → reconcile → 必要なら上書き、を 1 回実行する。
    /// 定期タイマー・手動同期・フォーカス復帰のすべてがここを通り、
    /// 実行中ならキューに積まず何もしない。
    /// 戻り値はリモートがローカルを上書きしたかどうか
    pub async fn sync_now(&self) -> Result<bool> {
        let Some(key) = self.store.sync_key() else {
            return Ok(false);
        };

        {
            let mut status = self.status.write().await;
            if status.is_syncing {
                return Ok(false);
            }
            status.is_syncing = true;
        }

        let result = self.pull_and_reconcile(&key).await;

        let mut status = self.status.write().await;
        status.is_syncing = false;
        match &result {
            Ok(_) => status.last_sync = Some(Utc::now().timestamp_millis()),
            Err(_) => status.sync_errors += 1,
        }

        result
    }

    async fn pull_and_reconcile(&self, key: &str) -> Result<bool> {
        let remote = match self.relay.pull(key).await {
            Ok(remote) => remote,
            Err(SyncError::MalformedRemoteDocument(e)) => {
                // 解釈できないリモートは存在しないものとして扱い、何もしない
                warn!("Remote document is malformed, skipping reconcile: {}", e);
                None
            }
            Err(e) => return Err(e),
        };

        let local = self.store.read();
        let (merged, overwritten) = reconcile(local, remote);
        if overwritten {
            self.store.write(&merged)?;
            info!("Local ledger overwritten by newer remote document");
        }

        Ok(overwritten)
    }

    /// Linked の場合のみ、バックグラウンドでリモートへ push する。
    /// 失敗はログに残すだけで、呼び出し元のローカル変更には影響しない
    pub fn push_in_background(&self, doc: LedgerDocument) {
        let Some(key) = self.store.sync_key() else {
            return;
        };

        let payload = doc.stripped();
        let relay = Arc::clone(&self.relay);
        tokio::spawn(async move {
            if let Err(e) = relay.push(&key, &payload).await {
                warn!("Cloud push failed: {}", e);
            }
        });
    }

    pub async fn get_status(&self) -> SyncStatus {
        self.status.read().await.clone()
    }

    /// 定期同期ループを起動する。初回の tick は即時に発火する（起動時同期）
    pub fn schedule_sync(self: &Arc<Self>, interval_secs: u64) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

            loop {
                interval.tick().await;

                if let Err(e) = manager.sync_now().await {
                    error!("Sync error: {}", e);
                }
            }
        })
    }
}
