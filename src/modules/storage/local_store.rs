use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::warn;

use crate::modules::event::{EventManager, LedgerEvent};
use crate::modules::ledger::types::LedgerDocument;

/// 台帳ドキュメントのストレージキー
const DOCUMENT_KEY: &str = "design_ledger_db";
/// 同期キーのストレージキー。ドキュメントとは別ファイルで持つ
const SYNC_KEY: &str = "design_ledger_sync_id";

/// 台帳ドキュメントを単一の JSON ファイルとして永続化するストア。
/// ドキュメントの正本はここだけが所有し、書き込みのたびに購読者へ通知する
pub struct LocalStore {
    data_dir: PathBuf,
    events: Arc<EventManager>,
}

impl LocalStore {
    pub fn new(data_dir: PathBuf, events: Arc<EventManager>) -> Self {
        Self { data_dir, events }
    }

    fn document_path(&self) -> PathBuf {
        self.data_dir.join(format!("{DOCUMENT_KEY}.json"))
    }

    fn sync_key_path(&self) -> PathBuf {
        self.data_dir.join(SYNC_KEY)
    }

    /// 現在のドキュメントを返す。未保存・破損の場合は初期ドキュメントを返し、失敗しない
    pub fn read(&self) -> LedgerDocument {
        let raw = match fs::read_to_string(self.document_path()) {
            Ok(raw) => raw,
            Err(_) => return LedgerDocument::seeded(),
        };

        match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                // 解釈できない保存データは存在しないものとして扱う
                warn!(
                    "Persisted ledger document is malformed, falling back to default: {}",
                    e
                );
                LedgerDocument::seeded()
            }
        }
    }

    /// ドキュメントを書き込み、購読者へ DocumentUpdated を通知する
    pub fn write(&self, doc: &LedgerDocument) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("failed to create data directory at {:?}", self.data_dir))?;

        let json =
            serde_json::to_string_pretty(doc).context("failed to serialize ledger document")?;
        fs::write(self.document_path(), json).with_context(|| {
            format!(
                "failed to write ledger document to {}",
                self.document_path().display()
            )
        })?;

        self.events.notify(LedgerEvent::DocumentUpdated);
        Ok(())
    }

    /// 設定済みの同期キーを返す。未設定なら None
    pub fn sync_key(&self) -> Option<String> {
        let raw = fs::read_to_string(self.sync_key_path()).ok()?;
        let key = raw.trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }

    /// 同期キーを設定または解除し、購読者へ SyncKeyUpdated を通知する
    pub fn set_sync_key(&self, key: Option<&str>) -> Result<()> {
        match key {
            Some(key) => {
                fs::create_dir_all(&self.data_dir).with_context(|| {
                    format!("failed to create data directory at {:?}", self.data_dir)
                })?;
                fs::write(self.sync_key_path(), key).with_context(|| {
                    format!(
                        "failed to write sync key to {}",
                        self.sync_key_path().display()
                    )
                })?;
            }
            None => {
                let path = self.sync_key_path();
                if path.exists() {
                    fs::remove_file(&path).with_context(|| {
                        format!("failed to remove sync key at {}", path.display())
                    })?;
                }
            }
        }

        self.events.notify(LedgerEvent::SyncKeyUpdated);
        Ok(())
    }
}
