use std::sync::Arc;

use chrono::{Local, Utc};
use tracing::info;

use super::codec;
use crate::modules::storage::LocalStore;
use crate::modules::sync::SyncManager;
use crate::shared::error::Result;

/// 帯域外共有用のインポート/エクスポートとレポート生成
pub struct ExportManager {
    store: Arc<LocalStore>,
    sync: Arc<SyncManager>,
}

impl ExportManager {
    pub fn new(store: Arc<LocalStore>, sync: Arc<SyncManager>) -> Self {
        Self { store, sync }
    }

    /// 現在のドキュメントを共有用テキストに書き出す
    pub fn export_data(&self) -> Result<String> {
        codec::encode_document(&self.store.read())
    }

    /// 共有テキストでドキュメントを丸ごと置き換える。
    /// このデバイスの securityLogs は保持し、updatedAt は現在時刻へ更新する
    pub async fn import_data(&self, encoded: &str) -> Result<()> {
        let mut incoming = codec::decode_document(encoded)?;

        let local = self.store.read();
        incoming.security_logs = local.security_logs;
        incoming.updated_at = Utc::now().timestamp_millis();

        self.store.write(&incoming)?;
        self.sync.push_in_background(incoming);

        info!("Imported ledger document");
        Ok(())
    }

    /// プレーンテキストのサマリーレポートを生成する
    pub fn report(&self) -> String {
        let doc = self.store.read();
        format!(
            "DESIGN LEDGER REPORT\nGenerated: {}\nTotal Costs: Rs. {}\nTotal Paid: Rs. {}\nNet Balance: Rs. {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            doc.total_costs(),
            doc.total_paid(),
            doc.balance(),
        )
    }
}
