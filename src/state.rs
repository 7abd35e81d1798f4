use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::modules::event::EventManager;
use crate::modules::export::ExportManager;
use crate::modules::ledger::LedgerManager;
use crate::modules::storage::LocalStore;
use crate::modules::sync::{RelayClient, SyncManager};
use crate::shared::config::AppConfig;
use crate::shared::error::{AppError, Result};

/// アプリケーション全体の状態を管理する構造体。
/// プロセス起動時に一度だけ構築し、利用側へは参照で渡す
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub event_manager: Arc<EventManager>,
    pub local_store: Arc<LocalStore>,
    pub sync_manager: Arc<SyncManager>,
    pub ledger_manager: Arc<LedgerManager>,
    pub export_manager: Arc<ExportManager>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate().map_err(AppError::ConfigurationError)?;

        std::fs::create_dir_all(&config.storage.data_dir)?;

        let event_manager = Arc::new(EventManager::new());
        let local_store = Arc::new(LocalStore::new(
            config.storage.data_dir.clone(),
            Arc::clone(&event_manager),
        ));
        let relay =
            Arc::new(RelayClient::new(&config.relay).map_err(|e| AppError::Network(e.to_string()))?);
        let sync_manager = Arc::new(SyncManager::new(Arc::clone(&local_store), relay));
        let ledger_manager = Arc::new(LedgerManager::new(
            Arc::clone(&local_store),
            Arc::clone(&sync_manager),
        ));
        let export_manager = Arc::new(ExportManager::new(
            Arc::clone(&local_store),
            Arc::clone(&sync_manager),
        ));

        Ok(Self {
            config,
            event_manager,
            local_store,
            sync_manager,
            ledger_manager,
            export_manager,
        })
    }

    /// 設定が許す場合に定期同期ループを起動する
    pub fn start_auto_sync(&self) -> Option<JoinHandle<()>> {
        if !self.config.sync.auto_sync {
            return None;
        }

        Some(
            self.sync_manager
                .schedule_sync(self.config.sync.poll_interval_secs),
        )
    }
}
