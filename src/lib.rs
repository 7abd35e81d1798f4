pub mod modules;
pub mod shared;
pub mod state;

pub use modules::event::{EventManager, LedgerEvent};
pub use modules::export::ExportManager;
pub use modules::ledger::{
    Charge, LedgerDocument, LedgerManager, NewCharge, NewPayment, Payment, PriceTemplate,
    SecurityLogEntry, SecurityLogStatus,
};
pub use modules::storage::LocalStore;
pub use modules::sync::{reconcile, RelayClient, RelayStore, SyncError, SyncManager, SyncStatus};
pub use shared::config::AppConfig;
pub use shared::error::{AppError, Result};
pub use state::AppState;

/// ログ設定の初期化
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "choubo=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
