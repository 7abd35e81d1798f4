use tokio::sync::broadcast;
use tracing::debug;

/// ストア変更の通知イベント。ペイロードは持たず「ストアを読み直せ」のみを意味する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEvent {
    /// 台帳ドキュメントが書き換わった
    DocumentUpdated,
    /// 同期キーが設定・解除された
    SyncKeyUpdated,
}

/// 同一デバイス内の全購読者へ変更を配信するマネージャー
pub struct EventManager {
    sender: broadcast::Sender<LedgerEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    /// 変更通知を購読する。Receiver を drop すると購読解除になる
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.sender.subscribe()
    }

    /// 全購読者へ変更を通知する。配信はベストエフォートで、重複は許容される
    pub fn notify(&self, event: LedgerEvent) {
        if self.sender.send(event).is_err() {
            debug!("No active subscribers for {:?}", event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}
