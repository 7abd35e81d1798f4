use crate::modules::ledger::types::LedgerDocument;

/// ローカルとリモートのドキュメントを LWW ルールでマージする。
/// 戻り値の bool はリモートがローカルを上書きしたかどうか。
///
/// ローカルが一度も更新されていない（updatedAt == 0）か、リモートの updatedAt が
/// より新しい場合のみリモートが勝つ。その際、送信時に除去された securityLogs は
/// ローカル側のものを差し戻し、リモートにテンプレートがなければローカルのものを残す。
pub fn reconcile(local: LedgerDocument, remote: Option<LedgerDocument>) -> (LedgerDocument, bool) {
    let Some(remote) = remote else {
        return (local, false);
    };

    if local.updated_at != 0 && remote.updated_at <= local.updated_at {
        return (local, false);
    }

    let mut merged = remote;
    merged.security_logs = local.security_logs;
    if merged.templates.is_empty() {
        merged.templates = local.templates;
    }

    (merged, true)
}
