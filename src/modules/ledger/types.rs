use serde::{Deserialize, Serialize};

/// securityLogs の保持上限。超過分は古いものから破棄する
pub const SECURITY_LOG_LIMIT: usize = 20;

/// デザイナー側が計上する費用
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub charge_type: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    pub added_by: String,
    pub timestamp: i64,
}

/// 依頼者側が記録する支払い
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub date: String,
    pub method: String,
    pub amount: f64,
    #[serde(default)]
    pub note: String,
    pub added_by: String,
    pub timestamp: i64,
}

/// 費用入力を補助する価格プリセット
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceTemplate {
    pub id: String,
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityLogStatus {
    WrongPassword,
    UnauthorizedEmail,
}

/// ログイン失敗の監査記録。このデバイスの外へは出さない
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityLogEntry {
    pub id: String,
    pub attempted_email: String,
    pub timestamp: i64,
    pub date: String,
    pub status: SecurityLogStatus,
}

/// 永続化・同期の単位となる台帳ドキュメント
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerDocument {
    #[serde(default)]
    pub charges: Vec<Charge>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub templates: Vec<PriceTemplate>,
    #[serde(default)]
    pub security_logs: Vec<SecurityLogEntry>,
    /// 最終更新時刻（ミリ秒）。0 は未更新を意味し、競合解決にのみ使う
    #[serde(default)]
    pub updated_at: i64,
}

impl LedgerDocument {
    /// 既定のテンプレートを持つ初期ドキュメントを返す
    pub fn seeded() -> Self {
        Self {
            charges: Vec::new(),
            payments: Vec::new(),
            templates: default_templates(),
            security_logs: Vec::new(),
            updated_at: 0,
        }
    }

    /// 費用の合計
    pub fn total_costs(&self) -> f64 {
        self.charges.iter().map(|c| c.amount).sum()
    }

    /// 支払いの合計
    pub fn total_paid(&self) -> f64 {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// 支払い合計 − 費用合計
    pub fn balance(&self) -> f64 {
        self.total_paid() - self.total_costs()
    }

    /// securityLogs を空にしたコピーを返す。リレー送信とエクスポートはこの形のみ扱う
    pub fn stripped(&self) -> Self {
        let mut doc = self.clone();
        doc.security_logs.clear();
        doc
    }
}

pub fn default_templates() -> Vec<PriceTemplate> {
    vec![
        PriceTemplate {
            id: "1".to_string(),
            name: "Background Change".to_string(),
            amount: 500.0,
        },
        PriceTemplate {
            id: "2".to_string(),
            name: "Photo Retouch".to_string(),
            amount: 300.0,
        },
        PriceTemplate {
            id: "3".to_string(),
            name: "Album Basic".to_string(),
            amount: 6000.0,
        },
        PriceTemplate {
            id: "4".to_string(),
            name: "Album Premium".to_string(),
            amount: 9000.0,
        },
    ]
}
