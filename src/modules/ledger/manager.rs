use std::sync::Arc;

use chrono::{Local, Utc};
use tracing::info;
use uuid::Uuid;

use super::types::{
    Charge, LedgerDocument, Payment, PriceTemplate, SecurityLogEntry, SecurityLogStatus,
    SECURITY_LOG_LIMIT,
};
use crate::modules::storage::LocalStore;
use crate::modules::sync::SyncManager;
use crate::shared::error::{AppError, Result};

/// addCharge リクエスト
#[derive(Debug, Clone)]
pub struct NewCharge {
    pub date: String,
    pub charge_type: String,
    pub description: String,
    pub amount: f64,
    pub added_by: String,
}

/// addPayment リクエスト
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub date: String,
    pub method: String,
    pub amount: f64,
    pub note: String,
    pub added_by: String,
}

/// 台帳エンティティを変更する唯一の入口。
/// すべての書き込みは LocalStore を経由し、同期対象の変更は updatedAt を進めて
/// バックグラウンド push を発火する
pub struct LedgerManager {
    store: Arc<LocalStore>,
    sync: Arc<SyncManager>,
}

impl LedgerManager {
    pub fn new(store: Arc<LocalStore>, sync: Arc<SyncManager>) -> Self {
        Self { store, sync }
    }

    /// 現在のドキュメントを返す
    pub fn document(&self) -> LedgerDocument {
        self.store.read()
    }

    /// 費用を追加する
    pub async fn add_charge(&self, request: NewCharge) -> Result<Charge> {
        validate_amount(request.amount)?;
        if request.charge_type.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "charge type must not be empty".to_string(),
            ));
        }

        let charge = Charge {
            id: Uuid::new_v4().to_string(),
            date: request.date,
            charge_type: request.charge_type,
            description: request.description,
            amount: request.amount,
            added_by: request.added_by,
            timestamp: Utc::now().timestamp_millis(),
        };

        let mut doc = self.store.read();
        doc.charges.push(charge.clone());
        doc.updated_at = Utc::now().timestamp_millis();
        self.store.write(&doc)?;
        self.sync.push_in_background(doc);

        info!("Added charge: {} (Rs. {})", charge.charge_type, charge.amount);
        Ok(charge)
    }

    /// 支払いを追加する
    pub async fn add_payment(&self, request: NewPayment) -> Result<Payment> {
        validate_amount(request.amount)?;
        if request.method.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "payment method must not be empty".to_string(),
            ));
        }

        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            date: request.date,
            method: request.method,
            amount: request.amount,
            note: request.note,
            added_by: request.added_by,
            timestamp: Utc::now().timestamp_millis(),
        };

        let mut doc = self.store.read();
        doc.payments.push(payment.clone());
        doc.updated_at = Utc::now().timestamp_millis();
        self.store.write(&doc)?;
        self.sync.push_in_background(doc);

        info!("Added payment: {} (Rs. {})", payment.method, payment.amount);
        Ok(payment)
    }

    /// テンプレート一覧を丸ごと差し替える
    pub async fn save_templates(&self, templates: Vec<PriceTemplate>) -> Result<()> {
        let mut doc = self.store.read();
        doc.templates = templates;
        doc.updated_at = Utc::now().timestamp_millis();
        self.store.write(&doc)?;
        self.sync.push_in_background(doc);

        Ok(())
    }

    /// ログイン失敗を記録する。同期対象外のため updatedAt は進めず、push もしない
    pub async fn append_security_log(
        &self,
        attempted_email: &str,
        status: SecurityLogStatus,
    ) -> Result<SecurityLogEntry> {
        let entry = SecurityLogEntry {
            id: Uuid::new_v4().to_string(),
            attempted_email: attempted_email.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            status,
        };

        let mut doc = self.store.read();
        doc.security_logs.push(entry.clone());
        while doc.security_logs.len() > SECURITY_LOG_LIMIT {
            doc.security_logs.remove(0);
        }
        self.store.write(&doc)?;

        info!("Recorded failed login attempt for {}", attempted_email);
        Ok(entry)
    }

    /// セキュリティログを全消去する。updatedAt は進めない
    pub async fn clear_security_logs(&self) -> Result<()> {
        let mut doc = self.store.read();
        doc.security_logs.clear();
        self.store.write(&doc)?;

        Ok(())
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::InvalidInput(format!(
            "amount must be a non-negative number: {amount}"
        )));
    }
    Ok(())
}
