use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;

use crate::modules::ledger::types::{Charge, LedgerDocument, Payment, PriceTemplate};
use crate::shared::error::{AppError, Result};

/// インポートペイロード。charges / payments はフィールドの有無を
/// 検証するため Option で受ける
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedDocument {
    charges: Option<Vec<Charge>>,
    payments: Option<Vec<Payment>>,
    #[serde(default)]
    templates: Vec<PriceTemplate>,
    #[serde(default)]
    updated_at: i64,
}

/// ドキュメントを貼り付け共有できるテキストに符号化する。securityLogs は含めない
pub fn encode_document(doc: &LedgerDocument) -> Result<String> {
    let json = serde_json::to_string(&doc.stripped())?;
    Ok(STANDARD.encode(json))
}

/// encode_document の出力を復号する。
/// charges / payments のどちらも存在しないペイロードは受け付けない
pub fn decode_document(encoded: &str) -> Result<LedgerDocument> {
    let raw = STANDARD
        .decode(encoded.trim())
        .map_err(|e| AppError::DeserializationError(format!("invalid import encoding: {e}")))?;
    let json = String::from_utf8(raw)
        .map_err(|e| AppError::DeserializationError(format!("invalid import encoding: {e}")))?;
    let imported: ImportedDocument = serde_json::from_str(&json)
        .map_err(|e| AppError::DeserializationError(format!("invalid import payload: {e}")))?;

    if imported.charges.is_none() && imported.payments.is_none() {
        return Err(AppError::InvalidInput(
            "import payload carries neither charges nor payments".to_string(),
        ));
    }

    Ok(LedgerDocument {
        charges: imported.charges.unwrap_or_default(),
        payments: imported.payments.unwrap_or_default(),
        templates: imported.templates,
        security_logs: Vec::new(),
        updated_at: imported.updated_at,
    })
}
