use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use super::manager::{LedgerManager, NewCharge, NewPayment};
use super::types::{PriceTemplate, SecurityLogStatus, SECURITY_LOG_LIMIT};
use crate::modules::event::EventManager;
use crate::modules::storage::LocalStore;
use crate::modules::sync::test_support::MockRelay;
use crate::modules::sync::SyncManager;
use crate::shared::error::AppError;

struct Fixture {
    manager: LedgerManager,
    store: Arc<LocalStore>,
    relay: Arc<MockRelay>,
    sync: Arc<SyncManager>,
    _temp_dir: TempDir,
}

fn setup() -> Fixture {
    let temp_dir = TempDir::new().unwrap();
    let events = Arc::new(EventManager::new());
    let store = Arc::new(LocalStore::new(temp_dir.path().to_path_buf(), events));
    let relay = Arc::new(MockRelay::new());
    let sync = Arc::new(SyncManager::new(Arc::clone(&store), relay.clone()));
    let manager = LedgerManager::new(Arc::clone(&store), Arc::clone(&sync));

    Fixture {
        manager,
        store,
        relay,
        sync,
        _temp_dir: temp_dir,
    }
}

fn new_charge(charge_type: &str, amount: f64) -> NewCharge {
    NewCharge {
        date: "2024-06-01".to_string(),
        charge_type: charge_type.to_string(),
        description: String::new(),
        amount,
        added_by: "Sanjaya".to_string(),
    }
}

fn new_payment(method: &str, amount: f64) -> NewPayment {
    NewPayment {
        date: "2024-06-01".to_string(),
        method: method.to_string(),
        amount,
        note: String::new(),
        added_by: "Ravi".to_string(),
    }
}

#[tokio::test]
async fn test_add_charge_persists_and_bumps_updated_at() {
    let fx = setup();

    let charge = fx
        .manager
        .add_charge(new_charge("Photo Retouch", 300.0))
        .await
        .unwrap();

    let doc = fx.store.read();
    assert_eq!(doc.charges.len(), 1);
    assert_eq!(doc.charges[0], charge);
    assert!(doc.updated_at > 0);
    assert!(charge.timestamp > 0);
}

#[tokio::test]
async fn test_insertion_order_and_unique_ids() {
    let fx = setup();

    for i in 0..5 {
        fx.manager
            .add_charge(new_charge(&format!("charge-{i}"), 100.0))
            .await
            .unwrap();
    }
    for i in 0..3 {
        fx.manager
            .add_payment(new_payment(&format!("payment-{i}"), 50.0))
            .await
            .unwrap();
    }

    let doc = fx.store.read();

    // 挿入順がそのまま保存順になる
    let types: Vec<&str> = doc.charges.iter().map(|c| c.charge_type.as_str()).collect();
    assert_eq!(
        types,
        vec!["charge-0", "charge-1", "charge-2", "charge-3", "charge-4"]
    );
    let methods: Vec<&str> = doc.payments.iter().map(|p| p.method.as_str()).collect();
    assert_eq!(methods, vec!["payment-0", "payment-1", "payment-2"]);

    // ID はすべて一意
    let mut ids = HashSet::new();
    for c in &doc.charges {
        assert!(ids.insert(c.id.clone()));
    }
    for p in &doc.payments {
        assert!(ids.insert(p.id.clone()));
    }
}

#[tokio::test]
async fn test_add_charge_rejects_invalid_input() {
    let fx = setup();

    let negative = fx.manager.add_charge(new_charge("Retouch", -1.0)).await;
    assert!(matches!(negative, Err(AppError::InvalidInput(_))));

    let nan = fx.manager.add_charge(new_charge("Retouch", f64::NAN)).await;
    assert!(matches!(nan, Err(AppError::InvalidInput(_))));

    let empty_type = fx.manager.add_charge(new_charge("  ", 100.0)).await;
    assert!(matches!(empty_type, Err(AppError::InvalidInput(_))));

    assert!(fx.store.read().charges.is_empty());
}

#[tokio::test]
async fn test_add_payment_rejects_empty_method() {
    let fx = setup();

    let result = fx.manager.add_payment(new_payment("", 100.0)).await;
    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_save_templates_replaces_and_bumps_updated_at() {
    let fx = setup();

    let templates = vec![PriceTemplate {
        id: "t-1".to_string(),
        name: "Logo Design Package".to_string(),
        amount: 1500.0,
    }];
    fx.manager.save_templates(templates.clone()).await.unwrap();

    let doc = fx.store.read();
    assert_eq!(doc.templates, templates);
    assert!(doc.updated_at > 0);
}

#[tokio::test]
async fn test_security_log_cap_evicts_oldest_first() {
    let fx = setup();

    for i in 0..25 {
        fx.manager
            .append_security_log(
                &format!("attempt-{i}@example.com"),
                SecurityLogStatus::WrongPassword,
            )
            .await
            .unwrap();
    }

    let doc = fx.store.read();
    assert_eq!(doc.security_logs.len(), SECURITY_LOG_LIMIT);
    // 先頭の 5 件が押し出されている
    assert_eq!(doc.security_logs[0].attempted_email, "attempt-5@example.com");
    assert_eq!(
        doc.security_logs.last().unwrap().attempted_email,
        "attempt-24@example.com"
    );
}

#[tokio::test]
async fn test_security_log_does_not_bump_updated_at() {
    let fx = setup();

    fx.manager
        .add_charge(new_charge("Retouch", 100.0))
        .await
        .unwrap();
    let before = fx.store.read().updated_at;

    fx.manager
        .append_security_log("intruder@example.com", SecurityLogStatus::UnauthorizedEmail)
        .await
        .unwrap();

    let doc = fx.store.read();
    assert_eq!(doc.updated_at, before);
    assert_eq!(doc.security_logs.len(), 1);
}

#[tokio::test]
async fn test_clear_security_logs_is_idempotent() {
    let fx = setup();

    for _ in 0..3 {
        fx.manager
            .append_security_log("intruder@example.com", SecurityLogStatus::WrongPassword)
            .await
            .unwrap();
    }

    fx.manager.clear_security_logs().await.unwrap();
    let once = fx.store.read();
    assert!(once.security_logs.is_empty());

    fx.manager.clear_security_logs().await.unwrap();
    let twice = fx.store.read();
    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_unlinked_mutations_never_touch_the_relay() {
    let fx = setup();

    fx.manager
        .add_charge(new_charge("Retouch", 100.0))
        .await
        .unwrap();
    fx.manager
        .add_charge(new_charge("Album Basic", 6000.0))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(fx.relay.push_count().await, 0);
    assert_eq!(fx.relay.create_count().await, 0);
}

#[tokio::test]
async fn test_linked_mutation_pushes_stripped_document() {
    let fx = setup();
    fx.sync.join_sync("shared-key").await.unwrap();

    fx.manager
        .append_security_log("intruder@example.com", SecurityLogStatus::WrongPassword)
        .await
        .unwrap();
    fx.manager
        .add_charge(new_charge("Retouch", 100.0))
        .await
        .unwrap();

    for _ in 0..100 {
        if fx.relay.push_count().await >= 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // セキュリティログの記録は push を発火せず、費用追加の 1 回だけ
    let pushes = fx.relay.pushes().await;
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].0, "shared-key");
    assert!(pushes[0].1.security_logs.is_empty());
    assert_eq!(pushes[0].1.charges.len(), 1);
}
