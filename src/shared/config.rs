use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub sync: SyncConfig,
    pub relay: RelayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub auto_sync: bool,
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_dir: dirs::data_local_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("choubo"),
            },
            sync: SyncConfig {
                auto_sync: true,
                poll_interval_secs: 15,
            },
            relay: RelayConfig {
                base_url: "https://api.npoint.io".to_string(),
                request_timeout_secs: 30,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        // 既定値
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("CHOUBO_DATA_DIR") {
            if !v.trim().is_empty() {
                cfg.storage.data_dir = PathBuf::from(v);
            }
        }
        if let Ok(v) = std::env::var("CHOUBO_AUTO_SYNC") {
            cfg.sync.auto_sync = parse_bool(&v, cfg.sync.auto_sync);
        }
        if let Ok(v) = std::env::var("CHOUBO_SYNC_INTERVAL_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.poll_interval_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("CHOUBO_RELAY_URL") {
            if !v.trim().is_empty() {
                cfg.relay.base_url = v.trim().to_string();
            }
        }
        if let Ok(v) = std::env::var("CHOUBO_RELAY_TIMEOUT_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.relay.request_timeout_secs = value.max(1);
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sync.poll_interval_secs == 0 {
            return Err("Sync poll_interval_secs must be greater than 0".to_string());
        }
        if self.relay.request_timeout_secs == 0 {
            return Err("Relay request_timeout_secs must be greater than 0".to_string());
        }
        if self.relay.base_url.trim().is_empty() {
            return Err("Relay base_url must not be empty".to_string());
        }
        Ok(())
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}
