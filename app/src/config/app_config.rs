//! Runtime application configuration loaded from DB + environment overrides.

use std::time::Duration;

use voting_backend::Credentials;

use super::defaults::{
    ADMIN_PASSWORD, BACKEND_API_KEY, BACKEND_URL, NEXT_CATEGORY_POLL_INTERVAL_MS,
    REVEAL_DURATION_MS, SERVER_PORT,
};
use super::manager::SettingsManager;

/// Runtime configuration populated from the settings DB.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: String,
    pub backend_api_key: String,
    pub admin_password: String,
    pub server_port: u16,
    pub next_category_poll_interval_ms: u64,
    pub reveal_duration_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            backend_api_key: String::new(),
            admin_password: String::new(),
            server_port: 8080,
            next_category_poll_interval_ms: 5000,
            reveal_duration_ms: 4000,
        }
    }
}

impl AppConfig {
    /// Load configuration from the settings manager (DB-first, env overrides).
    pub fn load(sm: &SettingsManager) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> String { sm.get_setting(key).unwrap_or_default() };

        let mut server_port = parse_or(&g(SERVER_PORT), 8080u16);
        if let Ok(v) = std::env::var(SERVER_PORT) {
            if let Ok(p) = v.parse::<u16>() {
                server_port = p;
            }
        }

        Ok(Self {
            backend_url: g(BACKEND_URL),
            backend_api_key: g(BACKEND_API_KEY),
            admin_password: g(ADMIN_PASSWORD),
            server_port,
            next_category_poll_interval_ms: parse_or(&g(NEXT_CATEGORY_POLL_INTERVAL_MS), 5000),
            reveal_duration_ms: parse_or(&g(REVEAL_DURATION_MS), 4000),
        })
    }

    /// Reload config from the settings manager.
    pub fn reload(&mut self, sm: &SettingsManager) -> Result<(), anyhow::Error> {
        *self = Self::load(sm)?;
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            base_url: self.backend_url.clone(),
            api_key: self.backend_api_key.clone(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.next_category_poll_interval_ms)
    }

    pub fn reveal_duration(&self) -> Duration {
        Duration::from_millis(self.reveal_duration_ms)
    }
}

fn parse_or<T: std::str::FromStr>(s: &str, default: T) -> T {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}
