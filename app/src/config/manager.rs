//! SettingsManager: DB-backed settings with defaults, migration, and feature status.

use std::collections::{BTreeMap, HashMap};

use voting_db::Database;

use super::defaults::{
    ADMIN_PASSWORD, BACKEND_API_KEY, BACKEND_URL, DEFAULT_SETTINGS, SettingDef,
};
use super::validation::validate_setting;
use super::{FeatureStatus, SettingInfo, SettingType};

/// Wraps [`Database`] to provide high-level settings operations.
pub struct SettingsManager {
    db: Database,
}

impl SettingsManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get a setting value. Falls back to default if not in DB.
    pub fn get_setting(&self, key: &str) -> Result<String, anyhow::Error> {
        if let Some(val) = self.db.get_setting(key)? {
            return Ok(val);
        }
        if let Some(def) = DEFAULT_SETTINGS.get(key) {
            return Ok(def.default.to_string());
        }
        anyhow::bail!("setting not found: {key}");
    }

    /// Set a setting value with validation.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        let def = lookup(key)?;
        validate_setting(key, value).map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;
        self.db.set_setting(key, value, def.type_str())?;
        Ok(())
    }

    /// Validate every entry first, then write them in one transaction.
    pub fn set_settings(&self, values: &HashMap<String, String>) -> Result<usize, anyhow::Error> {
        let mut batch = BTreeMap::new();
        for (key, value) in values {
            let def = lookup(key)?;
            validate_setting(key, value)
                .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;
            batch.insert(key.clone(), (value.clone(), def.type_str().to_string()));
        }
        self.db.update_settings_bulk(&batch)?;
        Ok(batch.len())
    }

    /// Get all settings, filling in defaults for missing keys.
    pub fn get_all_settings(&self) -> Result<HashMap<String, SettingInfo>, anyhow::Error> {
        let db_settings = self.db.get_all_settings()?;
        let mut result = HashMap::new();

        for (key, value) in &db_settings {
            let def = DEFAULT_SETTINGS.get(key.as_str());
            result.insert(key.clone(), setting_info(key, value, def));
        }

        for (key, def) in DEFAULT_SETTINGS.iter() {
            if !result.contains_key(*key) {
                result.insert(key.to_string(), setting_info(key, def.default, Some(def)));
            }
        }

        Ok(result)
    }

    /// Initialize default settings in DB (skip existing).
    pub fn initialize_defaults(&self) -> Result<(), anyhow::Error> {
        for (key, def) in DEFAULT_SETTINGS.iter() {
            if self.db.get_setting(key)?.is_some() {
                continue;
            }
            self.db.set_setting(key, def.default, def.type_str())?;
        }
        Ok(())
    }

    /// Migrate settings from environment variables to DB (one-time).
    pub fn migrate_from_env(&self) -> Result<u32, anyhow::Error> {
        let mut migrated = 0u32;
        for (key, def) in DEFAULT_SETTINGS.iter() {
            if self.db.get_setting(key)?.is_some() {
                continue;
            }
            if let Ok(env_val) = std::env::var(key) {
                if env_val.is_empty() {
                    continue;
                }
                if let Err(e) = validate_setting(key, &env_val) {
                    tracing::warn!("Skipping invalid env setting {key}: {e}");
                    continue;
                }
                self.db.set_setting(key, &env_val, def.type_str())?;
                tracing::info!("Migrated setting from env: {key}");
                migrated += 1;
            }
        }
        if migrated > 0 {
            tracing::info!("Migration completed: {migrated} settings migrated");
            if has_secret_in_env() {
                tracing::warn!(
                    "SECURITY WARNING: Sensitive data in env vars. \
                     Remove from .env after confirming migration."
                );
            }
        }
        Ok(migrated)
    }

    /// Check which features are properly configured.
    pub fn check_feature_status(&self) -> Result<FeatureStatus, anyhow::Error> {
        let mut status = FeatureStatus {
            backend_configured: true,
            admin_configured: false,
            missing_settings: Vec::new(),
            warnings: Vec::new(),
        };

        for key in [BACKEND_URL, BACKEND_API_KEY] {
            if self.get_setting(key).unwrap_or_default().is_empty() {
                status.missing_settings.push(key.to_string());
                status.backend_configured = false;
            }
        }

        if self.get_setting(ADMIN_PASSWORD).unwrap_or_default().is_empty() {
            status
                .warnings
                .push("ADMIN_PASSWORD is empty - admin screens cannot be unlocked".into());
        } else {
            status.admin_configured = true;
        }

        Ok(status)
    }
}

fn lookup(key: &str) -> Result<&'static SettingDef, anyhow::Error> {
    DEFAULT_SETTINGS
        .get(key)
        .ok_or_else(|| anyhow::anyhow!("unknown setting key: {key}"))
}

fn setting_info(key: &str, value: &str, def: Option<&SettingDef>) -> SettingInfo {
    SettingInfo {
        key: key.to_string(),
        value: value.to_string(),
        setting_type: match def {
            Some(d) if d.secret => SettingType::Secret,
            _ => SettingType::Normal,
        },
        required: def.is_some_and(|d| d.required),
        description: def.map_or(String::new(), |d| d.description.to_string()),
        has_value: !value.is_empty(),
    }
}

fn has_secret_in_env() -> bool {
    [BACKEND_API_KEY, ADMIN_PASSWORD]
        .iter()
        .any(|k| std::env::var(k).is_ok_and(|v| !v.is_empty()))
}
