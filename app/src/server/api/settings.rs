//! Settings management API:
//!   GET /api/settings        – all settings (secrets masked) + feature status
//!   PUT /api/settings        – update settings
//!   GET /api/settings/status – lightweight feature status

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};
use std::collections::HashMap;

use crate::app::SharedState;
use crate::config::{SettingInfo, SettingType, SettingsManager};

use super::{ApiResult, err_json};

fn settings_json(all: HashMap<String, SettingInfo>) -> HashMap<String, Value> {
    all.into_iter()
        .map(|(key, info)| {
            let value = match info.setting_type {
                SettingType::Secret => String::new(),
                SettingType::Normal => info.value,
            };
            (
                key,
                json!({
                    "key": info.key,
                    "value": value,
                    "type": info.setting_type,
                    "required": info.required,
                    "description": info.description,
                    "has_value": info.has_value,
                }),
            )
        })
        .collect()
}

/// GET /api/settings
pub async fn get_settings(State(state): State<SharedState>) -> ApiResult {
    let sm = SettingsManager::new(state.db().clone());

    let all = sm
        .get_all_settings()
        .map_err(|e| err_json(500, &format!("Failed to get settings: {e}")))?;

    let status = sm
        .check_feature_status()
        .map_err(|e| err_json(500, &format!("Failed to check status: {e}")))?;

    Ok(Json(json!({
        "settings": settings_json(all),
        "status": status,
    })))
}

/// PUT /api/settings
pub async fn update_settings(
    State(state): State<SharedState>,
    Json(body): Json<HashMap<String, String>>,
) -> ApiResult {
    let sm = SettingsManager::new(state.db().clone());

    let updated = sm
        .set_settings(&body)
        .map_err(|e| err_json(400, &e.to_string()))?;

    // Reload runtime config
    state
        .reload_config()
        .await
        .map_err(|e| err_json(500, &format!("Failed to reload config: {e}")))?;

    let status = sm
        .check_feature_status()
        .map_err(|e| err_json(500, &format!("Failed to check status: {e}")))?;

    let all = sm
        .get_all_settings()
        .map_err(|e| err_json(500, &format!("Failed to get settings: {e}")))?;

    tracing::info!("Updated {updated} setting(s)");
    Ok(Json(json!({
        "success": true,
        "status": status,
        "message": format!("Updated {updated} setting(s) successfully"),
        "settings": settings_json(all),
    })))
}

/// GET /api/settings/status
pub async fn get_settings_status(State(state): State<SharedState>) -> ApiResult {
    let sm = SettingsManager::new(state.db().clone());
    let status = sm
        .check_feature_status()
        .map_err(|e| err_json(500, &format!("Failed to check status: {e}")))?;
    Ok(Json(json!(status)))
}
