//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

pub const BACKEND_URL: &str = "BACKEND_URL";
pub const BACKEND_API_KEY: &str = "BACKEND_API_KEY";
pub const ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";
pub const SERVER_PORT: &str = "SERVER_PORT";
pub const NEXT_CATEGORY_POLL_INTERVAL_MS: &str = "NEXT_CATEGORY_POLL_INTERVAL_MS";
pub const REVEAL_DURATION_MS: &str = "REVEAL_DURATION_MS";

/// (key, default, secret, required, description)
type DefTuple = (&'static str, &'static str, bool, bool, &'static str);

const DEFS: &[DefTuple] = &[
    (BACKEND_URL, "", false, true, "Hosted backend project URL"),
    (BACKEND_API_KEY, "", true, true, "Hosted backend anonymous API key"),
    (ADMIN_PASSWORD, "", true, false, "Password for the admin screens"),
    (SERVER_PORT, "8080", false, false, "Local API server port"),
    (
        NEXT_CATEGORY_POLL_INTERVAL_MS,
        "5000",
        false,
        false,
        "How often the vote view re-checks the next category (ms)",
    ),
    (
        REVEAL_DURATION_MS,
        "4000",
        false,
        false,
        "Length of the winner reveal animation (ms)",
    ),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub secret: bool,
    pub required: bool,
    pub description: &'static str,
}

impl SettingDef {
    pub fn type_str(&self) -> &'static str {
        if self.secret { "secret" } else { "normal" }
    }
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, secret, required, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    secret,
                    required,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}
