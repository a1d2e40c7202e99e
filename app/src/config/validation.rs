//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

use super::defaults::{
    ADMIN_PASSWORD, BACKEND_API_KEY, BACKEND_URL, NEXT_CATEGORY_POLL_INTERVAL_MS,
    REVEAL_DURATION_MS, SERVER_PORT,
};

static RE_HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/?#]+(/[^\s?#]*)?$").unwrap());
static RE_API_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._\-]+$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        BACKEND_URL => {
            if !value.is_empty() && !RE_HTTP_URL.is_match(value) {
                return Err("must be an http(s) URL".into());
            }
        }
        BACKEND_API_KEY => {
            if !value.is_empty() && !RE_API_KEY.is_match(value) {
                return Err("must not contain whitespace or special characters".into());
            }
        }
        ADMIN_PASSWORD => {
            if value.len() > 255 {
                return Err("must be at most 255 characters".into());
            }
        }
        SERVER_PORT => validate_int_range(value, 1, 65535)?,
        NEXT_CATEGORY_POLL_INTERVAL_MS => validate_int_range(value, 500, 60_000)?,
        REVEAL_DURATION_MS => validate_int_range(value, 0, 30_000)?,
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if !(min..=max).contains(&v) {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
