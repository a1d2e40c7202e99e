//! WebSocket event names and the `{type, data}` envelope.

use serde::Serialize;
use serde_json::json;

// -- Event name constants --

pub const CONNECTED: &str = "connected";
pub const NEXT_CATEGORY: &str = "next_category";
pub const VOTE_CONFIRMED: &str = "vote_confirmed";
pub const APP_STATUS: &str = "app_status";
pub const CATEGORY_STATUS: &str = "category_status";
pub const REVEAL_STARTED: &str = "reveal_started";
pub const WINNER_REVEALED: &str = "winner_revealed";

// -- Payload types --

#[derive(Debug, Clone, Serialize)]
pub struct AppStatusPayload {
    pub is_running: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryStatusPayload {
    pub category_id: String,
    pub status: voting_backend::CategoryStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoteConfirmedPayload {
    pub category_id: String,
    pub choice_id: String,
    pub outcome: &'static str,
}

/// Serialize an event into the envelope pushed to WebSocket clients.
pub fn envelope<T: Serialize>(event: &str, data: &T) -> String {
    json!({ "type": event, "data": data }).to_string()
}

/// Push an event to every connected client. No receivers is not an error.
pub fn broadcast<T: Serialize>(
    ws_tx: &tokio::sync::broadcast::Sender<String>,
    event: &str,
    data: &T,
) {
    if ws_tx.send(envelope(event, data)).is_err() {
        tracing::debug!(event, "No WebSocket clients for event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_has_type_and_data() {
        let msg = envelope(APP_STATUS, &AppStatusPayload { is_running: true });
        let v: serde_json::Value = serde_json::from_str(&msg).unwrap();
        assert_eq!(v["type"], "app_status");
        assert_eq!(v["data"]["is_running"], true);
    }
}
