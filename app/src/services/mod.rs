//! Domain services consumed by the HTTP handlers.

pub mod announcement;
pub mod catalog;
pub mod gate;
pub mod next_category;
pub mod results;
pub mod session;
pub mod voting;

#[cfg(test)]
pub(crate) mod testing;

use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Sleep for `duration` unless `token` is cancelled first. Returns `true` when cancelled.
pub(crate) async fn sleep_or_cancel(token: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => true,
        _ = sleep(duration) => false,
    }
}
