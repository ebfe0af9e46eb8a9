//! Readiness polling shared by every command that has to wait for an
//! external resource ("until the gateway has an IP", "until the URL
//! answers", ...).

use std::future::Future;
use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PollError {
    #[error("condition not met within {0:?}")]
    Timeout(Duration),
}

/// Evaluate `predicate` every `interval` until it returns `true` or
/// `deadline` elapses. The first evaluation happens immediately.
pub async fn poll_until<F, Fut>(
    interval: Duration,
    deadline: Duration,
    mut predicate: F,
) -> Result<(), PollError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let polling = async {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if predicate().await {
                return;
            }
        }
    };

    tokio::time::timeout(deadline, polling)
        .await
        .map_err(|_| PollError::Timeout(deadline))
}
