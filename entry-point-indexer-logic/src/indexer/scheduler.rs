use std::{future::Future, time::Duration};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Runs `task` repeatedly until `token` is cancelled.
///
/// The next run starts `interval` after the previous one has finished, so two runs
/// of the same task never overlap. Cancellation is observed between runs only.
pub async fn run_periodically<F, Fut>(
    name: &'static str,
    interval: Duration,
    token: CancellationToken,
    mut task: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    tracing::info!(task = name, ?interval, "starting periodic task");
    loop {
        if token.is_cancelled() {
            break;
        }
        task().await;
        tokio::select! {
            _ = token.cancelled() => break,
            _ = sleep(interval) => {}
        }
    }
    tracing::info!(task = name, "periodic task stopped");
}
