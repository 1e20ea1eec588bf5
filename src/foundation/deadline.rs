use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use crate::foundation::error::{QrCraftError, QrCraftResult};

/// Run `job` on a dedicated worker thread and wait at most `timeout` for its result.
///
/// On timeout the worker is detached: its eventual result is dropped and the caller receives
/// [`QrCraftError::Timeout`]. A worker that panics surfaces as an `Other` error.
pub fn run_with_timeout<T, F>(
    operation: &'static str,
    timeout: Duration,
    job: F,
) -> QrCraftResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> QrCraftResult<T> + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel::<QrCraftResult<T>>(1);
    std::thread::Builder::new()
        .name(format!("qrcraft-{}", operation.replace(' ', "-")))
        .spawn(move || {
            // The receiver is gone once the caller timed out.
            let _ = tx.send(job());
        })
        .map_err(|e| anyhow::Error::new(e).context(format!("spawn {operation} worker")))?;

    match rx.recv_timeout(timeout) {
        Ok(res) => res,
        Err(RecvTimeoutError::Timeout) => {
            tracing::warn!(operation, timeout_ms = timeout.as_millis() as u64, "operation timed out");
            Err(QrCraftError::timeout(operation, timeout))
        }
        Err(RecvTimeoutError::Disconnected) => Err(QrCraftError::Other(anyhow::anyhow!(
            "{operation} worker exited without a result"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/deadline.rs"]
mod tests;
