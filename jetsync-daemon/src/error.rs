use thiserror::Error;

/// Error surface for the trigger loop.
///
/// Reconcile-cycle failures never appear here — they degrade to warnings and
/// the next tick retries; only the loop's own machinery can fail.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("signal handler failed: {0}")]
    Signal(String),
}
