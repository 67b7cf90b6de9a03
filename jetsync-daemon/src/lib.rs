//! Trigger loop for the jetsync reconciler: a fixed-interval timer that
//! resolves the desired state and runs one reconcile cycle per tick.

mod error;
mod runtime;

pub use error::DaemonError;
pub use runtime::{init_tracing, run, run_cycle, Settings};
