//! Interval-driven reconcile loop.
//!
//! One loop, one cycle at a time: the next tick is not processed until the
//! current cycle finishes, and missed ticks are skipped rather than queued,
//! so cycles never overlap — the serialization the engine requires.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use jetsync_core::config;
use jetsync_reconcile::{AdminClient, KindOutcome, ReconcileResult, Reconciler};

use crate::error::DaemonError;

/// Runtime settings for the trigger loop.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path of the desired-state document, re-read every tick.
    pub config_path: PathBuf,
    /// Reconcile cadence.
    pub interval: Duration,
}

/// Run the reconcile loop until ctrl-c.
///
/// The first cycle runs immediately on startup; subsequent cycles follow the
/// configured interval.
pub async fn run<C: AdminClient>(client: C, settings: Settings) -> Result<(), DaemonError> {
    let reconciler = Reconciler::new(client);

    let mut ticker = tokio::time::interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(
        config = %settings.config_path.display(),
        interval_secs = settings.interval.as_secs(),
        "reconcile loop started",
    );

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                match signal {
                    Ok(()) => {
                        tracing::info!("received ctrl-c, stopping reconcile loop");
                        return Ok(());
                    }
                    Err(err) => return Err(DaemonError::Signal(err.to_string())),
                }
            }
            _ = ticker.tick() => {
                let result = run_cycle(&reconciler, &settings.config_path).await;
                log_cycle(&result, reconciler.is_connected());
            }
        }
    }
}

/// Resolve the desired state and run one reconcile cycle.
///
/// A resolution failure is downgraded to `None` — the engine skips the cycle
/// without touching the broker, and the next tick retries.
pub async fn run_cycle<C: AdminClient>(
    reconciler: &Reconciler<C>,
    config_path: &Path,
) -> ReconcileResult {
    let path = config_path.to_path_buf();
    let desired = match tokio::task::spawn_blocking(move || config::load_at(&path)).await {
        Ok(Ok(state)) => Some(state),
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "desired-state resolution failed; skipping cycle");
            None
        }
        Err(err) => {
            tracing::warn!(error = %err, "config resolver task failed; skipping cycle");
            None
        }
    };

    reconciler.reconcile(desired.as_ref()).await
}

fn log_cycle(result: &ReconcileResult, connected: bool) {
    if !connected {
        tracing::warn!("broker connection is not in connected state");
    }
    log_kind("streams", &result.streams);
    log_kind("buckets", &result.buckets);
}

fn log_kind(kind: &str, outcome: &KindOutcome) {
    match outcome {
        KindOutcome::Skipped { reason } => {
            tracing::warn!(kind, reason = %reason, "reconciliation skipped");
        }
        KindOutcome::Applied {
            created,
            updated,
            deleted,
            errors,
        } => {
            if *created + *updated + *deleted == 0 && errors.is_empty() {
                tracing::debug!(kind, "already converged");
            } else {
                tracing::info!(
                    kind,
                    created,
                    updated,
                    deleted,
                    failed = errors.len(),
                    "reconciliation applied",
                );
            }
        }
    }
}

/// Install the tracing subscriber (`RUST_LOG`-style filtering, `info` default).
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use jetsync_reconcile::mock::MockAdminClient;
    use jetsync_reconcile::{ObservedBucket, ObservedStream};
    use jetsync_core::types::{
        BucketSpec, ResourceName, RetentionKind, StorageKind, StreamSpec,
    };

    use super::*;

    const CONFIG: &str = "\
streams:
  - name: ORDERS
    subjects: [\"orders.>\"]
buckets:
  - name: sessions
    storage: memory
    ttl_seconds: 60
    max_history_per_key: 5
";

    #[tokio::test]
    async fn missing_config_skips_cycle_and_deletes_nothing() {
        let dir = TempDir::new().expect("tempdir");
        let client = MockAdminClient::new();
        client.seed_stream(ObservedStream::from(&StreamSpec {
            name: ResourceName::from("LEGACY"),
            subjects: vec!["legacy.>".to_string()],
            storage: StorageKind::File,
            replicas: 1,
            retention: RetentionKind::Limits,
            max_age_seconds: 0,
        }));
        client.seed_bucket(ObservedBucket::from(&BucketSpec {
            name: ResourceName::from("cache"),
            storage: StorageKind::Memory,
            replicas: 1,
            max_history_per_key: 1,
            ttl_seconds: 0,
        }));

        let reconciler = Reconciler::new(client);
        let result = run_cycle(&reconciler, &dir.path().join("absent.yaml")).await;

        assert!(result.streams.is_skipped());
        assert!(result.buckets.is_skipped());
        assert!(
            reconciler.client().mutation_calls().is_empty(),
            "a missing document must never be treated as an empty one"
        );
    }

    #[tokio::test]
    async fn valid_config_converges_then_second_cycle_is_noop() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("topology.yaml");
        fs::write(&path, CONFIG).expect("write config");

        let reconciler = Reconciler::new(MockAdminClient::new());
        let first = run_cycle(&reconciler, &path).await;
        assert_eq!(first.changes(), 2);
        assert!(!first.has_errors());

        let second = run_cycle(&reconciler, &path).await;
        assert!(second.is_noop());
    }

    #[tokio::test]
    async fn config_edits_are_picked_up_between_cycles() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("topology.yaml");
        fs::write(&path, CONFIG).expect("write config");

        let reconciler = Reconciler::new(MockAdminClient::new());
        run_cycle(&reconciler, &path).await;

        // Drop the bucket from the document; the next cycle deletes it.
        fs::write(&path, "streams:\n  - name: ORDERS\n    subjects: [\"orders.>\"]\n")
            .expect("rewrite config");
        let result = run_cycle(&reconciler, &path).await;
        assert_eq!(result.buckets.changes(), 1);
        assert!(reconciler
            .client()
            .mutation_calls()
            .contains(&"delete_bucket sessions".to_string()));
    }
}
