//! Reconcile engine: orchestrates one diff-and-apply cycle.
//!
//! The engine is stateless between cycles — every cycle re-fetches both
//! snapshots and recomputes the plan, so the broker stays the sole source of
//! truth. It never retries within a cycle; recovery is the next scheduled
//! invocation. Callers must serialize invocations — the engine provides no
//! internal mutual exclusion against overlapping cycles.

use std::fmt;

use serde::Serialize;

use jetsync_core::types::{BucketSpec, DesiredState, StreamSpec};

use crate::client::{AdminClient, ClientError};
use crate::observe;
use crate::plan::{plan, Plan};

/// Reason recorded when a cycle runs without a desired-state document.
const NO_DESIRED_STATE: &str = "no desired-state document";

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// The mutating operation that failed for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Create => write!(f, "create"),
            Action::Update => write!(f, "update"),
            Action::Delete => write!(f, "delete"),
        }
    }
}

/// One failed create/update/delete, recorded without aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceError {
    pub name: String,
    pub action: Action,
    pub message: String,
}

/// Per-kind outcome of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum KindOutcome {
    /// The kind's reconciliation did not run this cycle — desired state was
    /// missing, or the observed listing failed. Zero admin calls were issued.
    Skipped { reason: String },
    /// The plan was applied, with per-resource failures aggregated.
    Applied {
        created: usize,
        updated: usize,
        deleted: usize,
        errors: Vec<ResourceError>,
    },
}

impl KindOutcome {
    fn skipped(reason: impl Into<String>) -> Self {
        KindOutcome::Skipped {
            reason: reason.into(),
        }
    }

    /// Number of successfully applied changes.
    pub fn changes(&self) -> usize {
        match self {
            KindOutcome::Skipped { .. } => 0,
            KindOutcome::Applied {
                created,
                updated,
                deleted,
                ..
            } => created + updated + deleted,
        }
    }

    pub fn errors(&self) -> &[ResourceError] {
        match self {
            KindOutcome::Skipped { .. } => &[],
            KindOutcome::Applied { errors, .. } => errors,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, KindOutcome::Skipped { .. })
    }
}

/// Aggregated outcome of one reconcile cycle, per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileResult {
    pub streams: KindOutcome,
    pub buckets: KindOutcome,
}

impl ReconcileResult {
    fn skipped(reason: &str) -> Self {
        Self {
            streams: KindOutcome::skipped(reason),
            buckets: KindOutcome::skipped(reason),
        }
    }

    /// True when the cycle changed nothing and recorded no failures.
    pub fn is_noop(&self) -> bool {
        self.changes() == 0 && !self.has_errors()
    }

    pub fn changes(&self) -> usize {
        self.streams.changes() + self.buckets.changes()
    }

    pub fn has_errors(&self) -> bool {
        !self.streams.errors().is_empty() || !self.buckets.errors().is_empty()
    }
}

/// Both kinds' plans, computed without applying anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CyclePlan {
    pub streams: Plan<StreamSpec>,
    pub buckets: Plan<BucketSpec>,
}

impl CyclePlan {
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty() && self.buckets.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Drives diff-and-apply cycles against one broker.
///
/// The admin client is injected at construction; the reconciler holds no
/// other state.
pub struct Reconciler<C> {
    client: C,
}

impl<C: AdminClient> Reconciler<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Liveness signal, forwarded from the admin client.
    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    /// Run one reconcile cycle.
    ///
    /// `desired = None` means the config source failed upstream: the whole
    /// cycle is skipped with a warning and zero admin calls. A missing
    /// desired state is never interpreted as "desired = empty" — that would
    /// wipe the cluster on a read failure.
    ///
    /// The two kinds reconcile concurrently; they share no state, and a
    /// failure in one never affects the other.
    pub async fn reconcile(&self, desired: Option<&DesiredState>) -> ReconcileResult {
        tracing::debug!("waking up to check the broker topology");

        let Some(desired) = desired else {
            tracing::warn!("no desired-state document; skipping cycle");
            return ReconcileResult::skipped(NO_DESIRED_STATE);
        };

        let (streams, buckets) = tokio::join!(
            self.reconcile_streams(&desired.streams),
            self.reconcile_buckets(&desired.buckets),
        );

        ReconcileResult { streams, buckets }
    }

    /// Compute both kinds' plans without mutating anything.
    pub async fn plan(&self, desired: &DesiredState) -> Result<CyclePlan, ClientError> {
        let observed_streams = observe::comparable_streams(self.client.list_streams().await?);
        let observed_buckets = self.client.list_buckets().await?;
        Ok(CyclePlan {
            streams: plan(&observed_streams, &desired.streams),
            buckets: plan(&observed_buckets, &desired.buckets),
        })
    }

    async fn reconcile_streams(&self, desired: &[StreamSpec]) -> KindOutcome {
        let observed = match self.client.list_streams().await {
            Ok(listing) => observe::comparable_streams(listing),
            Err(err) => {
                tracing::error!(error = %err, "failed to list streams; skipping stream reconciliation");
                return KindOutcome::skipped(err.to_string());
            }
        };

        tracing::debug!(observed = observed.len(), desired = desired.len(), "diffing streams");
        self.apply_streams(plan(&observed, desired)).await
    }

    async fn reconcile_buckets(&self, desired: &[BucketSpec]) -> KindOutcome {
        let observed = match self.client.list_buckets().await {
            Ok(listing) => listing,
            Err(err) => {
                tracing::error!(error = %err, "failed to list buckets; skipping bucket reconciliation");
                return KindOutcome::skipped(err.to_string());
            }
        };

        tracing::debug!(observed = observed.len(), desired = desired.len(), "diffing buckets");
        self.apply_buckets(plan(&observed, desired)).await
    }

    /// Apply a stream plan: creates, then updates, then deletes. Deletions
    /// run last so a partially-failed cycle removes nothing still wanted.
    /// Each call is isolated — one failure never stops the batch.
    async fn apply_streams(&self, plan: Plan<StreamSpec>) -> KindOutcome {
        let mut created = 0;
        let mut updated = 0;
        let mut deleted = 0;
        let mut errors = Vec::new();

        for spec in &plan.to_create {
            tracing::info!(stream = %spec.name, "creating stream");
            match self.client.create_stream(spec).await {
                Ok(()) => created += 1,
                Err(err) => errors.push(record(&spec.name.0, Action::Create, err)),
            }
        }

        for spec in &plan.to_update {
            tracing::info!(stream = %spec.name, "updating stream");
            match self.client.update_stream(spec).await {
                Ok(()) => updated += 1,
                Err(err) => errors.push(record(&spec.name.0, Action::Update, err)),
            }
        }

        for name in &plan.to_delete {
            tracing::info!(stream = %name, "deleting stream");
            match self.client.delete_stream(name.as_str()).await {
                Ok(()) => deleted += 1,
                Err(err) => errors.push(record(name.as_str(), Action::Delete, err)),
            }
        }

        tracing::debug!(created, updated, deleted, failed = errors.len(), "stream cycle done");
        KindOutcome::Applied {
            created,
            updated,
            deleted,
            errors,
        }
    }

    async fn apply_buckets(&self, plan: Plan<BucketSpec>) -> KindOutcome {
        let mut created = 0;
        let mut updated = 0;
        let mut deleted = 0;
        let mut errors = Vec::new();

        for spec in &plan.to_create {
            tracing::info!(bucket = %spec.name, "creating bucket");
            match self.client.create_bucket(spec).await {
                Ok(()) => created += 1,
                Err(err) => errors.push(record(&spec.name.0, Action::Create, err)),
            }
        }

        for spec in &plan.to_update {
            tracing::info!(bucket = %spec.name, "updating bucket");
            match self.client.update_bucket(spec).await {
                Ok(()) => updated += 1,
                Err(err) => errors.push(record(&spec.name.0, Action::Update, err)),
            }
        }

        for name in &plan.to_delete {
            tracing::info!(bucket = %name, "deleting bucket");
            match self.client.delete_bucket(name.as_str()).await {
                Ok(()) => deleted += 1,
                Err(err) => errors.push(record(name.as_str(), Action::Delete, err)),
            }
        }

        tracing::debug!(created, updated, deleted, failed = errors.len(), "bucket cycle done");
        KindOutcome::Applied {
            created,
            updated,
            deleted,
            errors,
        }
    }
}

fn record(name: &str, action: Action, err: ClientError) -> ResourceError {
    tracing::error!(resource = name, %action, error = %err, "apply failed");
    ResourceError {
        name: name.to_string(),
        action,
        message: err.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
