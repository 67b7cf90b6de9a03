//! # jetsync-reconcile
//!
//! The reconciliation engine: given a desired topology and the broker's live
//! state, compute and apply the minimal set of create/update/delete
//! operations that converges the cluster.
//!
//! The engine talks to the broker exclusively through the [`AdminClient`]
//! capability trait; `jetsync-nats` provides the production implementation
//! and [`mock::MockAdminClient`] (behind the `test-utilities` feature) an
//! in-memory one. Every cycle is computed fresh from the two snapshots —
//! nothing is cached or persisted between cycles.

pub mod client;
pub mod engine;
pub mod observe;
pub mod plan;

#[cfg(any(test, feature = "test-utilities"))]
pub mod mock;

pub use client::{AdminClient, ClientError, ObservedBucket, ObservedStream};
pub use engine::{
    Action, CyclePlan, KindOutcome, ReconcileResult, Reconciler, ResourceError,
};
pub use plan::{plan, DesiredResource, ObservedResource, Plan};
