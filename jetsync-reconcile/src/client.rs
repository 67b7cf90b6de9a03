//! Admin-client capability boundary.
//!
//! The engine depends on this trait alone; transport, authentication, and
//! per-call bounding live behind it. Each mutating call fails independently
//! with a broker-reported error.

use async_trait::async_trait;
use thiserror::Error;

use jetsync_core::types::{BucketSpec, ResourceName, RetentionKind, StorageKind, StreamSpec};

/// The broker's current configuration for an existing stream, in the same
/// comparison shape as [`StreamSpec`]. Fetched fresh every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedStream {
    pub name: ResourceName,
    pub subjects: Vec<String>,
    pub storage: StorageKind,
    pub replicas: usize,
    pub retention: RetentionKind,
    pub max_age_seconds: u64,
}

/// The broker's current configuration for an existing bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedBucket {
    pub name: ResourceName,
    pub storage: StorageKind,
    pub replicas: usize,
    pub max_history_per_key: i64,
    pub ttl_seconds: u64,
}

impl From<&StreamSpec> for ObservedStream {
    fn from(spec: &StreamSpec) -> Self {
        Self {
            name: spec.name.clone(),
            subjects: spec.subjects.clone(),
            storage: spec.storage,
            replicas: spec.replicas,
            retention: spec.retention,
            max_age_seconds: spec.max_age_seconds,
        }
    }
}

impl From<&BucketSpec> for ObservedBucket {
    fn from(spec: &BucketSpec) -> Self {
        Self {
            name: spec.name.clone(),
            storage: spec.storage,
            replicas: spec.replicas,
            max_history_per_key: spec.max_history_per_key,
            ttl_seconds: spec.ttl_seconds,
        }
    }
}

/// Errors surfaced by an [`AdminClient`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The broker could not be reached at all (listing failures mostly).
    #[error("broker unavailable: {0}")]
    Unavailable(String),

    /// The broker rejected one request.
    #[error("broker request failed: {0}")]
    Request(String),
}

/// Capability trait over the broker's admin surface.
///
/// Implementations own the connection lifecycle and should bound individual
/// calls; the engine issues one call per resource and never retries within a
/// cycle.
#[async_trait]
pub trait AdminClient: Send + Sync {
    async fn list_streams(&self) -> Result<Vec<ObservedStream>, ClientError>;
    async fn list_buckets(&self) -> Result<Vec<ObservedBucket>, ClientError>;

    async fn create_stream(&self, spec: &StreamSpec) -> Result<(), ClientError>;
    async fn update_stream(&self, spec: &StreamSpec) -> Result<(), ClientError>;
    async fn delete_stream(&self, name: &str) -> Result<(), ClientError>;

    async fn create_bucket(&self, spec: &BucketSpec) -> Result<(), ClientError>;
    async fn update_bucket(&self, spec: &BucketSpec) -> Result<(), ClientError>;
    async fn delete_bucket(&self, name: &str) -> Result<(), ClientError>;

    /// Binary liveness signal for external health-check integration.
    fn is_connected(&self) -> bool;
}
