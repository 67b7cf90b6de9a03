//! Domain types for the desired JetStream topology.
//!
//! Resource identity is the declared name, matched case-insensitively via
//! [`ResourceName::matches`]. Derived `Eq`/`Hash` stay exact so the types
//! remain well-behaved as map keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name prefix of the server-managed streams that back key/value buckets.
///
/// Streams carrying this prefix are lifecycle-owned by bucket operations and
/// are excluded from stream reconciliation.
pub const KV_BACKING_PREFIX: &str = "KV_";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a managed broker resource (stream or bucket).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceName(pub String);

impl ResourceName {
    /// Case-insensitive identity check — the matching rule used by the
    /// differ. JetStream names are ASCII.
    pub fn matches(&self, other: &ResourceName) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ResourceName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ResourceName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Storage medium for a stream or a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    File,
    Memory,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::File => write!(f, "file"),
            StorageKind::Memory => write!(f, "memory"),
        }
    }
}

/// Retention policy for a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RetentionKind {
    #[default]
    Limits,
    Interest,
    #[serde(rename = "workqueue")]
    WorkQueue,
}

impl fmt::Display for RetentionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionKind::Limits => write!(f, "limits"),
            RetentionKind::Interest => write!(f, "interest"),
            RetentionKind::WorkQueue => write!(f, "workqueue"),
        }
    }
}

/// The two managed resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Stream,
    Bucket,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Stream => write!(f, "stream"),
            ResourceKind::Bucket => write!(f, "bucket"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Desired configuration for one append-only record stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSpec {
    pub name: ResourceName,
    /// Subject patterns the stream captures. Order is significant for
    /// drift detection.
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub storage: StorageKind,
    #[serde(default = "default_replicas")]
    pub replicas: usize,
    #[serde(default)]
    pub retention: RetentionKind,
    /// Maximum record age in seconds. `0` = unbounded.
    #[serde(default)]
    pub max_age_seconds: u64,
}

/// Desired configuration for one versioned key/value bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSpec {
    pub name: ResourceName,
    #[serde(default)]
    pub storage: StorageKind,
    #[serde(default = "default_replicas")]
    pub replicas: usize,
    /// Revisions retained per key.
    #[serde(default = "default_history")]
    pub max_history_per_key: i64,
    /// Time-to-live per entry in seconds. `0` = unbounded.
    #[serde(default)]
    pub ttl_seconds: u64,
}

/// Root of the desired-state document.
///
/// Both lists default to empty so that a valid document may declare only one
/// kind. "Valid but empty" is a real state — distinct from a missing or
/// unparseable document, which never reaches this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DesiredState {
    #[serde(default)]
    pub streams: Vec<StreamSpec>,
    #[serde(default)]
    pub buckets: Vec<BucketSpec>,
}

fn default_replicas() -> usize {
    1
}

fn default_history() -> i64 {
    1
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_matching_is_case_insensitive() {
        let a = ResourceName::from("Orders");
        let b = ResourceName::from("ORDERS");
        assert!(a.matches(&b));
        assert_ne!(a, b, "derived equality stays exact");
    }

    #[test]
    fn enum_display() {
        assert_eq!(StorageKind::Memory.to_string(), "memory");
        assert_eq!(RetentionKind::WorkQueue.to_string(), "workqueue");
        assert_eq!(ResourceKind::Bucket.to_string(), "bucket");
    }

    #[test]
    fn stream_spec_defaults_from_minimal_yaml() {
        let spec: StreamSpec = serde_yaml::from_str(
            "name: ORDERS\nsubjects: [\"orders.>\"]\n",
        )
        .expect("parse");
        assert_eq!(spec.replicas, 1);
        assert_eq!(spec.storage, StorageKind::File);
        assert_eq!(spec.retention, RetentionKind::Limits);
        assert_eq!(spec.max_age_seconds, 0);
    }

    #[test]
    fn desired_state_serde_roundtrip() {
        let state = DesiredState {
            streams: vec![StreamSpec {
                name: ResourceName::from("ORDERS"),
                subjects: vec!["orders.>".to_string()],
                storage: StorageKind::File,
                replicas: 3,
                retention: RetentionKind::Limits,
                max_age_seconds: 3600,
            }],
            buckets: vec![BucketSpec {
                name: ResourceName::from("sessions"),
                storage: StorageKind::Memory,
                replicas: 1,
                max_history_per_key: 5,
                ttl_seconds: 60,
            }],
        };
        let yaml = serde_yaml::to_string(&state).expect("serialize");
        let parsed: DesiredState = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(state, parsed);
    }

    #[test]
    fn retention_parses_workqueue_spelling() {
        let spec: StreamSpec = serde_yaml::from_str(
            "name: JOBS\nsubjects: [\"jobs.*\"]\nretention: workqueue\n",
        )
        .expect("parse");
        assert_eq!(spec.retention, RetentionKind::WorkQueue);
    }
}
