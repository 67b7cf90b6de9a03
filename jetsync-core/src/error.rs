//! Error types for jetsync-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ResourceKind;

/// All errors that can arise from resolving the desired-state document.
///
/// Absence or malformedness of the document is a distinct outcome from
/// "valid but empty" — callers must treat these variants as "skip the
/// cycle", never as "desired = nothing".
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The desired-state document did not exist at the expected path.
    #[error("desired-state document not found at {path}")]
    NotFound { path: PathBuf },

    /// YAML parse error — includes file path and line context from serde_yaml.
    #[error("failed to parse desired state at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Two resources of the same kind share a name (case-insensitively).
    #[error("duplicate {kind} name '{name}' in desired state")]
    Duplicate { kind: ResourceKind, name: String },

    /// A resource was declared with an empty name.
    #[error("{kind} declared with an empty name")]
    EmptyName { kind: ResourceKind },

    /// Replica counts below one cannot be satisfied by the broker.
    #[error("{kind} '{name}' declares {replicas} replicas; minimum is 1")]
    InvalidReplicas {
        kind: ResourceKind,
        name: String,
        replicas: usize,
    },

    /// A stream needs at least one subject pattern to capture anything.
    #[error("stream '{name}' declares no subjects")]
    MissingSubjects { name: String },

    /// `KV_*` stream names collide with bucket backing streams, which are
    /// excluded from stream reconciliation — such a stream could never
    /// converge.
    #[error("stream name '{name}' uses the reserved bucket-backing prefix")]
    ReservedName { name: String },
}
