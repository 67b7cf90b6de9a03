//! Desired-state document resolver.
//!
//! The document is YAML. When mounted from a secret store it arrives as a
//! base64-wrapped payload, so the resolver transparently unwraps base64
//! before parsing; a plain YAML file passes straight through. The document
//! is re-read on every reconcile cycle — nothing is cached.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::ConfigError;
use crate::types::{DesiredState, ResourceKind, ResourceName, KV_BACKING_PREFIX};

/// Load and validate the desired-state document at `path`.
///
/// Returns [`ConfigError::NotFound`] if absent, [`ConfigError::Parse`] (with
/// path and line context) if malformed, or a validation variant if the
/// document is structurally valid but declares an inconsistent topology.
pub fn load_at(path: &Path) -> Result<DesiredState, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = std::fs::read_to_string(path)?;
    let document = unwrap_base64(&raw).unwrap_or(raw);
    let state: DesiredState =
        serde_yaml::from_str(&document).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    validate(&state)?;
    Ok(state)
}

/// Decode a base64-wrapped document, tolerating line breaks in the payload.
///
/// Plain YAML never survives this: `:` is outside the base64 alphabet, so
/// decoding fails and the caller keeps the raw text.
fn unwrap_base64(raw: &str) -> Option<String> {
    let joined: String = raw.split_whitespace().collect();
    let bytes = STANDARD.decode(joined).ok()?;
    String::from_utf8(bytes).ok()
}

/// Reject topologies the reconciler cannot converge.
pub fn validate(state: &DesiredState) -> Result<(), ConfigError> {
    check_names(
        ResourceKind::Stream,
        state.streams.iter().map(|s| &s.name),
    )?;
    check_names(
        ResourceKind::Bucket,
        state.buckets.iter().map(|b| &b.name),
    )?;

    for stream in &state.streams {
        if stream.replicas == 0 {
            return Err(ConfigError::InvalidReplicas {
                kind: ResourceKind::Stream,
                name: stream.name.to_string(),
                replicas: stream.replicas,
            });
        }
        if stream.subjects.is_empty() {
            return Err(ConfigError::MissingSubjects {
                name: stream.name.to_string(),
            });
        }
        if stream.name.as_str().starts_with(KV_BACKING_PREFIX) {
            return Err(ConfigError::ReservedName {
                name: stream.name.to_string(),
            });
        }
    }

    for bucket in &state.buckets {
        if bucket.replicas == 0 {
            return Err(ConfigError::InvalidReplicas {
                kind: ResourceKind::Bucket,
                name: bucket.name.to_string(),
                replicas: bucket.replicas,
            });
        }
    }

    Ok(())
}

fn check_names<'a>(
    kind: ResourceKind,
    names: impl Iterator<Item = &'a ResourceName>,
) -> Result<(), ConfigError> {
    let mut seen: Vec<String> = Vec::new();
    for name in names {
        if name.as_str().is_empty() {
            return Err(ConfigError::EmptyName { kind });
        }
        let normalized = name.as_str().to_ascii_lowercase();
        if seen.contains(&normalized) {
            return Err(ConfigError::Duplicate {
                kind,
                name: name.to_string(),
            });
        }
        seen.push(normalized);
    }
    Ok(())
}
