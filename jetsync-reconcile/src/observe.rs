//! Observed-state adapter.
//!
//! Normalizes broker listings into the comparison shape. The one rule:
//! bucket backing streams (reserved `KV_` prefix) are lifecycle-owned by
//! bucket operations and must not enter the stream comparison set. Bucket
//! listings need no filtering.

use jetsync_core::types::{ResourceName, KV_BACKING_PREFIX};

use crate::client::ObservedStream;

/// Whether `name` identifies a server-managed bucket backing stream.
pub fn is_backing_stream(name: &ResourceName) -> bool {
    name.as_str().starts_with(KV_BACKING_PREFIX)
}

/// Strip bucket backing streams from a raw stream listing.
pub fn comparable_streams(streams: Vec<ObservedStream>) -> Vec<ObservedStream> {
    streams
        .into_iter()
        .filter(|s| !is_backing_stream(&s.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use jetsync_core::types::{RetentionKind, StorageKind};

    use super::*;

    fn observed(name: &str) -> ObservedStream {
        ObservedStream {
            name: ResourceName::from(name),
            subjects: vec![format!("{}.>", name.to_ascii_lowercase())],
            storage: StorageKind::File,
            replicas: 1,
            retention: RetentionKind::Limits,
            max_age_seconds: 0,
        }
    }

    #[test]
    fn backing_streams_filtered_out() {
        let listing = vec![observed("ORDERS"), observed("KV_sessions"), observed("AUDIT")];
        let comparable = comparable_streams(listing);
        let names: Vec<&str> = comparable.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ORDERS", "AUDIT"]);
    }

    #[test]
    fn prefix_check_is_case_sensitive() {
        // The server creates backing streams with the exact `KV_` prefix;
        // a user stream named `kv_cache` is a normal stream.
        assert!(is_backing_stream(&ResourceName::from("KV_sessions")));
        assert!(!is_backing_stream(&ResourceName::from("kv_cache")));
    }
}
