//! In-memory mock admin client for tests.
//!
//! Stateful: creates, updates, and deletes mutate the seeded listings, so a
//! second reconcile cycle against an unchanged desired state observes the
//! converged topology. Bucket creation materializes the `KV_` backing stream
//! the way the server does, which lets tests exercise the backing-stream
//! filter end to end.
//!
//! Available during unit tests or via the `test-utilities` feature:
//!
//! ```toml
//! [dev-dependencies]
//! jetsync-reconcile = { path = "../jetsync-reconcile", features = ["test-utilities"] }
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use jetsync_core::types::{
    BucketSpec, ResourceKind, ResourceName, RetentionKind, StreamSpec, KV_BACKING_PREFIX,
};

use crate::client::{AdminClient, ClientError, ObservedBucket, ObservedStream};

#[derive(Debug, Default)]
struct MockState {
    streams: Vec<ObservedStream>,
    buckets: Vec<ObservedBucket>,
    /// Mutating calls in invocation order, e.g. `"create_stream ORDERS"`.
    calls: Vec<String>,
    /// Lowercased resource names whose mutations fail.
    failing: HashSet<String>,
    fail_stream_listing: bool,
    fail_bucket_listing: bool,
    disconnected: bool,
}

/// Shared-state mock; clones observe the same broker.
#[derive(Debug, Clone, Default)]
pub struct MockAdminClient {
    state: Arc<Mutex<MockState>>,
}

impl MockAdminClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_stream(&self, stream: ObservedStream) {
        self.state.lock().unwrap().streams.push(stream);
    }

    /// Seed a bucket together with its backing stream.
    pub fn seed_bucket(&self, bucket: ObservedBucket) {
        let mut state = self.state.lock().unwrap();
        state.streams.push(backing_stream(&bucket));
        state.buckets.push(bucket);
    }

    /// Make every mutation of `name` fail with a broker error.
    pub fn fail_resource(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .failing
            .insert(name.to_ascii_lowercase());
    }

    /// Make the listing of one kind fail.
    pub fn fail_listing(&self, kind: ResourceKind) {
        let mut state = self.state.lock().unwrap();
        match kind {
            ResourceKind::Stream => state.fail_stream_listing = true,
            ResourceKind::Bucket => state.fail_bucket_listing = true,
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.state.lock().unwrap().disconnected = !connected;
    }

    /// Mutating calls recorded so far, in invocation order.
    pub fn mutation_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn mutate(&self, op: &str, name: &str) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("{op} {name}"));
        if state.failing.contains(&name.to_ascii_lowercase()) {
            return Err(ClientError::Request(format!(
                "injected failure for '{name}'"
            )));
        }
        Ok(())
    }
}

fn backing_stream(bucket: &ObservedBucket) -> ObservedStream {
    ObservedStream {
        name: ResourceName::from(format!("{KV_BACKING_PREFIX}{}", bucket.name)),
        subjects: vec![format!("$KV.{}.>", bucket.name)],
        storage: bucket.storage,
        replicas: bucket.replicas,
        retention: RetentionKind::Limits,
        max_age_seconds: bucket.ttl_seconds,
    }
}

fn same_name(a: &ResourceName, b: &str) -> bool {
    a.as_str().eq_ignore_ascii_case(b)
}

#[async_trait]
impl AdminClient for MockAdminClient {
    async fn list_streams(&self) -> Result<Vec<ObservedStream>, ClientError> {
        let state = self.state.lock().unwrap();
        if state.fail_stream_listing {
            return Err(ClientError::Unavailable(
                "stream listing failed (injected)".to_string(),
            ));
        }
        Ok(state.streams.clone())
    }

    async fn list_buckets(&self) -> Result<Vec<ObservedBucket>, ClientError> {
        let state = self.state.lock().unwrap();
        if state.fail_bucket_listing {
            return Err(ClientError::Unavailable(
                "bucket listing failed (injected)".to_string(),
            ));
        }
        Ok(state.buckets.clone())
    }

    async fn create_stream(&self, spec: &StreamSpec) -> Result<(), ClientError> {
        self.mutate("create_stream", spec.name.as_str())?;
        self.state
            .lock()
            .unwrap()
            .streams
            .push(ObservedStream::from(spec));
        Ok(())
    }

    async fn update_stream(&self, spec: &StreamSpec) -> Result<(), ClientError> {
        self.mutate("update_stream", spec.name.as_str())?;
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state
            .streams
            .iter_mut()
            .find(|s| same_name(&s.name, spec.name.as_str()))
        {
            *existing = ObservedStream::from(spec);
        }
        Ok(())
    }

    async fn delete_stream(&self, name: &str) -> Result<(), ClientError> {
        self.mutate("delete_stream", name)?;
        self.state
            .lock()
            .unwrap()
            .streams
            .retain(|s| !same_name(&s.name, name));
        Ok(())
    }

    async fn create_bucket(&self, spec: &BucketSpec) -> Result<(), ClientError> {
        self.mutate("create_bucket", spec.name.as_str())?;
        let bucket = ObservedBucket::from(spec);
        let mut state = self.state.lock().unwrap();
        state.streams.push(backing_stream(&bucket));
        state.buckets.push(bucket);
        Ok(())
    }

    async fn update_bucket(&self, spec: &BucketSpec) -> Result<(), ClientError> {
        self.mutate("update_bucket", spec.name.as_str())?;
        let bucket = ObservedBucket::from(spec);
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state
            .buckets
            .iter_mut()
            .find(|b| same_name(&b.name, spec.name.as_str()))
        {
            *existing = bucket.clone();
        }
        let backing = backing_stream(&bucket);
        if let Some(existing) = state
            .streams
            .iter_mut()
            .find(|s| same_name(&s.name, backing.name.as_str()))
        {
            *existing = backing;
        }
        Ok(())
    }

    async fn delete_bucket(&self, name: &str) -> Result<(), ClientError> {
        self.mutate("delete_bucket", name)?;
        let backing = format!("{KV_BACKING_PREFIX}{name}");
        let mut state = self.state.lock().unwrap();
        state.buckets.retain(|b| !same_name(&b.name, name));
        state.streams.retain(|s| !same_name(&s.name, &backing));
        Ok(())
    }

    fn is_connected(&self) -> bool {
        !self.state.lock().unwrap().disconnected
    }
}

#[cfg(test)]
mod tests {
    use jetsync_core::types::StorageKind;

    use super::*;

    #[tokio::test]
    async fn bucket_creation_materializes_backing_stream() {
        let client = MockAdminClient::new();
        let spec = BucketSpec {
            name: ResourceName::from("sessions"),
            storage: StorageKind::Memory,
            replicas: 1,
            max_history_per_key: 5,
            ttl_seconds: 60,
        };
        client.create_bucket(&spec).await.expect("create");

        let streams = client.list_streams().await.expect("list");
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].name.as_str(), "KV_sessions");

        client.delete_bucket("sessions").await.expect("delete");
        assert!(client.list_streams().await.expect("list").is_empty());
        assert!(client.list_buckets().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn injected_failure_reports_and_preserves_state() {
        let client = MockAdminClient::new();
        client.fail_resource("ORDERS");
        let spec = StreamSpec {
            name: ResourceName::from("ORDERS"),
            subjects: vec!["orders.>".to_string()],
            storage: StorageKind::File,
            replicas: 1,
            retention: RetentionKind::Limits,
            max_age_seconds: 0,
        };
        let err = client.create_stream(&spec).await.unwrap_err();
        assert!(matches!(err, ClientError::Request(_)));
        assert!(client.list_streams().await.expect("list").is_empty());
        assert_eq!(client.mutation_calls(), vec!["create_stream ORDERS"]);
    }
}
