//! Conversions between jetsync specs and async-nats JetStream configs.
//!
//! Buckets are materialized by the server as streams named
//! `KV_<bucket>` capturing `$KV.<bucket>.>`; bucket observation and update
//! go through that backing-stream shape.

use std::time::Duration;

use async_nats::jetstream::stream;

use jetsync_core::types::{
    BucketSpec, ResourceName, RetentionKind, StorageKind, StreamSpec, KV_BACKING_PREFIX,
};
use jetsync_reconcile::{ObservedBucket, ObservedStream};

pub(crate) fn storage_type(kind: StorageKind) -> stream::StorageType {
    match kind {
        StorageKind::File => stream::StorageType::File,
        StorageKind::Memory => stream::StorageType::Memory,
    }
}

pub(crate) fn storage_kind(storage: stream::StorageType) -> StorageKind {
    match storage {
        stream::StorageType::File => StorageKind::File,
        stream::StorageType::Memory => StorageKind::Memory,
    }
}

pub(crate) fn retention_policy(kind: RetentionKind) -> stream::RetentionPolicy {
    match kind {
        RetentionKind::Limits => stream::RetentionPolicy::Limits,
        RetentionKind::Interest => stream::RetentionPolicy::Interest,
        RetentionKind::WorkQueue => stream::RetentionPolicy::WorkQueue,
    }
}

pub(crate) fn retention_kind(policy: stream::RetentionPolicy) -> RetentionKind {
    match policy {
        stream::RetentionPolicy::Limits => RetentionKind::Limits,
        stream::RetentionPolicy::Interest => RetentionKind::Interest,
        stream::RetentionPolicy::WorkQueue => RetentionKind::WorkQueue,
    }
}

/// Stream config for a desired stream.
pub(crate) fn stream_config(spec: &StreamSpec) -> stream::Config {
    stream::Config {
        name: spec.name.to_string(),
        subjects: spec.subjects.iter().cloned().map(Into::into).collect(),
        max_age: Duration::from_secs(spec.max_age_seconds),
        storage: storage_type(spec.storage),
        num_replicas: spec.replicas,
        retention: retention_policy(spec.retention),
        ..Default::default()
    }
}

/// Comparison shape of a broker-reported stream.
pub(crate) fn observed_stream(config: &stream::Config) -> ObservedStream {
    ObservedStream {
        name: ResourceName::from(config.name.as_str()),
        subjects: config.subjects.iter().map(|s| s.to_string()).collect(),
        storage: storage_kind(config.storage),
        replicas: config.num_replicas,
        retention: retention_kind(config.retention),
        max_age_seconds: config.max_age.as_secs(),
    }
}

/// KV bucket config for a desired bucket.
pub(crate) fn bucket_config(spec: &BucketSpec) -> async_nats::jetstream::kv::Config {
    async_nats::jetstream::kv::Config {
        bucket: spec.name.to_string(),
        history: spec.max_history_per_key,
        max_age: Duration::from_secs(spec.ttl_seconds),
        storage: storage_type(spec.storage),
        num_replicas: spec.replicas,
        ..Default::default()
    }
}

/// The backing-stream config the server materializes for a bucket.
///
/// Updates target this shape directly: the bucket attributes map one-to-one
/// (history ⇄ max-messages-per-subject, TTL ⇄ max-age), and the flags the
/// server sets at bucket creation must be carried or the update would try to
/// unset them — deny-delete in particular is immutable.
pub(crate) fn backing_stream_config(spec: &BucketSpec) -> stream::Config {
    stream::Config {
        name: format!("{KV_BACKING_PREFIX}{}", spec.name),
        subjects: vec![format!("$KV.{}.>", spec.name).into()],
        max_messages_per_subject: spec.max_history_per_key,
        max_age: Duration::from_secs(spec.ttl_seconds),
        storage: storage_type(spec.storage),
        num_replicas: spec.replicas,
        discard: stream::DiscardPolicy::New,
        allow_rollup: true,
        deny_delete: true,
        allow_direct: true,
        ..Default::default()
    }
}

/// Map a backing stream back to the bucket comparison shape.
///
/// Returns `None` for ordinary streams.
pub(crate) fn observed_bucket(config: &stream::Config) -> Option<ObservedBucket> {
    let bucket = config.name.strip_prefix(KV_BACKING_PREFIX)?;
    Some(ObservedBucket {
        name: ResourceName::from(bucket),
        storage: storage_kind(config.storage),
        replicas: config.num_replicas,
        max_history_per_key: config.max_messages_per_subject,
        ttl_seconds: config.max_age.as_secs(),
    })
}
