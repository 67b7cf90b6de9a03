//! async-nats admin client.
//!
//! Owns the connection and the JetStream context. Listings drain the
//! server's paged stream-info responses; bucket listings are derived from
//! the `KV_` backing streams, which carry the full bucket configuration.

use async_nats::connection::State;
use async_nats::jetstream;
use async_trait::async_trait;
use futures::TryStreamExt;

use jetsync_core::types::{BucketSpec, StreamSpec};
use jetsync_reconcile::{AdminClient, ClientError, ObservedBucket, ObservedStream};

use crate::convert;

/// Admin-client implementation backed by one NATS connection.
pub struct NatsAdminClient {
    client: async_nats::Client,
    jetstream: jetstream::Context,
}

impl NatsAdminClient {
    /// Connect to a comma-separated list of server URLs.
    pub async fn connect(servers: &str) -> Result<Self, ClientError> {
        let client = async_nats::connect(servers)
            .await
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;
        tracing::info!(%servers, "connected to NATS");
        let jetstream = jetstream::new(client.clone());
        Ok(Self { client, jetstream })
    }

    async fn raw_streams(&self) -> Result<Vec<jetstream::stream::Config>, ClientError> {
        let mut listing = self.jetstream.streams();
        let mut configs = Vec::new();
        while let Some(info) = listing
            .try_next()
            .await
            .map_err(|e| ClientError::Unavailable(e.to_string()))?
        {
            configs.push(info.config);
        }
        Ok(configs)
    }
}

#[async_trait]
impl AdminClient for NatsAdminClient {
    async fn list_streams(&self) -> Result<Vec<ObservedStream>, ClientError> {
        let streams = self
            .raw_streams()
            .await?
            .iter()
            .map(convert::observed_stream)
            .collect();
        Ok(streams)
    }

    async fn list_buckets(&self) -> Result<Vec<ObservedBucket>, ClientError> {
        let buckets = self
            .raw_streams()
            .await?
            .iter()
            .filter_map(convert::observed_bucket)
            .collect();
        Ok(buckets)
    }

    async fn create_stream(&self, spec: &StreamSpec) -> Result<(), ClientError> {
        tracing::info!(stream = %spec.name, "performing stream creation");
        self.jetstream
            .create_stream(convert::stream_config(spec))
            .await
            .map(|_| ())
            .map_err(|e| ClientError::Request(e.to_string()))
    }

    async fn update_stream(&self, spec: &StreamSpec) -> Result<(), ClientError> {
        tracing::info!(stream = %spec.name, "performing stream update");
        self.jetstream
            .update_stream(convert::stream_config(spec))
            .await
            .map(|_| ())
            .map_err(|e| ClientError::Request(e.to_string()))
    }

    async fn delete_stream(&self, name: &str) -> Result<(), ClientError> {
        tracing::info!(stream = %name, "performing stream deletion");
        self.jetstream
            .delete_stream(name)
            .await
            .map(|_| ())
            .map_err(|e| ClientError::Request(e.to_string()))
    }

    async fn create_bucket(&self, spec: &BucketSpec) -> Result<(), ClientError> {
        tracing::info!(bucket = %spec.name, "performing bucket creation");
        self.jetstream
            .create_key_value(convert::bucket_config(spec))
            .await
            .map(|_| ())
            .map_err(|e| ClientError::Request(e.to_string()))
    }

    async fn update_bucket(&self, spec: &BucketSpec) -> Result<(), ClientError> {
        tracing::info!(bucket = %spec.name, "performing bucket update");
        self.jetstream
            .update_stream(convert::backing_stream_config(spec))
            .await
            .map(|_| ())
            .map_err(|e| ClientError::Request(e.to_string()))
    }

    async fn delete_bucket(&self, name: &str) -> Result<(), ClientError> {
        tracing::info!(bucket = %name, "performing bucket deletion");
        self.jetstream
            .delete_key_value(name)
            .await
            .map(|_| ())
            .map_err(|e| ClientError::Request(e.to_string()))
    }

    fn is_connected(&self) -> bool {
        self.client.connection_state() == State::Connected
    }
}
