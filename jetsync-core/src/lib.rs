//! # jetsync-core
//!
//! Desired-state model and config resolver for the jetsync reconciler.
//!
//! A jetsync deployment declares the JetStream topology it wants — streams
//! and key/value buckets — in one YAML document. [`config::load_at`] parses
//! and validates that document into a [`types::DesiredState`], which the
//! reconcile engine compares against the live cluster every cycle.

pub mod config;
pub mod error;
pub mod types;

pub use config::load_at;
pub use error::ConfigError;
pub use types::{
    BucketSpec, DesiredState, ResourceKind, ResourceName, RetentionKind, StorageKind, StreamSpec,
    KV_BACKING_PREFIX,
};
