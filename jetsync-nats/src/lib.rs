//! # jetsync-nats
//!
//! async-nats implementation of the [`jetsync_reconcile::AdminClient`]
//! capability: stream and bucket listings, create/update/delete, and the
//! connection-state liveness signal.

mod client;
mod convert;

pub use client::NatsAdminClient;
