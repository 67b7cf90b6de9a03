//! `jetsync validate` — parse and validate the desired-state document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use jetsync_core::config;

/// Arguments for `jetsync validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path of the desired-state document.
    #[arg(long)]
    pub config: PathBuf,
}

impl ValidateArgs {
    pub fn run(self) -> Result<()> {
        let state = config::load_at(&self.config)
            .with_context(|| format!("invalid desired state at {}", self.config.display()))?;

        println!(
            "✓ '{}' is valid ({} streams, {} buckets)",
            self.config.display(),
            state.streams.len(),
            state.buckets.len()
        );
        for stream in &state.streams {
            println!(
                "  stream {} — {} subjects, {} replicas, {} storage",
                stream.name,
                stream.subjects.len(),
                stream.replicas,
                stream.storage
            );
        }
        for bucket in &state.buckets {
            println!(
                "  bucket {} — history {}, ttl {}s, {} replicas",
                bucket.name, bucket.max_history_per_key, bucket.ttl_seconds, bucket.replicas
            );
        }
        Ok(())
    }
}
