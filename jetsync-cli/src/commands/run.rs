//! `jetsync run` — continuous reconciliation on a fixed interval.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use jetsync_daemon::{init_tracing, Settings};
use jetsync_nats::NatsAdminClient;

/// Arguments for `jetsync run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path of the desired-state document, re-read every cycle.
    #[arg(long)]
    pub config: PathBuf,

    /// Comma-separated NATS server URLs.
    #[arg(long)]
    pub server: String,

    /// Seconds between reconcile cycles.
    #[arg(long, default_value_t = 30)]
    pub interval: u64,
}

impl RunArgs {
    pub async fn run(self) -> Result<()> {
        init_tracing();

        let client = NatsAdminClient::connect(&self.server)
            .await
            .with_context(|| format!("failed to connect to {}", self.server))?;

        jetsync_daemon::run(
            client,
            Settings {
                config_path: self.config,
                interval: Duration::from_secs(self.interval),
            },
        )
        .await
        .context("reconcile loop failed")
    }
}
