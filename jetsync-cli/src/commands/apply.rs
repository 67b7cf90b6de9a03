//! `jetsync apply` — one reconcile cycle, then exit.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use jetsync_core::config;
use jetsync_nats::NatsAdminClient;
use jetsync_reconcile::{KindOutcome, Reconciler};

/// Arguments for `jetsync apply`.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Path of the desired-state document.
    #[arg(long)]
    pub config: PathBuf,

    /// Comma-separated NATS server URLs.
    #[arg(long)]
    pub server: String,
}

impl ApplyArgs {
    pub async fn run(self) -> Result<()> {
        let state = config::load_at(&self.config)
            .with_context(|| format!("invalid desired state at {}", self.config.display()))?;

        let client = NatsAdminClient::connect(&self.server)
            .await
            .with_context(|| format!("failed to connect to {}", self.server))?;
        let reconciler = Reconciler::new(client);
        let result = reconciler.reconcile(Some(&state)).await;

        print_outcome("streams", &result.streams);
        print_outcome("buckets", &result.buckets);

        let failed = result.streams.errors().len() + result.buckets.errors().len();
        if failed > 0 {
            bail!("reconcile completed with {failed} errors");
        }
        if result.is_noop() {
            println!("{} cluster already converged", "✓".green());
        }
        Ok(())
    }
}

fn print_outcome(kind: &str, outcome: &KindOutcome) {
    match outcome {
        KindOutcome::Skipped { reason } => {
            println!("{} {kind} skipped: {reason}", "!".yellow());
        }
        KindOutcome::Applied {
            created,
            updated,
            deleted,
            errors,
        } => {
            if created + updated + deleted > 0 {
                println!(
                    "{} {kind}: {created} created, {updated} updated, {deleted} deleted",
                    "✓".green()
                );
            }
            for err in errors {
                println!(
                    "{} {kind} {} {} failed: {}",
                    "✗".red(),
                    err.action,
                    err.name,
                    err.message
                );
            }
        }
    }
}
