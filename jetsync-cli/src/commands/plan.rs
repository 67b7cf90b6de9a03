//! `jetsync plan` — dry-run diff between the document and the live cluster.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use jetsync_core::config;
use jetsync_nats::NatsAdminClient;
use jetsync_reconcile::{CyclePlan, Reconciler};

/// Arguments for `jetsync plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path of the desired-state document.
    #[arg(long)]
    pub config: PathBuf,

    /// Comma-separated NATS server URLs.
    #[arg(long)]
    pub server: String,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct PlanRow {
    kind: &'static str,
    action: &'static str,
    name: String,
}

impl PlanArgs {
    pub async fn run(self) -> Result<()> {
        let state = config::load_at(&self.config)
            .with_context(|| format!("invalid desired state at {}", self.config.display()))?;

        let client = NatsAdminClient::connect(&self.server)
            .await
            .with_context(|| format!("failed to connect to {}", self.server))?;
        let reconciler = Reconciler::new(client);
        let cycle = reconciler
            .plan(&state)
            .await
            .context("failed to compute plan")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&cycle)?);
            return Ok(());
        }

        if cycle.is_empty() {
            println!("{} cluster matches the desired state — nothing to do", "✓".green());
            return Ok(());
        }

        let rows = collect_rows(&cycle);
        println!("{}", Table::new(&rows).with(Style::rounded()));
        println!(
            "{} to create, {} to update, {} to delete",
            (cycle.streams.to_create.len() + cycle.buckets.to_create.len())
                .to_string()
                .green(),
            (cycle.streams.to_update.len() + cycle.buckets.to_update.len())
                .to_string()
                .yellow(),
            (cycle.streams.to_delete.len() + cycle.buckets.to_delete.len())
                .to_string()
                .red(),
        );
        Ok(())
    }
}

fn collect_rows(cycle: &CyclePlan) -> Vec<PlanRow> {
    let mut rows = Vec::new();
    for s in &cycle.streams.to_create {
        rows.push(PlanRow { kind: "stream", action: "create", name: s.name.to_string() });
    }
    for s in &cycle.streams.to_update {
        rows.push(PlanRow { kind: "stream", action: "update", name: s.name.to_string() });
    }
    for n in &cycle.streams.to_delete {
        rows.push(PlanRow { kind: "stream", action: "delete", name: n.to_string() });
    }
    for b in &cycle.buckets.to_create {
        rows.push(PlanRow { kind: "bucket", action: "create", name: b.name.to_string() });
    }
    for b in &cycle.buckets.to_update {
        rows.push(PlanRow { kind: "bucket", action: "update", name: b.name.to_string() });
    }
    for n in &cycle.buckets.to_delete {
        rows.push(PlanRow { kind: "bucket", action: "delete", name: n.to_string() });
    }
    rows
}
