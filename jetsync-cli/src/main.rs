//! jetsync — declarative JetStream topology reconciler.
//!
//! # Usage
//!
//! ```text
//! jetsync validate --config <path>
//! jetsync plan --config <path> --server <urls> [--json]
//! jetsync apply --config <path> --server <urls>
//! jetsync run --config <path> --server <urls> [--interval <secs>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{apply::ApplyArgs, plan::PlanArgs, run::RunArgs, validate::ValidateArgs};

#[derive(Parser, Debug)]
#[command(
    name = "jetsync",
    version,
    about = "Reconcile NATS JetStream streams and key/value buckets against a declared topology",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse and validate the desired-state document.
    Validate(ValidateArgs),

    /// Show what a reconcile cycle would change, without applying anything.
    Plan(PlanArgs),

    /// Run one reconcile cycle and exit.
    Apply(ApplyArgs),

    /// Reconcile continuously on a fixed interval.
    Run(RunArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Validate(args) => args.run(),
        Commands::Plan(args) => args.run().await,
        Commands::Apply(args) => args.run().await,
        Commands::Run(args) => args.run().await,
    }
}
