use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "foresight",
    about = "Daily context-snapshot pipeline for prediction-market forecasting corpora"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile active/resolved event sets against the upstream listing
    Reconcile,
    /// Draw the day's stratified sample from the active set
    Sample {
        /// Day stamp (YYYYMMDD), defaults to today
        #[arg(long)]
        day: Option<String>,
        /// Override the configured target sample size
        #[arg(long)]
        target: Option<usize>,
        /// Seed the draw for a reproducible sample
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Build and persist snapshots for one chunk of the day's sample
    Build {
        /// Chunk index into the day's sample
        #[arg(long, default_value = "0")]
        chunk: usize,
        /// Day stamp (YYYYMMDD), defaults to today
        #[arg(long)]
        day: Option<String>,
    },
    /// Print a stored snapshot
    Show {
        /// Event id
        event_id: String,
        /// Day stamp (YYYYMMDD), defaults to today
        #[arg(long)]
        day: Option<String>,
    },
    /// Count snapshots stored for a day
    Status {
        /// Day stamp (YYYYMMDD), defaults to today
        #[arg(long)]
        day: Option<String>,
    },
}
