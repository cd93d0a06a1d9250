use clap::Parser;
use foresight::cli::commands::{Cli, Commands};
use foresight::config::PipelineConfig;
use foresight::domain::values::day_stamp::DayStamp;
use foresight::Foresight;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = PipelineConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let pipeline = match Foresight::new(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Error initializing pipeline: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(pipeline, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(
    pipeline: Foresight,
    cmd: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Reconcile => {
            let report = pipeline.reconcile().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Sample { day, target, seed } => {
            let sample = pipeline.sample(parse_day(&day)?, target, seed)?;
            println!("{}", serde_json::to_string_pretty(&sample)?);
        }
        Commands::Build { chunk, day } => {
            let report = pipeline.build_chunk(parse_day(&day)?, chunk).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Show { event_id, day } => {
            let day = parse_day(&day)?;
            match pipeline.snapshot(&event_id, day)? {
                Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                None => println!("No snapshot for {event_id} on {day}"),
            }
        }
        Commands::Status { day } => {
            let day = parse_day(&day)?;
            let count = pipeline.snapshot_count(day)?;
            println!("{count} snapshots stored for {day}");
        }
    }
    Ok(())
}

fn parse_day(s: &Option<String>) -> Result<DayStamp, String> {
    match s {
        None => Ok(DayStamp::today()),
        Some(s) => s.parse(),
    }
}
