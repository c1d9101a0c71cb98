use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use safar_agents::{Completion, PlanSource, PlannerAgent};
use safar_core::{build_prompt, normalize, TripPolicy, TripRequest, TripRequestInput};
use safar_observability::{init_tracing, AppMetrics};

#[derive(Debug, Parser)]
#[command(name = "safar")]
#[command(about = "Safar trip planner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a plan, falling back to the synthesized itinerary on model trouble.
    Plan {
        #[command(flatten)]
        trip: TripArgs,
        /// Skip the model even when SAFAR_LLM_API_KEY is set.
        #[arg(long)]
        offline: bool,
    },
    /// Print the prompt that would be sent to the model.
    Prompt {
        #[command(flatten)]
        trip: TripArgs,
    },
    /// Normalize a saved model reply against a trip.
    Normalize {
        file: PathBuf,
        #[command(flatten)]
        trip: TripArgs,
    },
}

#[derive(Debug, Args)]
struct TripArgs {
    #[arg(long)]
    from: String,
    #[arg(long)]
    to: String,
    /// First day, YYYY-MM-DD.
    #[arg(long)]
    start: String,
    /// Last day, YYYY-MM-DD.
    #[arg(long)]
    end: String,
    #[arg(long, default_value = "balanced")]
    mode: String,
    #[arg(long)]
    travelers: Option<u32>,
}

impl TripArgs {
    fn input(&self) -> TripRequestInput {
        TripRequestInput {
            from: Some(self.from.clone()),
            to: Some(self.to.clone()),
            start_date: Some(self.start.clone()),
            end_date: Some(self.end.clone()),
            mode: Some(self.mode.clone()),
            travelers: self.travelers,
        }
    }

    fn request(&self) -> Result<TripRequest> {
        TripPolicy::default()
            .evaluate(&self.input())
            .context("invalid trip")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing("safar_cli");
    let cli = Cli::parse();

    match cli.command {
        Command::Plan { trip, offline } => {
            let completion = if offline {
                Completion::Offline
            } else {
                Completion::from_env()?
            };
            let agent = PlannerAgent::new(completion, TripPolicy::default(), AppMetrics::shared());
            let outcome = agent.plan(&trip.input()).await.context("invalid trip")?;
            if outcome.source == PlanSource::Fallback && !offline {
                eprintln!("note: model output unavailable, showing synthesized itinerary");
            }
            println!("{}", serde_json::to_string_pretty(&outcome.plan)?);
        }
        Command::Prompt { trip } => {
            println!("{}", build_prompt(&trip.request()?));
        }
        Command::Normalize { file, trip } => {
            let request = trip.request()?;
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("failed reading {}", file.display()))?;
            let plan = normalize(&raw, &request)
                .with_context(|| format!("could not normalize {}", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }

    Ok(())
}
