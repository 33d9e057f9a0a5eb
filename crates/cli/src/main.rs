//! Disease Prediction CLI
//!
//! A command-line tool for checking server status and exercising the
//! prediction endpoints of the disease prediction API.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{predict, status};

/// Disease Prediction CLI
#[derive(Parser)]
#[command(name = "mdp")]
#[command(author, version, about = "CLI for the Disease Prediction API", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via MDP_API_URL env var)
    #[arg(long, env = "MDP_API_URL", default_value = "http://localhost:5000")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show server status and model availability
    Status,

    /// Request a prediction from a model
    Predict {
        /// Model name (diabetes, heart, parkinsons, autism)
        model: String,

        /// Comma-separated feature vector
        #[arg(long, value_delimiter = ',')]
        features: Option<Vec<f64>>,

        /// Questionnaire answers as index=value pairs (e.g. 0=4,1=3)
        #[arg(long, value_delimiter = ',')]
        answers: Option<Vec<String>>,

        /// Respondent age (autism model)
        #[arg(long)]
        age: Option<f64>,

        /// Risk percentage fallback (autism model)
        #[arg(long)]
        risk: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize client
    let client = client::ApiClient::new(&cli.api_url)?;

    // Execute command
    match cli.command {
        Commands::Status => {
            status::show_status(&client, cli.format).await?;
        }
        Commands::Predict {
            model,
            features,
            answers,
            age,
            risk,
        } => {
            predict::run_prediction(&client, &model, features, answers, age, risk, cli.format)
                .await?;
        }
    }

    Ok(())
}
