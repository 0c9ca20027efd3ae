//! Skill prediction CLI
//!
//! A command-line client for querying the skill prediction service.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{health, predict};

/// Skill prediction CLI
#[derive(Parser)]
#[command(name = "skillctl")]
#[command(author, version, about = "CLI for the Skill Prediction Service", long_about = None)]
pub struct Cli {
    /// Service URL (can also be set via SKILLCTL_URL env var)
    #[arg(long, env = "SKILLCTL_URL", default_value = "http://127.0.0.1:5000")]
    pub url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict the skill tested by one or more questions
    Predict {
        /// Question text; pass several to classify each in turn
        #[arg(required = true)]
        questions: Vec<String>,
    },

    /// Show service health and readiness
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let client = client::ApiClient::new(&cli.url)?;

    match cli.command {
        Commands::Predict { questions } => {
            predict::predict(&client, &questions, cli.format).await?;
        }
        Commands::Health => {
            health::show_health(&client, cli.format).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_predict_with_multiple_questions() {
        let cli = Cli::try_parse_from([
            "skillctl",
            "--url",
            "http://localhost:9000",
            "predict",
            "Reverse a linked list",
            "Sort an array",
        ])
        .unwrap();

        assert_eq!(cli.url, "http://localhost:9000");
        match cli.command {
            Commands::Predict { questions } => {
                assert_eq!(questions, vec!["Reverse a linked list", "Sort an array"]);
            }
            Commands::Health => panic!("expected predict"),
        }
    }

    #[test]
    fn test_predict_requires_question() {
        assert!(Cli::try_parse_from(["skillctl", "predict"]).is_err());
    }
}
