//! Meal Poll CLI
//!
//! Offline tools for the meal dataset:
//! - Inspect a CSV (encoding, rows, dates, dishes)
//! - Tally a list of votes against its menu
//! - Generate a default config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use meal_poll::config::{generate_default_config, DatasetConfig};
use meal_poll::dataset::MealLoader;
use meal_poll::tally::VoteTally;

#[derive(Parser)]
#[command(name = "meal-poll-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tools for the school meal voting dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Encoding tried first
    #[arg(long, default_value = "utf-8", global = true)]
    pub encoding: String,

    /// Encoding retried when the first one fails
    #[arg(long, default_value = "cp949", global = true)]
    pub fallback_encoding: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show what the dashboard would load from a CSV file
    Inspect {
        /// Path to CSV file
        path: PathBuf,
    },

    /// Count votes for dishes in a CSV file's menu
    Tally {
        /// Path to CSV file
        path: PathBuf,
        /// Dish to vote for (repeatable)
        #[arg(short, long = "vote")]
        votes: Vec<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let dataset_config = DatasetConfig {
        primary_encoding: cli.encoding.clone(),
        fallback_encoding: cli.fallback_encoding.clone(),
        ..Default::default()
    };

    match cli.command {
        Commands::Inspect { path } => {
            let loader = MealLoader::from_config(&dataset_config)?;
            let table = loader
                .load(&path)
                .await
                .with_context(|| format!("Failed to load {}", path.display()))?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&table)?);
                return Ok(());
            }

            println!("File:     {}", table.source.display());
            println!("Encoding: {}", table.encoding);
            println!("Rows:     {}", table.len());
            if let Some((first, last)) = table.date_span() {
                println!("Dates:    {} .. {}", first, last);
            }

            let missing_calories = table.records.iter().filter(|r| r.calories.is_none()).count();
            if missing_calories > 0 {
                println!("Rows without calories: {}", missing_calories);
            }

            let dishes = table.distinct_dishes();
            println!();
            println!("Dishes ({}):", dishes.len());
            for dish in dishes {
                println!("  {}", dish);
            }
        }

        Commands::Tally { path, votes } => {
            let loader = MealLoader::from_config(&dataset_config)?;
            let table = loader
                .load(&path)
                .await
                .with_context(|| format!("Failed to load {}", path.display()))?;

            if table.is_empty() {
                bail!("{} has no rows", path.display());
            }

            let mut tally = VoteTally::new();
            tally.initialize(table.distinct_dishes());
            for vote in &votes {
                tally.record_vote(vote)?;
            }

            let sorted = tally.sorted();
            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&sorted)?);
            } else {
                println!("{:<30} {}", "Dish", "Votes");
                println!("{}", "-".repeat(40));
                for entry in sorted {
                    println!("{:<30} {}", entry.dish, entry.count);
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}
