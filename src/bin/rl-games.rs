//! rl-games CLI - Q-learning agents for small two-player games
//!
//! This CLI provides a unified interface for:
//! - Training agents by self-play or against a random opponent
//! - Evaluating trained policies
//! - Comparing two policies head-to-head
//! - Playing against a trained agent in the terminal

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rl-games")]
#[command(version, about = "Train and play noughts-and-crosses and chopsticks agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-learning agent
    Train(Box<rl_games::cli::commands::train::TrainArgs>),

    /// Evaluate a trained policy against a random opponent
    Evaluate(rl_games::cli::commands::evaluate::EvaluateArgs),

    /// Play two policies against each other in both seatings
    Compare(rl_games::cli::commands::compare::CompareArgs),

    /// Play against a trained agent
    Play(rl_games::cli::commands::play::PlayArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => rl_games::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => rl_games::cli::commands::evaluate::execute(args),
        Commands::Compare(args) => rl_games::cli::commands::compare::execute(args),
        Commands::Play(args) => rl_games::cli::commands::play::execute(args),
    }
}
