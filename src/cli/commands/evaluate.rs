//! Evaluate command - Play a trained policy against a random opponent

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::GameKind;
use crate::{
    adapters::MsgPackRepository,
    chopsticks::Chopsticks,
    cli::output::{format_number, format_share, print_kv, print_section, print_stats_table},
    game::Game,
    noughts::NoughtsAndCrosses,
    pipeline::{AgentSeat, EvaluationConfig, EvaluationResult, evaluate},
    ports::{PolicyRepository, ValueEstimator},
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained policy against a random opponent")]
pub struct EvaluateArgs {
    /// Game the policy was trained on
    #[arg(value_enum)]
    pub game: GameKind,

    /// Path to trained policy file
    pub artifact: PathBuf,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 1_000)]
    pub games: usize,

    /// Seat taken by the evaluated agent
    #[arg(long, value_enum, default_value_t = AgentSeat::Alternate)]
    pub agent_seat: AgentSeat,

    /// Step cap per game; longer games count as draws
    #[arg(long, default_value_t = 100)]
    pub max_steps: usize,

    /// Random seed for the opponent
    #[arg(long)]
    pub seed: Option<u64>,
}

impl EvaluateArgs {
    pub fn evaluation_config(&self) -> EvaluationConfig {
        EvaluationConfig {
            games: self.games,
            agent_seat: self.agent_seat,
            max_steps: self.max_steps,
            seed: self.seed,
        }
    }
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let result = match args.game {
        GameKind::Noughts => load_and_evaluate(NoughtsAndCrosses, &args)?,
        GameKind::Chopsticks => load_and_evaluate(Chopsticks, &args)?,
    };

    print_section("Evaluation results");
    print_stats_table(&[
        ("Games", format_number(result.games)),
        ("Wins", format_share(result.wins, result.win_rate)),
        ("Draws", format_share(result.draws, result.draw_rate)),
        ("Losses", format_share(result.losses, result.loss_rate)),
    ]);
    Ok(())
}

fn load_and_evaluate<G: Game>(game: G, args: &EvaluateArgs) -> Result<EvaluationResult> {
    println!("Loading trained policy from: {}", args.artifact.display());
    let saved = MsgPackRepository::new()
        .load::<G>(&args.artifact)
        .with_context(|| format!("Failed to load policy from {}", args.artifact.display()))?;

    print_section("Loaded policy");
    print_kv("Game", &saved.game);
    print_kv("Store", saved.store.name());
    print_kv(
        "Episodes trained",
        &format_number(saved.metadata.episodes_trained),
    );
    if let Some(mode) = saved.metadata.mode {
        print_kv("Mode", &format!("{mode:?}"));
    }

    let result = evaluate(&game, &saved.store, &args.evaluation_config())
        .context("Evaluation failed")?;
    Ok(result)
}
