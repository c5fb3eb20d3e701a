//! Train command - Train a Q-learning agent and save the policy

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use super::GameKind;
use crate::{
    adapters::MsgPackRepository,
    chopsticks::Chopsticks,
    cli::output::{format_number, format_share, print_kv, print_section, print_stats_table},
    game::Game,
    noughts::NoughtsAndCrosses,
    pipeline::{
        AgentSeat, EpsilonSchedule, LogObserver, ProgressObserver, Trainer, TrainerConfig,
        TrainingMode, TrainingResult,
    },
    ports::PolicyRepository,
    q_learning::{PolicyKind, PolicyStore, SavedPolicy, TrainingMetadata},
};

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Game to train on
    #[arg(value_enum)]
    pub game: GameKind,

    /// Value store backing the policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyKind>,

    /// Self-play or play against a random opponent
    #[arg(long, value_enum)]
    pub mode: Option<TrainingMode>,

    /// Learning seat when training against a random opponent
    #[arg(long, value_enum)]
    pub agent_seat: Option<AgentSeat>,

    /// Number of training episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    #[arg(long)]
    pub learning_rate: Option<f64>,

    #[arg(long)]
    pub discount: Option<f64>,

    /// Initial exploration rate
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Per-episode exploration decay factor
    #[arg(long)]
    pub epsilon_decay: Option<f64>,

    /// Exploration floor
    #[arg(long)]
    pub min_epsilon: Option<f64>,

    /// Step cap per episode; longer episodes are scored as draws
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Hidden units of the network policy
    #[arg(long)]
    pub hidden: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON trainer configuration; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file for the trained policy
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl TrainArgs {
    /// Resolve the trainer configuration: defaults, then `--config`, then flags.
    pub fn trainer_config(&self) -> Result<TrainerConfig> {
        let mut config = match &self.config {
            Some(path) => TrainerConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => TrainerConfig::default(),
        };

        if let Some(kind) = self.policy {
            config.policy.kind = kind;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(seat) = self.agent_seat {
            config.agent_seat = seat;
        }
        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        if let Some(rate) = self.learning_rate {
            config.learning_rate = rate;
        }
        if let Some(discount) = self.discount {
            config.discount = discount;
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
        if let Some(hidden) = self.hidden {
            config.policy.network.hidden = hidden;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if self.epsilon.is_some() || self.epsilon_decay.is_some() || self.min_epsilon.is_some() {
            config.epsilon = self.epsilon_schedule(config.epsilon);
        }

        config.validate().context("Invalid training configuration")?;
        Ok(config)
    }

    fn epsilon_schedule(&self, current: EpsilonSchedule) -> EpsilonSchedule {
        let (start, decay, min) = match current {
            EpsilonSchedule::Exponential { start, decay, min } => (start, decay, min),
            EpsilonSchedule::Constant(epsilon) => (epsilon, 1.0, epsilon),
            EpsilonSchedule::Linear { start, end, .. } => (start, 1.0, end),
        };
        let start = self.epsilon.unwrap_or(start);
        let decay = self.epsilon_decay.unwrap_or(decay);
        // An inherited floor follows a lowered start; an explicit one is validated.
        let min = self.min_epsilon.unwrap_or(min.min(start));
        EpsilonSchedule::Exponential { start, decay, min }
    }
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    game: &'static str,
    policy: PolicyKind,
    training: &'a TrainingResult,
    config: &'a TrainerConfig,
    output: Option<&'a Path>,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.trainer_config()?;
    match args.game {
        GameKind::Noughts => train_and_save(NoughtsAndCrosses, &args, config),
        GameKind::Chopsticks => train_and_save(Chopsticks, &args, config),
    }
}

fn train_and_save<G: Game>(game: G, args: &TrainArgs, config: TrainerConfig) -> Result<()> {
    print_section(&format!("Training {} agent", G::NAME));
    print_kv("Policy", &config.policy.kind.to_string());
    print_kv("Mode", &format!("{:?}", config.mode));
    print_kv("Episodes", &format_number(config.episodes));
    if let Some(seed) = config.seed {
        print_kv("Seed", &seed.to_string());
    }

    let (store, result) = train(game, config.clone(), !args.no_progress)?;

    print_section("Training results");
    print_stats_table(&[
        ("Episodes", format_number(result.episodes)),
        ("Wins", format_share(result.wins, result.win_rate)),
        ("Draws", format_share(result.draws, result.draw_rate)),
        ("Losses", format_share(result.losses, result.loss_rate)),
        ("Truncated", format_number(result.truncated)),
        ("Final epsilon", format!("{:.4}", result.final_epsilon)),
        ("Converged early", result.converged.to_string()),
    ]);

    if let Some(output_path) = &args.output {
        let metadata = TrainingMetadata::new(result.episodes, config.mode, config.seed);
        let saved = SavedPolicy::new(store, metadata);
        MsgPackRepository::new()
            .save(&saved, output_path)
            .with_context(|| format!("Failed to save policy to {}", output_path.display()))?;
        println!("\n✓ Policy saved to: {}", output_path.display());
    }

    if let Some(summary_path) = &args.summary {
        if let Some(parent) = summary_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let summary = TrainingSummaryFile {
            game: G::NAME,
            policy: config.policy.kind,
            training: &result,
            config: &config,
            output: args.output.as_deref(),
        };
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(summary_path, json)
            .with_context(|| format!("Failed to write summary {}", summary_path.display()))?;
        println!("Summary written to {}", summary_path.display());
    }

    Ok(())
}

/// Train a fresh store with the standard observers attached.
pub(crate) fn train<G: Game>(
    game: G,
    config: TrainerConfig,
    progress: bool,
) -> Result<(PolicyStore<G>, TrainingResult)> {
    let log_interval = config.log_interval;
    let mut trainer = Trainer::new(game, config)
        .context("Invalid training configuration")?
        .with_observer(Box::new(LogObserver::new(log_interval)));
    if progress {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }
    let trained = trainer.train().context("Training failed")?;
    Ok(trained)
}
