//! Trainer and evaluation configuration
//!
//! Every knob is a plain serde struct with a `Default`, so a JSON file only
//! needs to name the fields it changes.

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    game::{GameOutcome, Player},
    q_learning::{PolicyConfig, PolicyKind},
};

/// Who sits across from a learning seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TrainingMode {
    /// Both seats learn into the same store.
    #[default]
    SelfPlay,
    /// One learning seat against a uniformly random opponent.
    #[value(name = "random", alias = "vs-random")]
    #[serde(alias = "random")]
    VsRandom,
}

/// Seat taken by the agent when only one seat learns or is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AgentSeat {
    First,
    Second,
    /// First on even episodes, second on odd ones.
    #[default]
    Alternate,
}

impl AgentSeat {
    pub fn seat_for(self, episode: usize) -> Player {
        match self {
            AgentSeat::First => Player::One,
            AgentSeat::Second => Player::Two,
            AgentSeat::Alternate if episode % 2 == 0 => Player::One,
            AgentSeat::Alternate => Player::Two,
        }
    }
}

/// Exploration rate as a function of the episode number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpsilonSchedule {
    Constant(f64),
    /// `max(start · decay^episode, min)`
    Exponential { start: f64, decay: f64, min: f64 },
    /// Straight line from `start` to `end` over `episodes`, then `end`.
    Linear { start: f64, end: f64, episodes: usize },
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        EpsilonSchedule::Exponential {
            start: 0.5,
            decay: 0.9999,
            min: 0.05,
        }
    }
}

impl EpsilonSchedule {
    pub fn value(&self, episode: usize) -> f64 {
        match *self {
            EpsilonSchedule::Constant(epsilon) => epsilon,
            EpsilonSchedule::Exponential { start, decay, min } => {
                let exponent = i32::try_from(episode).unwrap_or(i32::MAX);
                (start * decay.powi(exponent)).max(min)
            }
            EpsilonSchedule::Linear {
                start,
                end,
                episodes,
            } => {
                if episodes == 0 || episode >= episodes {
                    end
                } else {
                    start + (end - start) * episode as f64 / episodes as f64
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let check = |name: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(Error::invalid_config(format!(
                    "epsilon {name} must be within [0, 1], got {value}"
                )))
            }
        };
        match *self {
            EpsilonSchedule::Constant(epsilon) => check("value", epsilon),
            EpsilonSchedule::Exponential { start, decay, min } => {
                check("start", start)?;
                check("min", min)?;
                if min > start {
                    return Err(Error::invalid_config(format!(
                        "epsilon min {min} is above its start {start}"
                    )));
                }
                if decay > 0.0 && decay <= 1.0 {
                    Ok(())
                } else {
                    Err(Error::invalid_config(format!(
                        "epsilon decay must be within (0, 1], got {decay}"
                    )))
                }
            }
            EpsilonSchedule::Linear { start, end, .. } => {
                check("start", start)?;
                check("end", end)
            }
        }
    }
}

/// Terminal rewards, each seen from the seat being rewarded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rewards {
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            win: 1.0,
            draw: 0.0,
            loss: -1.0,
        }
    }
}

impl Rewards {
    /// Reward `player` receives for `outcome`.
    pub fn for_player(&self, outcome: GameOutcome, player: Player) -> f64 {
        match outcome {
            GameOutcome::Win(winner) if winner == player => self.win,
            GameOutcome::Win(_) => self.loss,
            GameOutcome::Draw => self.draw,
        }
    }
}

/// Early stop once learning has settled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Convergence {
    /// Largest absolute value change tolerated over the window
    pub threshold: f64,
    /// Number of consecutive episodes inspected
    pub window: usize,
}

/// Trainer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Number of training episodes
    pub episodes: usize,
    pub learning_rate: f64,
    pub discount: f64,
    pub epsilon: EpsilonSchedule,
    pub rewards: Rewards,
    pub mode: TrainingMode,
    /// Learning seat in [`TrainingMode::VsRandom`]
    pub agent_seat: AgentSeat,
    /// Episodes longer than this are truncated and scored as draws
    pub max_steps: usize,
    /// Random seed
    pub seed: Option<u64>,
    pub policy: PolicyConfig,
    pub convergence: Option<Convergence>,
    /// Episodes between debug log lines
    pub log_interval: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            episodes: 40_000,
            learning_rate: 0.1,
            discount: 0.9,
            epsilon: EpsilonSchedule::default(),
            rewards: Rewards::default(),
            mode: TrainingMode::SelfPlay,
            agent_seat: AgentSeat::Alternate,
            max_steps: 100,
            seed: None,
            policy: PolicyConfig::default(),
            convergence: None,
            log_interval: 1_000,
        }
    }
}

impl TrainerConfig {
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_epsilon(mut self, epsilon: EpsilonSchedule) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_rewards(mut self, rewards: Rewards) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_mode(mut self, mode: TrainingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_agent_seat(mut self, agent_seat: AgentSeat) -> Self {
        self.agent_seat = agent_seat;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_policy_kind(mut self, kind: PolicyKind) -> Self {
        self.policy.kind = kind;
        self
    }

    pub fn with_convergence(mut self, convergence: Convergence) -> Self {
        self.convergence = Some(convergence);
        self
    }

    /// Parse a JSON document; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for malformed JSON, values of the
    /// wrong type (such as a negative episode count), or values that fail
    /// [`TrainerConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::invalid_config(format!("could not parse trainer config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {path:?}"),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject values the trainer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::invalid_config(format!(
                "learning_rate must be within (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(Error::invalid_config(format!(
                "discount must be within [0, 1], got {}",
                self.discount
            )));
        }
        self.epsilon.validate()?;
        if self.max_steps == 0 {
            return Err(Error::invalid_config("max_steps must be at least 1"));
        }
        for (name, value) in [
            ("win", self.rewards.win),
            ("draw", self.rewards.draw),
            ("loss", self.rewards.loss),
        ] {
            if !value.is_finite() {
                return Err(Error::invalid_config(format!(
                    "{name} reward must be finite, got {value}"
                )));
            }
        }
        if self.policy.kind == PolicyKind::Network {
            self.policy.network.validate()?;
        }
        if let Some(convergence) = &self.convergence {
            if convergence.window == 0 {
                return Err(Error::invalid_config("convergence window must be at least 1"));
            }
            if convergence.threshold.is_nan() || convergence.threshold < 0.0 {
                return Err(Error::invalid_config(format!(
                    "convergence threshold must be non-negative, got {}",
                    convergence.threshold
                )));
            }
        }
        Ok(())
    }
}

/// Evaluation configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Number of evaluation games
    pub games: usize,
    pub agent_seat: AgentSeat,
    pub max_steps: usize,
    /// Seed for the random opponent
    pub seed: Option<u64>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            games: 1_000,
            agent_seat: AgentSeat::Alternate,
            max_steps: 100,
            seed: None,
        }
    }
}

impl EvaluationConfig {
    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    pub fn with_agent_seat(mut self, agent_seat: AgentSeat) -> Self {
        self.agent_seat = agent_seat;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Head-to-head configuration for two stored policies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Number of games, all with the same seating
    pub games: usize,
    /// Chance that the first mover plays a uniformly random move instead
    pub first_epsilon: f64,
    /// Chance that the second mover plays a uniformly random move instead
    pub second_epsilon: f64,
    pub max_steps: usize,
    pub seed: Option<u64>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            games: 100,
            first_epsilon: 0.0,
            second_epsilon: 0.0,
            max_steps: 100,
            seed: None,
        }
    }
}

impl ComparisonConfig {
    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    pub fn with_epsilons(mut self, first: f64, second: f64) -> Self {
        self.first_epsilon = first;
        self.second_epsilon = second;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Same settings with the seats' exploration swapped.
    pub fn swapped(self) -> Self {
        Self {
            first_epsilon: self.second_epsilon,
            second_epsilon: self.first_epsilon,
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (seat, epsilon) in [("first", self.first_epsilon), ("second", self.second_epsilon)] {
            if !(0.0..=1.0).contains(&epsilon) {
                return Err(Error::invalid_config(format!(
                    "{seat} epsilon must be within [0, 1], got {epsilon}"
                )));
            }
        }
        if self.max_steps == 0 {
            return Err(Error::invalid_config("max_steps must be at least 1"));
        }
        Ok(())
    }
}
