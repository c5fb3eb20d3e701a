//! Configuration-time choice between the table and network backends

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    game::Game,
    ports::ValueEstimator,
    q_learning::{NetworkConfig, QNetwork, QTable},
};

/// Which backend holds the value estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Table,
    Network,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Table => write!(f, "table"),
            PolicyKind::Network => write!(f, "network"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub kind: PolicyKind,
    /// Table value for unseen pairs
    pub default_value: f64,
    pub network: NetworkConfig,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            kind: PolicyKind::Table,
            default_value: 0.0,
            network: NetworkConfig::default(),
        }
    }
}

/// Value store used by training, evaluation and play.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum PolicyStore<G: Game> {
    Table(QTable<G>),
    Network(QNetwork<G>),
}

impl<G: Game> PolicyStore<G> {
    /// Build an empty store of the configured kind.
    ///
    /// `seed` only matters for the network's initial weights.
    pub fn new(config: &PolicyConfig, seed: u64) -> Result<Self> {
        match config.kind {
            PolicyKind::Table => Ok(Self::table(config.default_value)),
            PolicyKind::Network => Ok(Self::Network(QNetwork::new(&config.network, seed)?)),
        }
    }

    pub fn table(default_value: f64) -> Self {
        Self::Table(QTable::new(default_value))
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            Self::Table(_) => PolicyKind::Table,
            Self::Network(_) => PolicyKind::Network,
        }
    }

    /// Reject a decoded network whose layers do not fit `G`.
    pub fn check_shape(&self) -> Result<()> {
        match self {
            Self::Table(_) => Ok(()),
            Self::Network(network) => network.check_shape(),
        }
    }

    pub fn as_table(&self) -> Option<&QTable<G>> {
        match self {
            Self::Table(table) => Some(table),
            Self::Network(_) => None,
        }
    }
}

impl<G: Game> ValueEstimator<G> for PolicyStore<G> {
    fn value(&self, state: &G::State, action: G::Action) -> f64 {
        match self {
            Self::Table(table) => table.value(state, action),
            Self::Network(network) => network.value(state, action),
        }
    }

    fn update(&mut self, state: &G::State, action: G::Action, target: f64, learning_rate: f64) {
        match self {
            Self::Table(table) => table.update(state, action, target, learning_rate),
            Self::Network(network) => network.update(state, action, target, learning_rate),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Table(table) => table.name(),
            Self::Network(network) => network.name(),
        }
    }

    fn action_values(&self, state: &G::State, actions: &[G::Action]) -> Vec<f64> {
        match self {
            Self::Table(table) => table.action_values(state, actions),
            Self::Network(network) => network.action_values(state, actions),
        }
    }
}
