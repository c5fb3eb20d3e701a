//! One-hidden-layer Q-network
//!
//! The network maps [`Game::encode`] features through a sigmoid hidden layer
//! to one linear output per action, so a single forward pass scores every
//! action of a state.

use std::marker::PhantomData;

use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, game::Game, ports::ValueEstimator};

/// Shape and initialisation of a [`QNetwork`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Hidden layer width
    pub hidden: usize,
    /// Weights start uniformly in `[-init_scale, init_scale]`
    pub init_scale: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            hidden: 64,
            init_scale: 0.1,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.hidden == 0 {
            return Err(Error::invalid_config("network needs at least one hidden unit"));
        }
        if !(self.init_scale > 0.0 && self.init_scale.is_finite()) {
            return Err(Error::invalid_config(format!(
                "network init_scale must be positive, got {}",
                self.init_scale
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct QNetwork<G: Game> {
    /// hidden × features
    w_hidden: Array2<f64>,
    b_hidden: Array1<f64>,
    /// actions × hidden
    w_out: Array2<f64>,
    b_out: Array1<f64>,
    #[serde(skip)]
    game: PhantomData<G>,
}

impl<G: Game> QNetwork<G> {
    /// Build a network with seeded random weights.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` fails validation.
    pub fn new(config: &NetworkConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let scale = config.init_scale;
        let mut init = |shape: (usize, usize)| {
            Array2::from_shape_fn(shape, |_| rng.random_range(-scale..=scale))
        };

        let w_hidden = init((config.hidden, G::FEATURE_LEN));
        let w_out = init((G::ACTION_COUNT, config.hidden));

        Ok(Self {
            w_hidden,
            b_hidden: Array1::zeros(config.hidden),
            w_out,
            b_out: Array1::zeros(G::ACTION_COUNT),
            game: PhantomData,
        })
    }

    pub fn hidden_units(&self) -> usize {
        self.b_hidden.len()
    }

    /// Check that the layer shapes fit `G` and agree with each other.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationContext`] describing the first mismatch.
    pub fn check_shape(&self) -> Result<()> {
        let hidden = self.b_hidden.len();
        let expected = [
            ("hidden weights", self.w_hidden.dim(), (hidden, G::FEATURE_LEN)),
            ("output weights", self.w_out.dim(), (G::ACTION_COUNT, hidden)),
        ];
        for (layer, found, wanted) in expected {
            if found != wanted {
                return Err(Error::SerializationContext {
                    operation: format!("load {} network", G::NAME),
                    message: format!("{layer} have shape {found:?}, expected {wanted:?}"),
                });
            }
        }
        if hidden == 0 || self.b_out.len() != G::ACTION_COUNT {
            return Err(Error::SerializationContext {
                operation: format!("load {} network", G::NAME),
                message: format!(
                    "biases have lengths {} and {}, expected at least 1 and {}",
                    hidden,
                    self.b_out.len(),
                    G::ACTION_COUNT
                ),
            });
        }
        Ok(())
    }

    /// Output row for `action`, if the network has one.
    fn output_index(&self, action: G::Action) -> Option<usize> {
        let index = G::action_index(action);
        (index < self.b_out.len()).then_some(index)
    }

    fn features(state: &G::State) -> Array1<f64> {
        Array1::from(G::encode(state))
    }

    fn hidden_activations(&self, features: &Array1<f64>) -> Array1<f64> {
        (self.w_hidden.dot(features) + &self.b_hidden).mapv(sigmoid)
    }

    /// Q-values for every action index of `state`.
    pub fn forward(&self, state: &G::State) -> Array1<f64> {
        let hidden = self.hidden_activations(&Self::features(state));
        self.w_out.dot(&hidden) + &self.b_out
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl<G: Game> ValueEstimator<G> for QNetwork<G> {
    /// Actions outside the output layer score 0.
    fn value(&self, state: &G::State, action: G::Action) -> f64 {
        let Some(index) = self.output_index(action) else {
            return 0.0;
        };
        let hidden = self.hidden_activations(&Self::features(state));
        self.w_out.row(index).dot(&hidden) + self.b_out[index]
    }

    /// One gradient step on `½(q − target)²` for the chosen action's output.
    fn update(&mut self, state: &G::State, action: G::Action, target: f64, learning_rate: f64) {
        let Some(index) = self.output_index(action) else {
            return;
        };
        let features = Self::features(state);
        let hidden = self.hidden_activations(&features);
        let q = self.w_out.row(index).dot(&hidden) + self.b_out[index];
        let error = q - target;

        // Back-propagate through the old output weights before moving them.
        let hidden_delta = self.w_out.row(index).to_owned() * error
            * hidden.mapv(|h| h * (1.0 - h));

        self.w_out
            .row_mut(index)
            .scaled_add(-learning_rate * error, &hidden);
        self.b_out[index] -= learning_rate * error;

        for (mut row, &delta) in self.w_hidden.rows_mut().into_iter().zip(hidden_delta.iter()) {
            row.scaled_add(-learning_rate * delta, &features);
        }
        self.b_hidden.scaled_add(-learning_rate, &hidden_delta);
    }

    fn name(&self) -> &str {
        "q-network"
    }

    fn action_values(&self, state: &G::State, actions: &[G::Action]) -> Vec<f64> {
        let outputs = self.forward(state);
        actions
            .iter()
            .map(|&action| outputs.get(G::action_index(action)).copied().unwrap_or(0.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{chopsticks::Chopsticks, noughts::NoughtsAndCrosses};

    fn network() -> QNetwork<NoughtsAndCrosses> {
        QNetwork::new(&NetworkConfig::default(), 7).unwrap()
    }

    #[test]
    fn test_shapes_follow_the_game() {
        let net = QNetwork::<Chopsticks>::new(
            &NetworkConfig {
                hidden: 16,
                init_scale: 0.5,
            },
            1,
        )
        .unwrap();
        let game = Chopsticks;
        assert_eq!(net.hidden_units(), 16);
        assert_eq!(net.forward(&game.initial_state()).len(), Chopsticks::ACTION_COUNT);
    }

    #[test]
    fn test_same_seed_same_weights() {
        let game = NoughtsAndCrosses;
        let state = game.initial_state();
        let a = network();
        let b = network();
        assert_eq!(a.forward(&state), b.forward(&state));
    }

    #[test]
    fn test_value_matches_forward() {
        let game = NoughtsAndCrosses;
        let state = game.initial_state();
        let net = network();
        let outputs = net.forward(&state);
        for action in 0..9 {
            assert!((net.value(&state, action) - outputs[action]).abs() < 1e-12);
        }
        assert_eq!(net.action_values(&state, &[2, 5]), vec![outputs[2], outputs[5]]);
    }

    #[test]
    fn test_update_reduces_error() {
        let game = NoughtsAndCrosses;
        let state = game.initial_state();
        let mut net = network();

        let before = (net.value(&state, 4) - 1.0).abs();
        for _ in 0..100 {
            net.update(&state, 4, 1.0, 0.01);
        }
        let after = (net.value(&state, 4) - 1.0).abs();
        assert!(after < before * 0.5, "error went from {before} to {after}");
    }

    #[test]
    fn test_action_outside_output_layer_scores_zero() {
        let game = NoughtsAndCrosses;
        let state = game.initial_state();
        let mut net = network();
        let before = net.forward(&state);

        assert_eq!(net.value(&state, 42), 0.0);
        assert_eq!(net.action_values(&state, &[42, 3]), vec![0.0, before[3]]);
        net.update(&state, 42, 1.0, 0.5);
        assert_eq!(net.forward(&state), before);
    }

    #[test]
    fn test_check_shape() {
        assert!(network().check_shape().is_ok());

        let mut wrong = network();
        wrong.b_out = Array1::zeros(3);
        assert!(matches!(
            wrong.check_shape(),
            Err(Error::SerializationContext { .. })
        ));

        let chopsticks = QNetwork::<Chopsticks> {
            w_hidden: network().w_hidden,
            b_hidden: network().b_hidden,
            w_out: network().w_out,
            b_out: network().b_out,
            game: PhantomData,
        };
        assert!(chopsticks.check_shape().is_err());
    }

    #[test]
    fn test_rejects_bad_config() {
        let zero_hidden = NetworkConfig {
            hidden: 0,
            ..NetworkConfig::default()
        };
        assert!(matches!(
            QNetwork::<NoughtsAndCrosses>::new(&zero_hidden, 0),
            Err(Error::InvalidConfig { .. })
        ));

        let flat = NetworkConfig {
            init_scale: 0.0,
            ..NetworkConfig::default()
        };
        assert!(QNetwork::<NoughtsAndCrosses>::new(&flat, 0).is_err());
    }
}
