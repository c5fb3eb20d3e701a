//! Chopsticks engine
//!
//! Each player starts with one finger on each hand. On their turn a player
//! either taps an opponent's live hand with one of their own live hands, adding
//! the tapping hand's fingers to it, or splits fingers between their own two
//! hands. Counts wrap modulo 5 and a hand at 0 is dead. A player whose hands
//! are both dead loses. There is no draw by rule; training and evaluation cap
//! the number of steps instead.

pub mod hands;

pub use hands::{FINGER_LIMIT, Hand, Hands, SplitAmount, Stroke};

use crate::{
    Error, Result,
    game::{Game, GameOutcome, Player},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Chopsticks;

impl Game for Chopsticks {
    type State = Hands;
    type Action = Stroke;

    const NAME: &'static str = "chopsticks";
    const ACTION_COUNT: usize = 12;
    // 4 hands one-hot over 0..5 fingers, then the player to move.
    const FEATURE_LEN: usize = 4 * FINGER_LIMIT as usize + 2;

    fn initial_state(&self) -> Hands {
        Hands::new()
    }

    fn legal_actions(&self, state: &Hands) -> Result<Vec<Stroke>> {
        if state.is_terminal() {
            return Err(Error::InvalidState {
                operation: "legal_actions".to_string(),
                state: state.encode(),
            });
        }
        Ok(Stroke::all()
            .into_iter()
            .filter(|&stroke| state.play(stroke).is_ok())
            .collect())
    }

    fn apply(&self, state: &Hands, action: Stroke) -> Result<Hands> {
        if state.is_terminal() {
            return Err(Error::InvalidState {
                operation: "apply".to_string(),
                state: state.encode(),
            });
        }
        state.play(action)
    }

    fn is_terminal(&self, state: &Hands) -> bool {
        state.is_terminal()
    }

    fn outcome(&self, state: &Hands) -> Result<GameOutcome> {
        state
            .winner()
            .map(GameOutcome::Win)
            .ok_or_else(|| Error::InvalidState {
                operation: "outcome".to_string(),
                state: state.encode(),
            })
    }

    fn to_move(&self, state: &Hands) -> Player {
        state.to_move
    }

    fn action_index(action: Stroke) -> usize {
        action.index()
    }

    fn encode(state: &Hands) -> Vec<f64> {
        let limit = FINGER_LIMIT as usize;
        let mut features = vec![0.0; Self::FEATURE_LEN];
        for (seat, hands) in state.fingers.iter().enumerate() {
            for (hand, &count) in hands.iter().enumerate() {
                features[(seat * 2 + hand) * limit + count as usize] = 1.0;
            }
        }
        features[4 * limit + state.to_move.index()] = 1.0;
        features
    }

    /// Accepts `tap L R` and `split R 2` (or `t`/`s` for short).
    fn parse_action(&self, input: &str) -> Result<Stroke> {
        let invalid = || Error::InvalidInput {
            input: input.trim().to_string(),
            expected: self.notation_help().to_string(),
        };
        let hand = |token: &str| {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Hand::from_char(c),
                _ => None,
            }
        };

        let tokens: Vec<String> = input
            .split_whitespace()
            .map(|t| t.to_ascii_lowercase())
            .collect();
        let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();

        match tokens.as_slice() {
            ["tap" | "t", from, to] => {
                let from = hand(*from).ok_or_else(invalid)?;
                let to = hand(*to).ok_or_else(invalid)?;
                Ok(Stroke::Tap { from, to })
            }
            ["split" | "s", from, amount] => {
                let from = hand(*from).ok_or_else(invalid)?;
                let amount: u8 = amount.parse().map_err(|_| invalid())?;
                Stroke::split(from, amount).ok_or_else(invalid)
            }
            _ => Err(invalid()),
        }
    }

    fn notation_help(&self) -> &'static str {
        "'tap <L|R> <L|R>' (your hand, their hand) or 'split <L|R> <1-4>'"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_legal_actions() {
        let game = Chopsticks;
        let state = game.initial_state();
        let actions = game.legal_actions(&state).unwrap();
        // Four taps plus one split from either hand.
        assert_eq!(actions.len(), 6);
        let indices: Vec<usize> = actions.iter().map(|&a| Chopsticks::action_index(a)).collect();
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        assert_eq!(indices, sorted);
    }

    #[test]
    fn test_literal_tap_from_initial_state() {
        let game = Chopsticks;
        let next = game
            .apply(
                &game.initial_state(),
                Stroke::Tap {
                    from: Hand::Left,
                    to: Hand::Left,
                },
            )
            .unwrap();
        assert_eq!(next, Hands::from_counts([1, 1], [2, 1], Player::Two).unwrap());
    }

    #[test]
    fn test_self_split_of_fours_kills_a_hand() {
        let game = Chopsticks;
        let state = Hands::from_counts([4, 4], [1, 1], Player::One).unwrap();
        let next = game
            .apply(&state, Stroke::split(Hand::Left, 1).unwrap())
            .unwrap();
        assert_eq!(next, Hands::from_counts([3, 0], [1, 1], Player::Two).unwrap());
        assert!(!game.is_terminal(&next));
    }

    #[test]
    fn test_winning_tap_ends_game() {
        let game = Chopsticks;
        let state = Hands::from_counts([1, 4], [1, 0], Player::One).unwrap();
        let next = game
            .apply(
                &state,
                Stroke::Tap {
                    from: Hand::Right,
                    to: Hand::Left,
                },
            )
            .unwrap();
        assert!(game.is_terminal(&next));
        assert_eq!(game.outcome(&next).unwrap(), GameOutcome::Win(Player::One));
        assert!(matches!(
            game.legal_actions(&next),
            Err(Error::InvalidState { .. })
        ));
    }

    #[test]
    fn test_illegal_action_is_rejected() {
        let game = Chopsticks;
        let result = game.apply(&game.initial_state(), Stroke::split(Hand::Right, 3).unwrap());
        assert!(matches!(result, Err(Error::IllegalAction { .. })));
    }

    #[test]
    fn test_parse_action() {
        let game = Chopsticks;
        assert_eq!(
            game.parse_action("tap L r").unwrap(),
            Stroke::Tap {
                from: Hand::Left,
                to: Hand::Right
            }
        );
        assert_eq!(
            game.parse_action("s R 2").unwrap(),
            Stroke::split(Hand::Right, 2).unwrap()
        );
        assert!(game.parse_action("split L 5").is_err());
        assert!(game.parse_action("tap left right").is_err());
        assert!(game.parse_action("poke L R").is_err());
    }

    #[test]
    fn test_encode_length_and_turn() {
        let features = Chopsticks::encode(&Hands::new());
        assert_eq!(features.len(), Chopsticks::FEATURE_LEN);
        assert_eq!(features.iter().sum::<f64>(), 5.0);
        assert_eq!(features[1], 1.0);
        assert_eq!(features[20], 1.0);
    }
}
