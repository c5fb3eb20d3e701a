//! Hand configuration and stroke rules for chopsticks

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::Player;

/// Fingers wrap modulo this value; a hand reaching it dies.
pub const FINGER_LIMIT: u8 = 5;

/// One of a player's two hands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];

    pub fn index(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }

    pub fn other(self) -> Hand {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Hand::Left => 'L',
            Hand::Right => 'R',
        }
    }

    pub fn from_char(c: char) -> Option<Hand> {
        match c {
            'L' | 'l' => Some(Hand::Left),
            'R' | 'r' => Some(Hand::Right),
            _ => None,
        }
    }
}

/// Fingers moved by a split, always in `1..FINGER_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SplitAmount(u8);

impl SplitAmount {
    pub const fn new(amount: u8) -> Option<Self> {
        if amount >= 1 && amount < FINGER_LIMIT {
            Some(SplitAmount(amount))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SplitAmount {
    type Error = String;

    fn try_from(amount: u8) -> Result<Self, Self::Error> {
        SplitAmount::new(amount)
            .ok_or_else(|| format!("split amount must be in 1..{FINGER_LIMIT}, got {amount}"))
    }
}

impl From<SplitAmount> for u8 {
    fn from(amount: SplitAmount) -> u8 {
        amount.0
    }
}

impl fmt::Display for SplitAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chopsticks move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stroke {
    /// Strike the opponent's `to` hand with the mover's `from` hand.
    Tap { from: Hand, to: Hand },
    /// Move `amount` fingers from the mover's `from` hand to their other hand.
    Split { from: Hand, amount: SplitAmount },
}

impl Stroke {
    /// Every stroke in ascending index order.
    pub fn all() -> Vec<Stroke> {
        let taps = Hand::BOTH
            .into_iter()
            .flat_map(|from| Hand::BOTH.into_iter().map(move |to| Stroke::Tap { from, to }));
        let splits = Hand::BOTH.into_iter().flat_map(|from| {
            (1..FINGER_LIMIT)
                .filter_map(SplitAmount::new)
                .map(move |amount| Stroke::Split { from, amount })
        });
        taps.chain(splits).collect()
    }

    /// A split of `amount` fingers, or `None` if `amount` is not in
    /// `1..FINGER_LIMIT`.
    pub fn split(from: Hand, amount: u8) -> Option<Stroke> {
        SplitAmount::new(amount).map(|amount| Stroke::Split { from, amount })
    }

    /// Taps occupy `0..4`, splits `4..12`.
    pub fn index(self) -> usize {
        match self {
            Stroke::Tap { from, to } => from.index() * 2 + to.index(),
            Stroke::Split { from, amount } => {
                4 + from.index() * 4 + usize::from(amount.get() - 1)
            }
        }
    }
}

impl fmt::Display for Stroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stroke::Tap { from, to } => write!(f, "tap {} {}", from.to_char(), to.to_char()),
            Stroke::Split { from, amount } => write!(f, "split {} {amount}", from.to_char()),
        }
    }
}

/// Finger counts for both players plus whose turn it is.
///
/// `fingers[seat][hand]` is in `0..FINGER_LIMIT`; 0 is a dead hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hands {
    pub fingers: [[u8; 2]; 2],
    pub to_move: Player,
}

impl Hands {
    /// One finger on every hand, player one to move
    pub fn new() -> Self {
        Hands {
            fingers: [[1, 1], [1, 1]],
            to_move: Player::One,
        }
    }

    /// Build a position from literal counts.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] if a count is not below
    /// [`FINGER_LIMIT`].
    pub fn from_counts(first: [u8; 2], second: [u8; 2], to_move: Player) -> crate::Result<Self> {
        if first.iter().chain(second.iter()).any(|&n| n >= FINGER_LIMIT) {
            return Err(crate::Error::InvalidInput {
                input: format!("{first:?} {second:?}"),
                expected: format!("finger counts below {FINGER_LIMIT}"),
            });
        }
        Ok(Hands {
            fingers: [first, second],
            to_move,
        })
    }

    pub fn of(&self, player: Player) -> [u8; 2] {
        self.fingers[player.index()]
    }

    /// Both of `player`'s hands are dead
    pub fn is_out(&self, player: Player) -> bool {
        self.of(player) == [0, 0]
    }

    pub fn winner(&self) -> Option<Player> {
        [Player::One, Player::Two]
            .into_iter()
            .find(|&player| self.is_out(player.opponent()))
    }

    pub fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// Apply a stroke for the player to move.
    ///
    /// Does not check for terminal positions.
    #[must_use = "play returns a new position; the original is unchanged"]
    pub fn play(&self, stroke: Stroke) -> crate::Result<Hands> {
        let me = self.to_move.index();
        let them = self.to_move.opponent().index();
        let mut next = *self;

        match stroke {
            Stroke::Tap { from, to } => {
                let source = self.fingers[me][from.index()];
                let target = self.fingers[them][to.index()];
                if source == 0 || target == 0 {
                    return Err(self.illegal(stroke));
                }
                next.fingers[them][to.index()] = (target + source) % FINGER_LIMIT;
            }
            Stroke::Split { from, amount } => {
                let amount = amount.get();
                let current = self.fingers[me];
                let source = current[from.index()];
                if amount > source {
                    return Err(self.illegal(stroke));
                }
                let mut split = current;
                split[from.index()] = source - amount;
                split[from.other().index()] =
                    (current[from.other().index()] + amount) % FINGER_LIMIT;

                let mirrored = [current[1], current[0]];
                if split == [0, 0] || split == current || split == mirrored {
                    return Err(self.illegal(stroke));
                }
                next.fingers[me] = split;
            }
        }

        next.to_move = self.to_move.opponent();
        Ok(next)
    }

    /// Compact encoding, e.g. `11-21/2` (second player to move)
    pub fn encode(&self) -> String {
        let [a, b] = self.fingers;
        let turn = self.to_move.index() + 1;
        format!("{}{}-{}{}/{turn}", a[0], a[1], b[0], b[1])
    }

    fn illegal(&self, stroke: Stroke) -> crate::Error {
        crate::Error::IllegalAction {
            action: stroke.to_string(),
            state: self.encode(),
        }
    }
}

impl Default for Hands {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Hands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, player) in [Player::One, Player::Two].into_iter().enumerate() {
            let marker = if player == self.to_move { '>' } else { ' ' };
            let [left, right] = self.of(player);
            write!(f, "{marker} {player}: L{left} R{right}")?;
            if i == 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
