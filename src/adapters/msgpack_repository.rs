//! MessagePack implementation of the policy repository.
//!
//! This adapter implements the PolicyRepository port using rmp_serde for
//! compact binary serialization.

use std::{fs, path::Path};

use crate::{
    Result, error::Error, game::Game, ports::PolicyRepository, q_learning::SavedPolicy,
};

/// MessagePack-based policy repository.
///
/// Provides persistent storage using the MessagePack binary format via rmp_serde.
///
/// # Examples
///
/// ```no_run
/// use rl_games::adapters::MsgPackRepository;
/// use rl_games::noughts::NoughtsAndCrosses;
/// use rl_games::ports::PolicyRepository;
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
///
/// let saved = repo.load::<NoughtsAndCrosses>(Path::new("noughts.policy"))?;
/// println!("trained for {} episodes", saved.metadata.episodes_trained);
/// # Ok::<(), rl_games::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl PolicyRepository for MsgPackRepository {
    fn save<G: Game>(&self, policy: &SavedPolicy<G>, path: &Path) -> Result<()> {
        let bytes = policy.to_bytes()?;
        fs::write(path, bytes).map_err(|source| Error::Io {
            operation: format!("write policy to {path:?}"),
            source,
        })
    }

    fn load<G: Game>(&self, path: &Path) -> Result<SavedPolicy<G>> {
        let bytes = fs::read(path).map_err(|source| Error::Io {
            operation: format!("read policy from {path:?}"),
            source,
        })?;
        SavedPolicy::from_bytes(&bytes)
    }
}
