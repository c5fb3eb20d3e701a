//! Versioned trained-policy artifacts.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    game::Game,
    pipeline::TrainingMode,
    q_learning::{PolicyKind, PolicyStore},
};

/// Provenance stored next to the trained values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Number of episodes trained
    pub episodes_trained: usize,
    pub mode: Option<TrainingMode>,
    pub policy: PolicyKind,
    /// Random seed used (if any)
    pub seed: Option<u64>,
    /// Seconds since the Unix epoch when saved
    pub saved_at: Option<u64>,
}

impl TrainingMetadata {
    pub fn new(episodes_trained: usize, mode: TrainingMode, seed: Option<u64>) -> Self {
        Self {
            episodes_trained,
            mode: Some(mode),
            seed,
            ..Self::default()
        }
    }
}

/// A trained policy store together with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SavedPolicy<G: Game> {
    pub version: u32,
    /// [`Game::NAME`] of the game the store was trained on
    pub game: String,
    pub store: PolicyStore<G>,
    pub metadata: TrainingMetadata,
}

/// The fields checked before the store itself is decoded.
#[derive(Deserialize)]
struct ArtifactHeader {
    version: u32,
    game: String,
}

impl<G: Game> SavedPolicy<G> {
    /// Current save format version
    pub const VERSION: u32 = 1;

    pub fn new(store: PolicyStore<G>, mut metadata: TrainingMetadata) -> Self {
        metadata.policy = store.kind();
        if metadata.saved_at.is_none() {
            metadata.saved_at = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .ok()
                .map(|elapsed| elapsed.as_secs());
        }
        Self {
            version: Self::VERSION,
            game: G::NAME.to_string(),
            store,
            metadata,
        }
    }

    /// Check the format version, the game name and the store's shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`], [`Error::ArtifactMismatch`], or
    /// [`Error::SerializationContext`] for a network whose layers do not fit
    /// the game.
    pub fn validate(&self) -> Result<()> {
        check_header::<G>(self.version, &self.game)?;
        self.store.check_shape()
    }

    pub fn into_store(self) -> PolicyStore<G> {
        self.store
    }

    /// Encode as MessagePack with named fields.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(self).map_err(|e| Error::SerializationContext {
            operation: "serialize policy to MessagePack".to_string(),
            message: e.to_string(),
        })
    }

    /// Decode an artifact written by [`SavedPolicy::to_bytes`].
    ///
    /// The version and game are checked before the store is decoded, so an
    /// artifact for another game reports [`Error::ArtifactMismatch`] rather
    /// than a decoding failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let decode_error = |e: rmp_serde::decode::Error| Error::SerializationContext {
            operation: "deserialize policy from MessagePack".to_string(),
            message: e.to_string(),
        };

        let header: ArtifactHeader = rmp_serde::from_slice(bytes).map_err(decode_error)?;
        check_header::<G>(header.version, &header.game)?;

        let saved: Self = rmp_serde::from_slice(bytes).map_err(decode_error)?;
        saved.store.check_shape()?;
        Ok(saved)
    }
}

fn check_header<G: Game>(version: u32, game: &str) -> Result<()> {
    if version != SavedPolicy::<G>::VERSION {
        return Err(Error::UnsupportedVersion {
            found: version,
            expected: SavedPolicy::<G>::VERSION,
        });
    }
    if game != G::NAME {
        return Err(Error::ArtifactMismatch {
            expected: G::NAME.to_string(),
            found: game.to_string(),
        });
    }
    Ok(())
}
