//! Q-learning value stores
//!
//! Two backends implement [`crate::ports::ValueEstimator`]:
//!
//! - [`QTable`]: one stored value per visited (state, action) pair
//! - [`QNetwork`]: a one-hidden-layer network scoring every action of a state
//!
//! [`PolicyStore`] selects one of them at configuration time, and
//! [`SavedPolicy`] wraps a store in a versioned artifact.

pub mod policy_store;
pub mod q_network;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use policy_store::{PolicyConfig, PolicyKind, PolicyStore};
pub use q_network::{NetworkConfig, QNetwork};
pub use q_table::QTable;
pub use serialization::{SavedPolicy, TrainingMetadata};
