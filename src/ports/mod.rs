//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the learning core and its
//! collaborators. Following hexagonal architecture, these traits are owned by
//! the core and implemented by adapters.

pub mod estimator;
pub mod observer;
pub mod repository;

pub use estimator::ValueEstimator;
pub use observer::Observer;
pub use repository::PolicyRepository;
