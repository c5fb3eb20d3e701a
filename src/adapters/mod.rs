//! Adapters implementing port interfaces
//!
//! This module contains concrete implementations of the ports defined in the
//! ports module. Adapters connect the learning core to specific storage
//! technologies.

pub mod in_memory_repository;
pub mod msgpack_repository;

pub use in_memory_repository::InMemoryRepository;
pub use msgpack_repository::MsgPackRepository;
