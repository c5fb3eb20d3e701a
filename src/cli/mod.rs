//! CLI infrastructure for rl-games
//!
//! This module provides the command-line interface for training agents,
//! evaluating them against a random opponent, and playing against them.

pub mod commands;
pub mod output;
