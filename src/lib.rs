//! # Connectron
//!
//! A multi-player connect-N engine: configurable board size, win length and
//! player count, alliances, AI opponents, and optional special rules (corner
//! bonus, solitaire destruction, bomb counter, overflow spill), played as a
//! best-of-N series.
//!
//! ## Modules
//!
//! - [`game`]: Board, players, alliances, rule evaluation, round state
//! - [`ai`]: Strategy trait with random, heuristic and minimax players
//! - [`series`]: Match controller, round history, standings
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod series;
