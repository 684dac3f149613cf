//! Core game logic: board representation, players, alliances, rule
//! evaluation and the per-round state machine.

mod alliance;
mod board;
mod player;
mod rules;
mod state;

pub use alliance::{Alliance, AllianceDraftSession, AllianceRegistry};
pub use board::{Board, Cell, Placement, MAX_DIMENSION, MIN_DIMENSION};
pub use player::{PlayerId, PlayerType, MAX_PLAYERS};
pub use rules::{
    CornerBonus, RuleConfig, RuleEngine, AXES, MAX_WIN_LENGTH, MIN_WIN_LENGTH, OVERFLOW_MIN_HEIGHT,
};
pub use state::{MoveKind, MoveOutcome, RoundOutcome, RoundState};
