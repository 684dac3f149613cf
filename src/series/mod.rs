//! Best-of-N series on top of the round engine.

mod controller;
mod results;

pub use controller::{MatchController, MatchPhase, RoundEnd, TurnReport};
pub use results::{champion, standings, RoundResult, SeriesSummary, Standing};
