use rand::{Rng, RngCore};

use crate::game::{Placement, RoundState, RuleEngine};

use super::strategy::Strategy;

/// Easy AI: keeps picking uniform random columns until one has room.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStrategy;

impl RandomStrategy {
    /// Sample columns until a non-full one turns up and return where the
    /// counter would land there.
    pub fn pick(state: &RoundState, rng: &mut dyn RngCore) -> Option<Placement> {
        let board = state.board();
        if board.legal_columns().is_empty() {
            return None;
        }
        loop {
            let column = rng.random_range(0..board.width());
            if board.is_column_full(column) {
                continue;
            }
            let mut scratch = board.clone();
            if let Ok(row) = scratch.drop_counter(column, state.current_player()) {
                return Some(Placement::new(row, column));
            }
        }
    }
}

impl Strategy for RandomStrategy {
    fn select_move(
        &mut self,
        state: &RoundState,
        _rules: &RuleEngine,
        rng: &mut dyn RngCore,
    ) -> Option<Placement> {
        Self::pick(state, rng)
    }

    fn name(&self) -> &str {
        "Random"
    }
}
