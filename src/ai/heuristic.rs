use rand::RngCore;
use tracing::debug;

use crate::game::{Board, Placement, PlayerId, RoundState, RuleEngine};

use super::random::RandomStrategy;
use super::strategy::Strategy;

/// Medium AI: take a winning column, otherwise block one, otherwise random.
///
/// Columns are scanned left to right. For each column the AI first tries its
/// own counter, then each opponent's in turn order after the AI. Allies are
/// never blocked.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicStrategy;

/// Where `player` would land in `column` if that drop wins, probed on a copy.
fn wins_with(board: &Board, rules: &RuleEngine, column: usize, player: PlayerId) -> Option<Placement> {
    let mut scratch = board.clone();
    let row = scratch.drop_counter(column, player).ok()?;
    rules
        .check_win(&scratch, row, column)
        .then(|| Placement::new(row, column))
}

impl HeuristicStrategy {
    fn opponents(state: &RoundState, rules: &RuleEngine) -> Vec<PlayerId> {
        let me = state.current_player();
        let mut order = Vec::with_capacity(state.player_count());
        let mut next = me.next(state.player_count());
        while next != me {
            let allied = rules.config().alliances && rules.alliances().allied(me, next);
            if !allied {
                order.push(next);
            }
            next = next.next(state.player_count());
        }
        order
    }
}

impl Strategy for HeuristicStrategy {
    fn select_move(
        &mut self,
        state: &RoundState,
        rules: &RuleEngine,
        rng: &mut dyn RngCore,
    ) -> Option<Placement> {
        let board = state.board();
        let me = state.current_player();
        let opponents = Self::opponents(state, rules);

        for column in board.legal_columns() {
            if let Some(win) = wins_with(board, rules, column, me) {
                debug!(player = %me, column, "medium AI takes the win");
                return Some(win);
            }
            for &opponent in &opponents {
                if let Some(block) = wins_with(board, rules, column, opponent) {
                    debug!(player = %me, %opponent, column, "medium AI blocks");
                    return Some(block);
                }
            }
        }

        RandomStrategy::pick(state, rng)
    }

    fn name(&self) -> &str {
        "Heuristic"
    }
}
