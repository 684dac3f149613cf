use rand::RngCore;
use tracing::debug;

use crate::game::{Board, Placement, PlayerId, RoundState, RuleEngine, AXES};

use super::strategy::Strategy;

pub const DEFAULT_DEPTH: usize = 4;

/// Initial alpha-beta window. Every evaluator score stays strictly inside it.
pub const SEARCH_WINDOW: i64 = 10_000;

/// Score of a finished line for the maximizer, before the depth bonus.
pub const WIN_SCORE: i64 = 9_000;

/// Cap on non-terminal line scores so they never reach a win.
const HEURISTIC_CAP: i64 = 8_000;

/// Scores positions for the Hard AI from the maximizer's point of view.
pub trait Evaluator: Send {
    /// Score a position right after `mover` played `at`. `Some` ends the
    /// search along this line.
    fn terminal(
        &self,
        _board: &Board,
        _rules: &RuleEngine,
        _at: Placement,
        _mover: PlayerId,
        _maximizer: PlayerId,
    ) -> Option<i64> {
        None
    }

    /// Score a leaf of the search.
    fn evaluate(&self, board: &Board, rules: &RuleEngine, maximizer: PlayerId, last_mover: PlayerId) -> i64;
}

/// +1 when the maximizer made the last move, -1 otherwise.
///
/// Never reports a terminal position, so every column ties and the search
/// keeps the leftmost legal one.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformEvaluator;

impl Evaluator for UniformEvaluator {
    fn evaluate(&self, _board: &Board, _rules: &RuleEngine, maximizer: PlayerId, last_mover: PlayerId) -> i64 {
        if last_mover == maximizer {
            1
        } else {
            -1
        }
    }
}

/// Treats wins as terminal and scores open windows of `win_length` cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineEvaluator;

impl LineEvaluator {
    fn score_window(own: usize, opp: usize, empty: usize, win_length: usize) -> i64 {
        if own == win_length - 1 && empty == 1 {
            50
        } else if own == win_length - 2 && empty == 2 {
            10
        } else if opp == win_length - 1 && empty == 1 {
            -80
        } else if opp == win_length - 2 && empty == 2 {
            -10
        } else {
            0
        }
    }

    /// Score one window. Windows shared by two or more opponents are dead for
    /// everyone and score nothing.
    fn window(board: &Board, cells: impl Iterator<Item = (usize, usize)>, maximizer: PlayerId, win_length: usize) -> i64 {
        let (mut own, mut empty) = (0, 0);
        let mut opponent: Option<PlayerId> = None;
        let mut opp = 0;
        for (r, c) in cells {
            match board.owner(r, c) {
                None => empty += 1,
                Some(p) if p == maximizer => own += 1,
                Some(p) => {
                    if opponent.is_some_and(|o| o != p) {
                        return 0;
                    }
                    opponent = Some(p);
                    opp += 1;
                }
            }
        }
        if own > 0 && opp > 0 {
            return 0;
        }
        Self::score_window(own, opp, empty, win_length)
    }
}

impl Evaluator for LineEvaluator {
    fn terminal(
        &self,
        board: &Board,
        rules: &RuleEngine,
        at: Placement,
        mover: PlayerId,
        maximizer: PlayerId,
    ) -> Option<i64> {
        if rules.check_win(board, at.row, at.column) {
            return Some(if mover == maximizer { WIN_SCORE } else { -WIN_SCORE });
        }
        board.is_full().then_some(0)
    }

    fn evaluate(&self, board: &Board, rules: &RuleEngine, maximizer: PlayerId, _last_mover: PlayerId) -> i64 {
        let win_length = rules.config().win_length as isize;
        let (height, width) = (board.height() as isize, board.width() as isize);
        let mut score = 0;

        // Center column bonus
        let center = board.width() / 2;
        for row in 0..board.height() {
            match board.owner(row, center) {
                Some(p) if p == maximizer => score += 3,
                Some(_) => score -= 3,
                None => {}
            }
        }

        for (dr, dc) in AXES {
            for row in 0..height {
                for col in 0..width {
                    let end_r = row + dr * (win_length - 1);
                    let end_c = col + dc * (win_length - 1);
                    if !board.contains(end_r, end_c) {
                        continue;
                    }
                    let cells = (0..win_length).map(|i| ((row + dr * i) as usize, (col + dc * i) as usize));
                    score += Self::window(board, cells, maximizer, win_length as usize);
                }
            }
        }

        score.clamp(-HEURISTIC_CAP, HEURISTIC_CAP)
    }
}

/// Hard AI: depth-limited minimax with alpha-beta pruning.
///
/// With more than two players the search is paranoid: the AI maximizes and
/// every other seat minimizes. Columns are tried left to right and a column
/// only replaces the current best on a strictly higher score.
pub struct MinimaxStrategy {
    depth: usize,
    evaluator: Box<dyn Evaluator>,
}

struct Search<'a> {
    rules: &'a RuleEngine,
    evaluator: &'a dyn Evaluator,
    maximizer: PlayerId,
    player_count: usize,
    nodes: usize,
}

impl Search<'_> {
    /// Score of `mover` dropping at `at`, searching `depth` more plies below it.
    fn score_move(&mut self, board: &mut Board, at: Placement, mover: PlayerId, depth: usize, alpha: i64, beta: i64) -> i64 {
        self.nodes += 1;
        match self
            .evaluator
            .terminal(board, self.rules, at, mover, self.maximizer)
        {
            // Sooner wins and later losses score better
            Some(score) => score + score.signum() * depth as i64,
            None => self.minimax(board, depth, alpha, beta, mover.next(self.player_count), mover),
        }
    }

    fn minimax(
        &mut self,
        board: &mut Board,
        depth: usize,
        mut alpha: i64,
        mut beta: i64,
        mover: PlayerId,
        last_mover: PlayerId,
    ) -> i64 {
        let columns = board.legal_columns();
        if depth == 0 || columns.is_empty() {
            return self
                .evaluator
                .evaluate(board, self.rules, self.maximizer, last_mover);
        }

        let maximizing = mover == self.maximizer;
        let mut best = if maximizing { i64::MIN } else { i64::MAX };

        for column in columns {
            let Ok(row) = board.drop_counter(column, mover) else {
                continue;
            };
            let score = self.score_move(board, Placement::new(row, column), mover, depth - 1, alpha, beta);
            board.remove(row, column);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if alpha >= beta {
                break;
            }
        }

        best
    }
}

impl MinimaxStrategy {
    pub fn new() -> Self {
        Self::with_evaluator(DEFAULT_DEPTH, Box::new(UniformEvaluator))
    }

    pub fn with_evaluator(depth: usize, evaluator: Box<dyn Evaluator>) -> Self {
        MinimaxStrategy {
            depth: depth.max(1),
            evaluator,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    fn best_move(&self, state: &RoundState, rules: &RuleEngine) -> Option<Placement> {
        let maximizer = state.current_player();
        let mut board = state.board().clone();
        let mut search = Search {
            rules,
            evaluator: self.evaluator.as_ref(),
            maximizer,
            player_count: state.player_count(),
            nodes: 0,
        };

        let mut alpha = -SEARCH_WINDOW;
        let beta = SEARCH_WINDOW;
        let mut best: Option<(i64, Placement)> = None;

        for column in board.legal_columns() {
            let Ok(row) = board.drop_counter(column, maximizer) else {
                continue;
            };
            let at = Placement::new(row, column);
            let score = search.score_move(&mut board, at, maximizer, self.depth - 1, alpha, beta);
            board.remove(row, column);

            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, at));
            }
            alpha = alpha.max(score);
        }

        if let Some((score, at)) = best {
            debug!(player = %maximizer, column = at.column, score, nodes = search.nodes, "hard AI move");
        }
        best.map(|(_, at)| at)
    }
}

impl Default for MinimaxStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for MinimaxStrategy {
    fn select_move(
        &mut self,
        state: &RoundState,
        rules: &RuleEngine,
        _rng: &mut dyn RngCore,
    ) -> Option<Placement> {
        self.best_move(state, rules)
    }

    fn name(&self) -> &str {
        "Minimax"
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::ai::RandomStrategy;
    use crate::game::RoundOutcome;

    fn lines(depth: usize) -> MinimaxStrategy {
        MinimaxStrategy::with_evaluator(depth, Box::new(LineEvaluator))
    }

    fn state(rows: &[&str], to_move: usize) -> RoundState {
        RoundState::from_board(Board::from_rows(rows), 2, PlayerId::new(to_move))
    }

    fn choose(strategy: &mut MinimaxStrategy, state: &RoundState) -> Placement {
        let mut rng = StdRng::seed_from_u64(0);
        strategy
            .select_move(state, &RuleEngine::default(), &mut rng)
            .unwrap()
    }

    // --- Evaluator tests ---

    #[test]
    fn test_line_evaluator_empty_board_is_zero() {
        let board = Board::new(7, 6);
        let rules = RuleEngine::default();
        let p1 = PlayerId::new(0);
        assert_eq!(LineEvaluator.evaluate(&board, &rules, p1, p1), 0);
    }

    #[test]
    fn test_line_evaluator_center_preference() {
        let rules = RuleEngine::default();
        let p1 = PlayerId::new(0);
        let mut center = Board::new(7, 6);
        center.drop_counter(3, p1).unwrap();
        let mut edge = Board::new(7, 6);
        edge.drop_counter(0, p1).unwrap();

        let score_center = LineEvaluator.evaluate(&center, &rules, p1, p1);
        let score_edge = LineEvaluator.evaluate(&edge, &rules, p1, p1);
        assert!(
            score_center > score_edge,
            "Center ({score_center}) should score higher than edge ({score_edge})"
        );
    }

    #[test]
    fn test_line_evaluator_three_in_a_row_scores_high() {
        let rules = RuleEngine::default();
        let p1 = PlayerId::new(0);
        let board = Board::from_rows(&[
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
            "1 1 1 . . . .",
        ]);
        let score = LineEvaluator.evaluate(&board, &rules, p1, p1);
        assert!(score > 40, "3-in-a-row should score high, got {score}");
        let score = LineEvaluator.evaluate(&board, &rules, PlayerId::new(1), p1);
        assert!(score < -40, "Opponent threat should score low, got {score}");
    }

    #[test]
    fn test_line_evaluator_terminal_win() {
        let rules = RuleEngine::default();
        let board = Board::from_rows(&[
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
            "2 2 2 2 . . .",
        ]);
        let at = Placement::new(5, 3);
        let p1 = PlayerId::new(0);
        let p2 = PlayerId::new(1);
        assert_eq!(LineEvaluator.terminal(&board, &rules, at, p2, p2), Some(WIN_SCORE));
        assert_eq!(LineEvaluator.terminal(&board, &rules, at, p2, p1), Some(-WIN_SCORE));
        assert_eq!(UniformEvaluator.terminal(&board, &rules, at, p2, p2), None);
    }

    // --- Search tests ---

    #[test]
    fn test_uniform_picks_leftmost_legal_column() {
        let mut hard = MinimaxStrategy::new();
        assert_eq!(choose(&mut hard, &RoundState::new(7, 6, 2)), Placement::new(5, 0));

        // Column 0 is full, so column 1 is the leftmost legal one
        let state = state(
            &[
                "1 . . . . . .",
                "2 . . . . . .",
                "1 . . . . . .",
                "2 . . . . . .",
                "1 . . . . . .",
                "2 1 . . . . .",
            ],
            1,
        );
        assert_eq!(choose(&mut hard, &state), Placement::new(4, 1));
    }

    #[test]
    fn test_takes_winning_move() {
        let state = state(
            &[
                ". . . . . . .",
                ". . . . . . .",
                ". . . . . . .",
                ". . . . . . .",
                "2 2 2 . . . .",
                "1 1 1 . . . .",
            ],
            0,
        );
        assert_eq!(choose(&mut lines(4), &state), Placement::new(5, 3));
    }

    #[test]
    fn test_blocks_opponent_win() {
        let state = state(
            &[
                ". . . . . . .",
                ". . . . . . .",
                ". . . . . . .",
                ". . . . . . .",
                ". . . . . . 1",
                "2 2 2 . . 1 1",
            ],
            0,
        );
        assert_eq!(choose(&mut lines(4), &state), Placement::new(5, 3));
    }

    #[test]
    fn test_prefers_win_over_block() {
        let state = state(
            &[
                ". . . . . . .",
                ". . . . . . .",
                ". . . . . . .",
                ". . . . . . .",
                "1 1 1 . . . .",
                "2 2 2 . 1 . .",
            ],
            1,
        );
        // Player 2 wins on the bottom row instead of blocking row 4
        assert_eq!(choose(&mut lines(4), &state), Placement::new(5, 3));
    }

    #[test]
    fn test_paranoid_search_blocks_third_player() {
        // Player 3 threatens column 3; player 1 moves first in a 3-player game
        let board = Board::from_rows(&[
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
            ". . . . . . .",
            "3 3 3 . . 2 1",
        ]);
        let state = RoundState::from_board(board, 3, PlayerId::new(0));
        assert_eq!(choose(&mut lines(3), &state), Placement::new(5, 3));
    }

    #[test]
    fn test_search_leaves_live_board_untouched() {
        let mut state = RoundState::new(7, 6, 2);
        let rules = RuleEngine::default();
        state.apply_drop(3, &rules).unwrap();
        let before = state.clone();
        choose(&mut lines(4), &state);
        assert_eq!(state, before);
    }

    // --- Integration tests ---

    #[test]
    fn test_full_round_vs_self_completes() {
        let rules = RuleEngine::default();
        let mut players = [lines(3), lines(3)];
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = RoundState::new(7, 6, 2);

        while !state.is_terminal() {
            let seat = state.current_player().index();
            let choice = players[seat].select_move(&state, &rules, &mut rng).unwrap();
            state.apply_drop(choice.column, &rules).unwrap();
        }
        assert!(state.outcome().is_some());
    }

    #[test]
    fn test_line_evaluator_beats_random() {
        let rules = RuleEngine::default();
        let games = 10;
        let mut wins = 0;

        for game in 0..games {
            let mut rng = StdRng::seed_from_u64(game);
            let mut hard = lines(3);
            let mut random = RandomStrategy;
            let hard_seat = (game % 2) as usize;
            let mut state = RoundState::new(7, 6, 2);

            while !state.is_terminal() {
                let choice = if state.current_player().index() == hard_seat {
                    hard.select_move(&state, &rules, &mut rng)
                } else {
                    random.select_move(&state, &rules, &mut rng)
                };
                state.apply_drop(choice.unwrap().column, &rules).unwrap();
            }
            if state.outcome() == Some(RoundOutcome::Winner(PlayerId::new(hard_seat))) {
                wins += 1;
            }
        }

        assert!(wins >= 8, "Line-evaluated minimax won only {wins}/{games} against random");
    }

    #[test]
    fn test_depth_is_at_least_one() {
        let hard = MinimaxStrategy::with_evaluator(0, Box::new(UniformEvaluator));
        assert_eq!(hard.depth(), 1);
        assert_eq!(MinimaxStrategy::new().depth(), DEFAULT_DEPTH);
        assert_eq!(hard.name(), "Minimax");
    }
}
