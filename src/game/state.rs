use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::MoveError;

use super::board::{Board, Placement};
use super::player::PlayerId;
use super::rules::{CornerBonus, RuleEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Winner(PlayerId),
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    Drop,
    Bomb,
}

/// Everything that happened while applying one move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub player: PlayerId,
    pub kind: MoveKind,
    pub column: usize,
    /// Where the counter landed. `None` when a full column overflowed into
    /// its neighbours instead.
    pub landed: Option<Placement>,
    pub corner_bonus: Option<CornerBonus>,
    pub solitaire_removed: Vec<Placement>,
    pub overflow_spill: Vec<Placement>,
    pub bomb_cleared: Vec<Placement>,
    pub winner: Option<PlayerId>,
    pub is_draw: bool,
}

impl MoveOutcome {
    fn new(player: PlayerId, kind: MoveKind, column: usize) -> Self {
        MoveOutcome {
            player,
            kind,
            column,
            landed: None,
            corner_bonus: None,
            solitaire_removed: Vec::new(),
            overflow_spill: Vec::new(),
            bomb_cleared: Vec::new(),
            winner: None,
            is_draw: false,
        }
    }

    pub fn applied_row(&self) -> Option<usize> {
        self.landed.map(|p| p.row)
    }

    /// Columns that received a spilled counter.
    pub fn overflow_spill_columns(&self) -> Vec<usize> {
        self.overflow_spill.iter().map(|p| p.column).collect()
    }

    pub fn ends_round(&self) -> bool {
        self.winner.is_some() || self.is_draw
    }
}

/// One live round: the board, whose turn it is and the bomb flags.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    board: Board,
    player_count: usize,
    current_player: PlayerId,
    bombs_used: Vec<bool>,
    outcome: Option<RoundOutcome>,
    moves_played: usize,
}

impl RoundState {
    /// Create initial round state; player 1 moves first.
    pub fn new(width: usize, height: usize, player_count: usize) -> Self {
        RoundState {
            board: Board::new(width, height),
            player_count,
            current_player: PlayerId::new(0),
            bombs_used: vec![false; player_count],
            outcome: None,
            moves_played: 0,
        }
    }

    /// Mid-round state for tests, with `current` to move.
    #[cfg(test)]
    pub(crate) fn from_board(board: Board, player_count: usize, current: PlayerId) -> Self {
        RoundState {
            board,
            player_count,
            current_player: current,
            bombs_used: vec![false; player_count],
            outcome: None,
            moves_played: 0,
        }
    }

    /// Get current player
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get round outcome if the round is over
    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn moves_played(&self) -> usize {
        self.moves_played
    }

    pub fn bomb_used(&self, player: PlayerId) -> bool {
        self.bombs_used.get(player.index()).copied().unwrap_or(false)
    }

    /// Get list of legal columns (not full)
    pub fn legal_columns(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.legal_columns()
    }

    /// Drop a counter for the current player and run the post-move rules:
    /// corner bonus, solitaire, overflow, then win and draw.
    ///
    /// Either the whole move happens or, on error, nothing changes.
    #[instrument(level = "debug", skip(self, rules), fields(player = %self.current_player))]
    pub fn apply_drop(&mut self, column: usize, rules: &RuleEngine) -> Result<MoveOutcome, MoveError> {
        self.ensure_playable(column)?;
        let player = self.current_player;
        let mut outcome = MoveOutcome::new(player, MoveKind::Drop, column);

        if self.board.is_column_full(column) {
            if !rules.overflow_applies(&self.board) {
                return Err(MoveError::ColumnFull { column });
            }
            // A full column redirects into its neighbours
            let spilled = rules.check_overflow(&mut self.board, column, player);
            if spilled.is_empty() {
                return Err(MoveError::ColumnFull { column });
            }
            outcome.overflow_spill = spilled;
            outcome.solitaire_removed = rules.check_solitaire(&mut self.board);
        } else {
            let row = self.board.drop_counter(column, player)?;
            outcome.landed = Some(Placement::new(row, column));
            outcome.corner_bonus = rules.check_corner_bonus(&self.board, row, column);
            outcome.solitaire_removed = rules.check_solitaire(&mut self.board);
            outcome.overflow_spill = rules.check_overflow(&mut self.board, column, player);
        }

        let won = self
            .win_candidates(&outcome, player)
            .into_iter()
            .any(|p| rules.check_win(&self.board, p.row, p.column));

        if won {
            outcome.winner = Some(player);
        } else {
            outcome.is_draw = rules.is_draw(&self.board, false);
        }
        self.finish_move(&outcome);
        Ok(outcome)
    }

    /// Drop the current player's one bomb counter per round and clear the
    /// 3x3 block around where it lands.
    #[instrument(level = "debug", skip(self, rules), fields(player = %self.current_player))]
    pub fn apply_bomb(&mut self, column: usize, rules: &RuleEngine) -> Result<MoveOutcome, MoveError> {
        if !rules.config().bomb_counter {
            return Err(MoveError::BombDisabled);
        }
        self.ensure_playable(column)?;
        let player = self.current_player;
        if self.bomb_used(player) {
            return Err(MoveError::BombAlreadyUsed { player });
        }

        let row = self.board.drop_counter(column, player)?;
        let mut outcome = MoveOutcome::new(player, MoveKind::Bomb, column);
        outcome.landed = Some(Placement::new(row, column));
        outcome.bomb_cleared = rules.use_bomb_counter(&mut self.board, row, column);
        self.bombs_used[player.index()] = true;

        self.finish_move(&outcome);
        Ok(outcome)
    }

    /// Cells of `player` that a drop may have brought into a line: the placed
    /// counters, plus every counter of theirs in a column solitaire collapsed.
    fn win_candidates(&self, outcome: &MoveOutcome, player: PlayerId) -> Vec<Placement> {
        let collapsed: BTreeSet<usize> = outcome.solitaire_removed.iter().map(|p| p.column).collect();
        let mut cells: Vec<Placement> = outcome
            .landed
            .iter()
            .chain(outcome.overflow_spill.iter())
            .filter(|p| !collapsed.contains(&p.column))
            .copied()
            .collect();
        for &column in &collapsed {
            cells.extend(
                (0..self.board.height())
                    .filter(|&row| self.board.owner(row, column) == Some(player))
                    .map(|row| Placement::new(row, column)),
            );
        }
        cells
    }

    fn ensure_playable(&self, column: usize) -> Result<(), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::RoundOver);
        }
        if column >= self.board.width() {
            return Err(MoveError::InvalidColumn {
                column,
                width: self.board.width(),
            });
        }
        Ok(())
    }

    fn finish_move(&mut self, outcome: &MoveOutcome) {
        self.moves_played += 1;
        if let Some(winner) = outcome.winner {
            debug!(%winner, moves = self.moves_played, "round won");
            self.outcome = Some(RoundOutcome::Winner(winner));
        } else if outcome.is_draw {
            debug!(moves = self.moves_played, "round drawn");
            self.outcome = Some(RoundOutcome::Draw);
        } else {
            self.current_player = self.current_player.next(self.player_count);
        }
    }
}
