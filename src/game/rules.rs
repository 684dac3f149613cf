//! Rule evaluation on a [`Board`]: win detection and the optional special
//! rules (corner bonus, solitaire destruction, bomb counter, overflow spill).

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

use super::alliance::AllianceRegistry;
use super::board::{Board, Placement};
use super::player::PlayerId;

/// Smallest allowed win-line length.
pub const MIN_WIN_LENGTH: usize = 4;
/// Largest allowed win-line length.
pub const MAX_WIN_LENGTH: usize = 10;
/// Boards shorter than this never spill.
pub const OVERFLOW_MIN_HEIGHT: usize = 6;

/// Axes scanned by the win check, in evaluation order.
pub const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
const ORTHOGONAL: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Per-match rule switches. Never changes once a series starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub win_length: usize,
    pub corner_bonus: bool,
    pub solitaire: bool,
    pub bomb_counter: bool,
    pub overflow: bool,
    pub alliances: bool,
    pub ai_for_missing_players: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig {
            win_length: 4,
            corner_bonus: false,
            solitaire: false,
            bomb_counter: false,
            overflow: false,
            alliances: false,
            ai_for_missing_players: false,
        }
    }
}

/// Corner bonus event, for an external scorer. No score is kept here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornerBonus {
    pub player: PlayerId,
    pub points: usize,
    pub at: Placement,
}

/// Rule configuration bound to the match's alliances.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: RuleConfig,
    alliances: AllianceRegistry,
}

impl RuleEngine {
    pub fn new(config: RuleConfig, alliances: AllianceRegistry) -> Self {
        RuleEngine { config, alliances }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn alliances(&self) -> &AllianceRegistry {
        &self.alliances
    }

    /// Counters a corner cell is worth: 2, or 3 for lines of 7 or more.
    pub fn corner_bonus_points(&self) -> usize {
        if self.config.win_length >= 7 {
            3
        } else {
            2
        }
    }

    /// Whether `other` continues a line started by `player`.
    fn continues_line(&self, player: PlayerId, other: Option<PlayerId>) -> bool {
        match other {
            Some(o) if o == player => true,
            Some(o) => self.config.alliances && self.alliances.allied(player, o),
            None => false,
        }
    }

    /// Length of the line through `(row, col)` along one axis, corner bonus
    /// included.
    pub fn line_count(&self, board: &Board, row: usize, col: usize, axis: (isize, isize)) -> usize {
        let Some(player) = board.owner(row, col) else {
            return 0;
        };
        let extra = self.corner_bonus_points() - 1;
        let mut count = 1;

        for sign in [-1, 1] {
            let (mut r, mut c) = (row as isize, col as isize);
            loop {
                r += axis.0 * sign;
                c += axis.1 * sign;
                if !board.contains(r, c) {
                    break;
                }
                let (ru, cu) = (r as usize, c as usize);
                if !self.continues_line(player, board.owner(ru, cu)) {
                    break;
                }
                count += 1;
                if self.config.corner_bonus && board.is_corner(ru, cu) {
                    count += extra;
                }
            }
        }

        count
    }

    /// Check if the counter at `(row, col)` completes a line of `win_length`.
    #[instrument(level = "trace", skip(self, board))]
    pub fn check_win(&self, board: &Board, row: usize, col: usize) -> bool {
        if board.owner(row, col).is_none() {
            return false;
        }
        for axis in AXES {
            let count = self.line_count(board, row, col, axis);
            trace!(?axis, count, "win scan");
            if count >= self.config.win_length {
                debug!(row, col, count, win_length = self.config.win_length, "winning line");
                return true;
            }
        }
        false
    }

    /// Report a corner bonus for a counter that just landed on a corner.
    pub fn check_corner_bonus(&self, board: &Board, row: usize, col: usize) -> Option<CornerBonus> {
        if !self.config.corner_bonus || !board.is_corner(row, col) {
            return None;
        }
        let player = board.owner(row, col)?;
        let points = self.corner_bonus_points();
        info!(%player, points, row, col, "corner bonus");
        Some(CornerBonus {
            player,
            points,
            at: Placement::new(row, col),
        })
    }

    /// Remove isolated counters until none remain. Returns the removed cells
    /// in removal order (positions as they were at removal time).
    pub fn check_solitaire(&self, board: &mut Board) -> Vec<Placement> {
        let mut removed = Vec::new();
        if !self.config.solitaire {
            return removed;
        }

        // Restart the scan after every removal: the collapse changes the board
        while let Some(at) = Self::find_isolated(board) {
            info!(row = at.row, col = at.column, "solitaire counter destroyed");
            board.collapse(at.row, at.column);
            removed.push(at);
        }

        removed
    }

    fn find_isolated(board: &Board) -> Option<Placement> {
        for row in 0..board.height() {
            for col in 0..board.width() {
                if Self::is_isolated(board, row, col) {
                    return Some(Placement::new(row, col));
                }
            }
        }
        None
    }

    /// All four neighbours exist and belong to one single other player.
    fn is_isolated(board: &Board, row: usize, col: usize) -> bool {
        let Some(player) = board.owner(row, col) else {
            return false;
        };

        let mut surrounding = None;
        for (dr, dc) in ORTHOGONAL {
            let (r, c) = (row as isize + dr, col as isize + dc);
            if !board.contains(r, c) {
                return false;
            }
            match (board.owner(r as usize, c as usize), surrounding) {
                (None, _) => return false,
                (Some(n), Some(s)) if n != s => return false,
                (Some(n), _) => surrounding = Some(n),
            }
        }

        surrounding.is_some_and(|s| s != player)
    }

    /// Clear the 3x3 block around `(row, col)`. Returns every in-bounds cell
    /// of the block.
    pub fn use_bomb_counter(&self, board: &mut Board, row: usize, col: usize) -> Vec<Placement> {
        if !self.config.bomb_counter {
            return Vec::new();
        }

        let mut cleared = Vec::with_capacity(9);
        for dr in -1..=1 {
            for dc in -1..=1 {
                let (r, c) = (row as isize + dr, col as isize + dc);
                if board.contains(r, c) {
                    board.remove(r as usize, c as usize);
                    cleared.push(Placement::new(r as usize, c as usize));
                }
            }
        }
        info!(row, col, cleared = cleared.len(), "bomb counter");
        cleared
    }

    /// Whether the overflow rule is in force for this board.
    pub fn overflow_applies(&self, board: &Board) -> bool {
        self.config.overflow && board.height() >= OVERFLOW_MIN_HEIGHT
    }

    /// When `column` is full, drop one counter for `player` into each
    /// neighbouring column that has room. Returns the landed counters.
    pub fn check_overflow(&self, board: &mut Board, column: usize, player: PlayerId) -> Vec<Placement> {
        let mut spilled = Vec::new();
        if !self.overflow_applies(board) || column >= board.width() || !board.is_column_full(column) {
            return spilled;
        }

        let neighbours = [column.checked_sub(1), Some(column + 1)];
        for col in neighbours.into_iter().flatten() {
            if col >= board.width() {
                continue;
            }
            if let Ok(row) = board.drop_counter(col, player) {
                spilled.push(Placement::new(row, col));
            }
        }
        if !spilled.is_empty() {
            info!(%player, column, ?spilled, "overflow spill");
        }
        spilled
    }

    /// A full board is a draw unless the move that filled it won.
    pub fn is_draw(&self, board: &Board, last_move_won: bool) -> bool {
        !last_move_won && board.is_full()
    }
}
