use serde::Serialize;

use crate::game::{Board, PlayerId, PlayerType, RoundOutcome};

/// One finished round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundResult {
    /// 1-based round number within the series.
    pub round: usize,
    pub outcome: RoundOutcome,
    pub moves: usize,
    /// Final board, never mutated after the round ends.
    pub board: Board,
}

impl RoundResult {
    /// Leaderboard encoding: 0 for a draw, otherwise the winner's 1-based
    /// player number.
    pub fn winner_code(&self) -> usize {
        match self.outcome {
            RoundOutcome::Winner(player) => player.number(),
            RoundOutcome::Draw => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub player: PlayerId,
    pub seat: PlayerType,
    pub wins: usize,
    pub draws: usize,
}

/// Rank players by round wins, most first. Ties keep player order.
pub fn standings(history: &[RoundResult], seats: &[PlayerType]) -> Vec<Standing> {
    let draws = history
        .iter()
        .filter(|r| r.outcome == RoundOutcome::Draw)
        .count();
    let mut table: Vec<Standing> = seats
        .iter()
        .enumerate()
        .map(|(idx, &seat)| Standing {
            player: PlayerId::new(idx),
            seat,
            wins: 0,
            draws,
        })
        .collect();

    for result in history {
        if let RoundOutcome::Winner(player) = result.outcome {
            if let Some(entry) = table.get_mut(player.index()) {
                entry.wins += 1;
            }
        }
    }

    // Stable sort keeps lower player numbers first on ties
    table.sort_by(|a, b| b.wins.cmp(&a.wins));
    table
}

/// Serializable report of a series, handed to leaderboard and CLI output.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesSummary {
    pub best_of: usize,
    pub rounds_played: usize,
    pub complete: bool,
    /// Round winners in order: 0 for a draw, else the 1-based player number.
    pub winners: Vec<usize>,
    pub standings: Vec<Standing>,
    /// Sole player with the most wins, if any.
    pub champion: Option<PlayerId>,
    pub rounds: Vec<RoundResult>,
}

/// The single player with strictly the most wins.
pub fn champion(standings: &[Standing]) -> Option<PlayerId> {
    match standings {
        [first, second, ..] if first.wins == second.wins => None,
        [first, ..] if first.wins > 0 => Some(first.player),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(round: usize, outcome: RoundOutcome) -> RoundResult {
        RoundResult {
            round,
            outcome,
            moves: 7,
            board: Board::new(7, 6),
        }
    }

    #[test]
    fn test_winner_code() {
        assert_eq!(result(1, RoundOutcome::Draw).winner_code(), 0);
        assert_eq!(
            result(1, RoundOutcome::Winner(PlayerId::new(2))).winner_code(),
            3
        );
    }

    #[test]
    fn test_standings_sorted_by_wins_then_player() {
        let history = vec![
            result(1, RoundOutcome::Winner(PlayerId::new(2))),
            result(2, RoundOutcome::Draw),
            result(3, RoundOutcome::Winner(PlayerId::new(1))),
            result(4, RoundOutcome::Winner(PlayerId::new(2))),
        ];
        let seats = [PlayerType::Human, PlayerType::EasyAi, PlayerType::HardAi];
        let table = standings(&history, &seats);

        let order: Vec<(usize, usize)> = table.iter().map(|s| (s.player.number(), s.wins)).collect();
        assert_eq!(order, vec![(3, 2), (2, 1), (1, 0)]);
        assert_eq!(table[0].seat, PlayerType::HardAi);
        assert!(table.iter().all(|s| s.draws == 1));
        assert_eq!(champion(&table), Some(PlayerId::new(2)));
    }

    #[test]
    fn test_no_champion_on_tie_or_no_wins() {
        let seats = [PlayerType::Human, PlayerType::Human];
        let tied = standings(
            &[
                result(1, RoundOutcome::Winner(PlayerId::new(1))),
                result(2, RoundOutcome::Winner(PlayerId::new(0))),
            ],
            &seats,
        );
        assert_eq!(tied[0].player, PlayerId::new(0));
        assert_eq!(champion(&tied), None);

        let drawn = standings(&[result(1, RoundOutcome::Draw)], &seats);
        assert_eq!(champion(&drawn), None);
    }

    #[test]
    fn test_summary_serializes() {
        let history = vec![result(1, RoundOutcome::Winner(PlayerId::new(0)))];
        let seats = [PlayerType::Human, PlayerType::EasyAi];
        let table = standings(&history, &seats);
        let summary = SeriesSummary {
            best_of: 1,
            rounds_played: 1,
            complete: true,
            winners: history.iter().map(RoundResult::winner_code).collect(),
            champion: champion(&table),
            standings: table,
            rounds: history,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["winners"], serde_json::json!([1]));
        assert_eq!(json["champion"], "Player-1");
        assert_eq!(json["standings"][1]["seat"], "easy_ai");
    }
}
