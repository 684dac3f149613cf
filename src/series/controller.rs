use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::ai::{strategy_for, Strategy};
use crate::config::MatchConfig;
use crate::error::{ConfigError, MoveError};
use crate::game::{Board, MoveOutcome, PlayerId, PlayerType, RoundOutcome, RoundState, RuleEngine};

use super::results::{champion, standings, RoundResult, SeriesSummary, Standing};

/// Where the series is waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchPhase {
    AwaitingMove(PlayerId),
    SeriesComplete,
}

/// What happened after the move that ended a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundEnd {
    /// A fresh round `next_round` (1-based) has started.
    NextRound {
        outcome: RoundOutcome,
        next_round: usize,
    },
    SeriesComplete { outcome: RoundOutcome },
}

impl RoundEnd {
    pub fn outcome(&self) -> RoundOutcome {
        match *self {
            RoundEnd::NextRound { outcome, .. } | RoundEnd::SeriesComplete { outcome } => outcome,
        }
    }
}

/// Result of one applied move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    pub outcome: MoveOutcome,
    /// Set when the move finished the round.
    pub round_end: Option<RoundEnd>,
}

/// Drives a best-of-N series: rounds, turns and AI seats.
pub struct MatchController {
    config: MatchConfig,
    rules: RuleEngine,
    seats: Vec<PlayerType>,
    strategies: Vec<Option<Box<dyn Strategy>>>,
    rng: StdRng,
    round: RoundState,
    rounds_played: usize,
    history: Vec<RoundResult>,
    phase: MatchPhase,
}

impl MatchController {
    /// Validate `config` and start the first round.
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rules = RuleEngine::new(config.rules, config.alliance_registry()?);
        let seats = config.resolved_seats();
        let strategies = seats
            .iter()
            .map(|&seat| strategy_for(seat, &config.ai))
            .collect();
        let rng = match config.ai.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let round = Self::fresh_round(&config);
        let rounds_played = config.series.round_counter;

        info!(
            width = config.board.width,
            height = config.board.height,
            players = config.players.count,
            win_length = config.rules.win_length,
            best_of = config.series.best_of,
            "series started"
        );

        Ok(MatchController {
            phase: MatchPhase::AwaitingMove(round.current_player()),
            config,
            rules,
            seats,
            strategies,
            rng,
            round,
            rounds_played,
            history: Vec::new(),
        })
    }

    fn fresh_round(config: &MatchConfig) -> RoundState {
        RoundState::new(config.board.width, config.board.height, config.players.count)
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == MatchPhase::SeriesComplete
    }

    pub fn board(&self) -> &Board {
        self.round.board()
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    /// Player to move. After the series ends this is the last round's final
    /// mover.
    pub fn current_turn(&self) -> PlayerId {
        self.round.current_player()
    }

    pub fn seat(&self, player: PlayerId) -> Option<PlayerType> {
        self.seats.get(player.index()).copied()
    }

    pub fn seats(&self) -> &[PlayerType] {
        &self.seats
    }

    /// 1-based number of the round being played (or last played).
    pub fn round_number(&self) -> usize {
        (self.rounds_played + 1).min(self.config.series.best_of)
    }

    /// Rounds finished so far, including any carried over by
    /// `series.round_counter`.
    pub fn rounds_played(&self) -> usize {
        self.rounds_played
    }

    pub fn history(&self) -> &[RoundResult] {
        &self.history
    }

    /// Round winners in order: 0 for a draw, else the 1-based player number.
    pub fn series_winners(&self) -> Vec<usize> {
        self.history.iter().map(RoundResult::winner_code).collect()
    }

    pub fn standings(&self) -> Vec<Standing> {
        standings(&self.history, &self.seats)
    }

    pub fn summary(&self) -> SeriesSummary {
        let table = self.standings();
        SeriesSummary {
            best_of: self.config.series.best_of,
            rounds_played: self.rounds_played,
            complete: self.is_complete(),
            winners: self.series_winners(),
            champion: champion(&table),
            standings: table,
            rounds: self.history.clone(),
        }
    }

    /// Drop a counter for the human seat whose turn it is.
    pub fn drop_at(&mut self, column: usize) -> Result<TurnReport, MoveError> {
        self.ensure_human_turn()?;
        let outcome = self.round.apply_drop(column, &self.rules)?;
        Ok(self.after_move(outcome))
    }

    /// Play the human seat's bomb counter into `column`.
    pub fn use_bomb(&mut self, column: usize) -> Result<TurnReport, MoveError> {
        self.ensure_human_turn()?;
        let outcome = self.round.apply_bomb(column, &self.rules)?;
        Ok(self.after_move(outcome))
    }

    /// Let the AI seat whose turn it is pick and play a move.
    #[instrument(level = "debug", skip(self), fields(player = %self.round.current_player()))]
    pub fn play_ai_turn(&mut self) -> Result<TurnReport, MoveError> {
        let player = self.awaiting()?;
        let Some(strategy) = self
            .strategies
            .get_mut(player.index())
            .and_then(Option::as_mut)
        else {
            return Err(MoveError::NotYourTurn { player });
        };

        let choice = strategy
            .select_move(&self.round, &self.rules, &mut self.rng)
            .ok_or(MoveError::NoLegalMoves)?;
        debug!(strategy = strategy.name(), column = choice.column, "AI move");

        let outcome = self.round.apply_drop(choice.column, &self.rules)?;
        Ok(self.after_move(outcome))
    }

    /// Play AI seats until a human is to move or the series ends.
    pub fn run_ai_turns(&mut self) -> Result<Vec<TurnReport>, MoveError> {
        let mut reports = Vec::new();
        while let MatchPhase::AwaitingMove(player) = self.phase {
            if !self.seat(player).is_some_and(PlayerType::is_ai) {
                break;
            }
            reports.push(self.play_ai_turn()?);
        }
        Ok(reports)
    }

    /// Play the rest of the series. Fails with `NotYourTurn` when a human
    /// seat comes up.
    pub fn play_to_completion(&mut self) -> Result<Vec<TurnReport>, MoveError> {
        let mut reports = Vec::new();
        while !self.is_complete() {
            reports.push(self.play_ai_turn()?);
        }
        Ok(reports)
    }

    fn awaiting(&self) -> Result<PlayerId, MoveError> {
        match self.phase {
            MatchPhase::AwaitingMove(player) => Ok(player),
            MatchPhase::SeriesComplete => Err(MoveError::SeriesComplete),
        }
    }

    fn ensure_human_turn(&self) -> Result<(), MoveError> {
        let player = self.awaiting()?;
        if self.seat(player).is_some_and(PlayerType::is_ai) {
            return Err(MoveError::NotYourTurn { player });
        }
        Ok(())
    }

    fn after_move(&mut self, outcome: MoveOutcome) -> TurnReport {
        let round_end = self.round.outcome().map(|result| self.finish_round(result));
        if let MatchPhase::AwaitingMove(_) = self.phase {
            self.phase = MatchPhase::AwaitingMove(self.round.current_player());
        }
        TurnReport { outcome, round_end }
    }

    fn finish_round(&mut self, outcome: RoundOutcome) -> RoundEnd {
        self.rounds_played += 1;
        let result = RoundResult {
            round: self.rounds_played,
            outcome,
            moves: self.round.moves_played(),
            board: self.round.board().snapshot(),
        };
        info!(
            round = result.round,
            best_of = self.config.series.best_of,
            winner = result.winner_code(),
            "round finished"
        );
        self.history.push(result);

        if self.rounds_played < self.config.series.best_of {
            self.round = Self::fresh_round(&self.config);
            RoundEnd::NextRound {
                outcome,
                next_round: self.rounds_played + 1,
            }
        } else {
            info!(winners = ?self.series_winners(), "series complete");
            self.phase = MatchPhase::SeriesComplete;
            RoundEnd::SeriesComplete { outcome }
        }
    }
}
