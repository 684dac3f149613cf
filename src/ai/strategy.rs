use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::game::{Placement, PlayerType, RoundState, RuleEngine};

use super::heuristic::HeuristicStrategy;
use super::minimax::{LineEvaluator, MinimaxStrategy, UniformEvaluator};
use super::random::RandomStrategy;

/// Universal interface for all AI move pickers.
pub trait Strategy: Send {
    /// Pick a move for the current player of `state`.
    ///
    /// The returned placement is where the counter would land on the current
    /// board. The live board is never touched; probing happens on copies.
    /// Returns `None` only when no column can take a counter.
    fn select_move(
        &mut self,
        state: &RoundState,
        rules: &RuleEngine,
        rng: &mut dyn RngCore,
    ) -> Option<Placement>;

    /// Return the strategy's display name.
    fn name(&self) -> &str;
}

/// Leaf evaluator used by the Hard AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    /// +1 / -1 by who moved last; the Hard AI then takes the leftmost column.
    #[default]
    Uniform,
    /// Terminal wins plus win-length window scoring.
    Lines,
}

/// AI tuning, loadable from the `[ai]` config section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub hard_depth: usize,
    pub hard_evaluator: EvaluatorKind,
    /// Fixed RNG seed for reproducible series. Random when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            hard_depth: super::minimax::DEFAULT_DEPTH,
            hard_evaluator: EvaluatorKind::Uniform,
            seed: None,
        }
    }
}

/// Build the strategy that plays a seat. Human seats have none.
pub fn strategy_for(seat: PlayerType, config: &AiConfig) -> Option<Box<dyn Strategy>> {
    match seat {
        PlayerType::Human => None,
        PlayerType::EasyAi => Some(Box::new(RandomStrategy)),
        PlayerType::MediumAi => Some(Box::new(HeuristicStrategy)),
        PlayerType::HardAi => Some(match config.hard_evaluator {
            EvaluatorKind::Uniform => Box::new(MinimaxStrategy::with_evaluator(
                config.hard_depth,
                Box::new(UniformEvaluator),
            )),
            EvaluatorKind::Lines => Box::new(MinimaxStrategy::with_evaluator(
                config.hard_depth,
                Box::new(LineEvaluator),
            )),
        }),
    }
}
