mod heuristic;
mod minimax;
mod random;
mod strategy;

pub use heuristic::HeuristicStrategy;
pub use minimax::{
    Evaluator, LineEvaluator, MinimaxStrategy, UniformEvaluator, DEFAULT_DEPTH, SEARCH_WINDOW,
    WIN_SCORE,
};
pub use random::RandomStrategy;
pub use strategy::{strategy_for, AiConfig, EvaluatorKind, Strategy};
