use std::path::PathBuf;

use crate::game::PlayerId;

/// Errors returned when a move cannot be applied. None of them change state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} is outside the board (width {width})")]
    InvalidColumn { column: usize, width: usize },

    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error("{player} has already used their bomb counter this round")]
    BombAlreadyUsed { player: PlayerId },

    #[error("the bomb counter rule is not enabled")]
    BombDisabled,

    #[error("it is not a human turn ({player} is played by the AI)")]
    NotYourTurn { player: PlayerId },

    #[error("the round is already over")]
    RoundOver,

    #[error("the series is complete")]
    SeriesComplete,

    #[error("no legal column remains")]
    NoLegalMoves,
}

/// Errors raised while building or validating alliances.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllianceError {
    #[error("{player} is listed in both '{first}' and '{second}'")]
    DuplicateMember {
        player: PlayerId,
        first: String,
        second: String,
    },

    #[error("alliance name '{0}' is used more than once")]
    DuplicateName(String),

    #[error("alliance '{0}' does not exist")]
    UnknownAlliance(String),

    #[error("{player} is not part of a {player_count}-player game")]
    UnknownPlayer { player: PlayerId, player_count: usize },

    #[error("'{0}' is not a player identifier (expected 'Player-N')")]
    BadIdentifier(String),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),

    #[error("invalid alliances: {0}")]
    Alliance(#[from] AllianceError),
}
