use std::path::Path;

use tracing::warn;

use crate::ai::AiConfig;
use crate::error::ConfigError;
use crate::game::{
    Alliance, AllianceRegistry, PlayerType, RuleConfig, MAX_DIMENSION, MAX_PLAYERS,
    MAX_WIN_LENGTH, MIN_DIMENSION, MIN_WIN_LENGTH,
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            width: 7,
            height: 6,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Rounds in the series. Always odd.
    pub best_of: usize,
    /// Rounds already played before this session, for resuming a series.
    pub round_counter: usize,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        SeriesConfig {
            best_of: 1,
            round_counter: 0,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayersConfig {
    pub count: usize,
    /// Seat types in player order. Seats past the end of the list are filled
    /// in by [`MatchConfig::resolved_seats`].
    pub seats: Vec<PlayerType>,
}

impl Default for PlayersConfig {
    fn default() -> Self {
        PlayersConfig {
            count: 2,
            seats: vec![PlayerType::Human, PlayerType::MediumAi],
        }
    }
}

/// Everything needed to start a series, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub board: BoardConfig,
    pub rules: RuleConfig,
    pub series: SeriesConfig,
    pub players: PlayersConfig,
    pub ai: AiConfig,
    pub alliances: Vec<Alliance>,
}

impl MatchConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: MatchConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = MIN_DIMENSION..=MAX_DIMENSION;
        if !dims.contains(&self.board.width) {
            return Err(ConfigError::Validation(format!(
                "board.width must be in [{MIN_DIMENSION}, {MAX_DIMENSION}]"
            )));
        }
        if !dims.contains(&self.board.height) {
            return Err(ConfigError::Validation(format!(
                "board.height must be in [{MIN_DIMENSION}, {MAX_DIMENSION}]"
            )));
        }
        if !(MIN_WIN_LENGTH..=MAX_WIN_LENGTH).contains(&self.rules.win_length) {
            return Err(ConfigError::Validation(format!(
                "rules.win_length must be in [{MIN_WIN_LENGTH}, {MAX_WIN_LENGTH}]"
            )));
        }
        if self.players.count == 0 || self.players.count > MAX_PLAYERS {
            return Err(ConfigError::Validation(format!(
                "players.count must be in [1, {MAX_PLAYERS}]"
            )));
        }
        if self.players.seats.len() > self.players.count {
            return Err(ConfigError::Validation(
                "players.seats must not list more seats than players.count".into(),
            ));
        }
        if self.series.best_of == 0 || self.series.best_of % 2 == 0 {
            return Err(ConfigError::Validation(
                "series.best_of must be an odd number >= 1".into(),
            ));
        }
        if self.series.round_counter >= self.series.best_of {
            return Err(ConfigError::Validation(
                "series.round_counter must be < series.best_of".into(),
            ));
        }
        if self.ai.hard_depth == 0 {
            return Err(ConfigError::Validation("ai.hard_depth must be >= 1".into()));
        }

        self.alliance_registry()?;
        Ok(())
    }

    /// One seat type per player. Unlisted seats become Easy AI when
    /// `rules.ai_for_missing_players` is set, otherwise humans.
    pub fn resolved_seats(&self) -> Vec<PlayerType> {
        let filler = if self.rules.ai_for_missing_players {
            PlayerType::EasyAi
        } else {
            PlayerType::Human
        };
        (0..self.players.count)
            .map(|i| self.players.seats.get(i).copied().unwrap_or(filler))
            .collect()
    }

    /// Build the alliance registry, checking every member exists.
    pub fn alliance_registry(&self) -> Result<AllianceRegistry, ConfigError> {
        let registry = AllianceRegistry::new(self.alliances.clone())?;
        registry.validate_players(self.players.count)?;
        Ok(registry)
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&MatchConfig::default()).expect("default config serializes")
    }
}
