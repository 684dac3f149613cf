use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AllianceError;

/// Maximum number of seats in a game.
pub const MAX_PLAYERS: usize = 10;

/// Display colours, indexed by player.
const PALETTE: [(u8, u8, u8); MAX_PLAYERS] = [
    (255, 0, 0),
    (0, 255, 0),
    (0, 0, 255),
    (255, 255, 0),
    (255, 0, 255),
    (0, 255, 255),
    (128, 0, 128),
    (255, 165, 0),
    (128, 128, 128),
    (0, 128, 128),
];

/// A player, identified by its 0-based seat index.
///
/// The stable external identifier is `Player-N` with N = index + 1; that is
/// also the serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(usize);

impl PlayerId {
    pub const fn new(index: usize) -> Self {
        PlayerId(index)
    }

    /// 0-based seat index.
    pub fn index(self) -> usize {
        self.0
    }

    /// 1-based player number, as shown to people.
    pub fn number(self) -> usize {
        self.0 + 1
    }

    /// Seat that moves after this one.
    pub fn next(self, player_count: usize) -> PlayerId {
        PlayerId((self.0 + 1) % player_count.max(1))
    }

    /// Derived display colour as RGB.
    pub fn color(self) -> (u8, u8, u8) {
        PALETTE[self.0 % MAX_PLAYERS]
    }

    /// All seats of a `player_count` game, in turn order.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count).map(PlayerId)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player-{}", self.number())
    }
}

impl FromStr for PlayerId {
    type Err = AllianceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = s
            .trim()
            .strip_prefix("Player-")
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|&n| n >= 1)
            .ok_or_else(|| AllianceError::BadIdentifier(s.to_string()))?;
        Ok(PlayerId(number - 1))
    }
}

impl TryFrom<String> for PlayerId {
    type Error = AllianceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PlayerId> for String {
    fn from(player: PlayerId) -> Self {
        player.to_string()
    }
}

/// Who controls a seat. Fixed for a whole series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerType {
    #[default]
    Human,
    EasyAi,
    MediumAi,
    HardAi,
}

impl PlayerType {
    pub fn is_ai(self) -> bool {
        !matches!(self, PlayerType::Human)
    }

    /// Get seat type name for display
    pub fn name(self) -> &'static str {
        match self {
            PlayerType::Human => "Human",
            PlayerType::EasyAi => "Easy AI",
            PlayerType::MediumAi => "Medium AI",
            PlayerType::HardAi => "Hard AI",
        }
    }
}
