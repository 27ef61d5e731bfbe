use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The titles offered by the arcade. Only the red-light game is playable;
/// the rest are placeholders kept so the game list matches the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    #[serde(rename = "squid-game")]
    SquidGame,
    #[serde(rename = "subway-surfers")]
    SubwaySurfers,
    #[serde(rename = "mario")]
    Mario,
    #[serde(rename = "pac-man")]
    PacMan,
}

impl GameKind {
    pub const ALL: [GameKind; 4] = [
        GameKind::SquidGame,
        GameKind::SubwaySurfers,
        GameKind::Mario,
        GameKind::PacMan,
    ];

    /// Identifier used on the wire and in the leaderboard filter.
    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        match self {
            GameKind::SquidGame => "squid-game",
            GameKind::SubwaySurfers => "subway-surfers",
            GameKind::Mario => "mario",
            GameKind::PacMan => "pac-man",
        }
    }

    /// Human-readable title for the game list.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            GameKind::SquidGame => "Red Light, Green Light",
            GameKind::SubwaySurfers => "Subway Surfers",
            GameKind::Mario => "Mario",
            GameKind::PacMan => "Pac-Man",
        }
    }

    /// Whether a playable implementation exists for this title.
    #[must_use]
    pub fn playable(&self) -> bool {
        matches!(self, GameKind::SquidGame)
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// Error type for parsing catalog enums from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCatalogError {
    kind: &'static str,
    raw: String,
}

impl fmt::Display for ParseCatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.raw)
    }
}

impl std::error::Error for ParseCatalogError {}

impl FromStr for GameKind {
    type Err = ParseCatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "squid-game" => Ok(GameKind::SquidGame),
            "subway-surfers" => Ok(GameKind::SubwaySurfers),
            "mario" => Ok(GameKind::Mario),
            "pac-man" => Ok(GameKind::PacMan),
            _ => Err(ParseCatalogError {
                kind: "game",
                raw: s.to_string(),
            }),
        }
    }
}

/// Difficulty requested when a session is created. The backend scales
/// question points with it (10/15/20).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

impl FromStr for Difficulty {
    type Err = ParseCatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseCatalogError {
                kind: "difficulty",
                raw: s.to_string(),
            }),
        }
    }
}
