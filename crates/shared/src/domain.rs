use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(LeagueId);
id_newtype!(TeamId);

impl LeagueId {
    /// Accepts free-form user input; `None` when nothing is left after trimming.
    pub fn from_input(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakKind {
    Win,
    Loss,
    Tie,
}

impl StreakKind {
    fn letter(self) -> char {
        match self {
            StreakKind::Win => 'W',
            StreakKind::Loss => 'L',
            StreakKind::Tie => 'T',
        }
    }
}

/// Current run of identical results. `None` covers a fresh season or a
/// source that does not report streaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Streak {
    #[default]
    None,
    Run { kind: StreakKind, length: u32 },
}

impl Streak {
    /// Parses the `W3` / `L2` / `T1` notation used by the league service.
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        let text = text.trim();
        if text.is_empty() || text.chars().all(|c| c == '-') {
            return Ok(Streak::None);
        }

        let mut chars = text.chars();
        let kind = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('W') => StreakKind::Win,
            Some('L') => StreakKind::Loss,
            Some('T') => StreakKind::Tie,
            _ => return Err(DecodeError::Streak(text.to_string())),
        };
        let length = chars
            .as_str()
            .trim()
            .parse::<u32>()
            .map_err(|_| DecodeError::Streak(text.to_string()))?;

        if length == 0 {
            Ok(Streak::None)
        } else {
            Ok(Streak::Run { kind, length })
        }
    }
}

impl fmt::Display for Streak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Streak::None => f.write_str("-"),
            Streak::Run { kind, length } => write!(f, "{}{length}", kind.letter()),
        }
    }
}

impl From<Streak> for String {
    fn from(value: Streak) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Streak {
    type Error = DecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Streak::parse(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team_id: TeamId,
    pub name: String,
    pub owner: Option<String>,
    pub logo_url: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: Option<f64>,
    pub streak: Streak,
}

impl TeamStanding {
    pub fn record(&self) -> String {
        format!("{}-{}-{}", self.wins, self.losses, self.ties)
    }

    /// Placeholder glyph for teams without a logo.
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueSnapshot {
    pub league_id: LeagueId,
    pub name: String,
    pub current_week: u32,
    pub total_weeks: u32,
    pub playoff_spots: u32,
    /// Ordered by the service's ranking; index 0 is first place.
    pub teams: Vec<TeamStanding>,
}

impl LeagueSnapshot {
    pub fn team(&self, team_id: &TeamId) -> Option<&TeamStanding> {
        self.teams.iter().find(|team| &team.team_id == team_id)
    }

    /// 1-based rank lookup.
    pub fn team_at_rank(&self, rank: usize) -> Option<&TeamStanding> {
        rank.checked_sub(1).and_then(|idx| self.teams.get(idx))
    }

    pub fn team_ids(&self) -> HashSet<&TeamId> {
        self.teams.iter().map(|team| &team.team_id).collect()
    }

    pub fn in_playoff_position(&self, rank: usize) -> bool {
        rank >= 1 && rank <= self.playoff_spots as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsEntry {
    pub team_id: TeamId,
    pub team_name: String,
    /// Percentage in `0.0..=100.0`.
    pub playoff_probability: f64,
    pub headlines: Vec<String>,
}

impl OddsEntry {
    pub fn preview(&self) -> Option<&str> {
        self.headlines.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub description: String,
    pub week: u32,
    /// Share of simulated playoff paths in which this result was needed, `0.0..=1.0`.
    pub frequency: f64,
    pub is_own_game: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub league_id: LeagueId,
    pub team_id: TeamId,
    pub probability: f64,
    pub message: String,
    pub conditions: Vec<Condition>,
}

impl ScenarioReport {
    pub fn check_weeks(&self, total_weeks: u32) -> Result<(), DecodeError> {
        match self
            .conditions
            .iter()
            .find(|condition| condition.week < 1 || condition.week > total_weeks)
        {
            Some(condition) => Err(DecodeError::Week {
                week: condition.week,
                total_weeks: Some(total_weeks),
            }),
            None => Ok(()),
        }
    }
}
