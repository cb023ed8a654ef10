use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the league service on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// A payload that parsed as JSON but violates the domain rules.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("invalid streak notation '{0}'")]
    Streak(String),
    #[error("duplicate team id '{0}'")]
    DuplicateTeam(String),
    #[error("team '{team_id}' has invalid points_for {value}")]
    PointsFor { team_id: String, value: f64 },
    #[error("probability {value} for team '{team_id}' is outside 0..=100")]
    Probability { team_id: String, value: f64 },
    #[error("condition frequency {0} is outside 0..=1")]
    Frequency(f64),
    #[error("condition week {week} is outside the season ({total_weeks:?} weeks)")]
    Week {
        week: u32,
        total_weeks: Option<u32>,
    },
    #[error("scenario report is for team '{actual}', expected '{expected}'")]
    TeamMismatch { expected: String, actual: String },
}
