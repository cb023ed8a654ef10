use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        Condition, LeagueId, LeagueSnapshot, OddsEntry, ScenarioReport, Streak, TeamId,
        TeamStanding,
    },
    error::DecodeError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamPayload {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub wins: u32,
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    pub points_for: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_against: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupPayload {
    pub week: u32,
    pub team1_id: String,
    pub team2_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team1_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team2_score: Option<f64>,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaguePayload {
    pub league_id: String,
    pub name: String,
    pub teams: Vec<TeamPayload>,
    /// Carried by the service for its own simulation; the client ignores it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<MatchupPayload>,
    pub current_week: u32,
    pub total_weeks: u32,
    pub playoff_spots: u32,
}

impl LeaguePayload {
    pub fn into_snapshot(self) -> Result<LeagueSnapshot, DecodeError> {
        let mut seen = HashSet::new();
        let mut teams = Vec::with_capacity(self.teams.len());
        for team in self.teams {
            if !seen.insert(team.id.clone()) {
                return Err(DecodeError::DuplicateTeam(team.id));
            }
            if !team.points_for.is_finite() || team.points_for < 0.0 {
                return Err(DecodeError::PointsFor {
                    team_id: team.id,
                    value: team.points_for,
                });
            }
            let streak = match team.streak.as_deref() {
                Some(text) => Streak::parse(text)?,
                None => Streak::None,
            };
            teams.push(TeamStanding {
                team_id: TeamId(team.id),
                name: team.name,
                owner: team.owner,
                logo_url: team.logo_url.filter(|url| !url.trim().is_empty()),
                wins: team.wins,
                losses: team.losses,
                ties: team.ties,
                points_for: team.points_for,
                points_against: team.points_against,
                streak,
            });
        }

        Ok(LeagueSnapshot {
            league_id: LeagueId(self.league_id),
            name: self.name,
            current_week: self.current_week,
            total_weeks: self.total_weeks,
            playoff_spots: self.playoff_spots,
            teams,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsPayload {
    pub team_id: String,
    pub team_name: String,
    pub playoff_probability: f64,
    #[serde(default)]
    pub clinched_playoffs: bool,
    #[serde(default)]
    pub eliminated: bool,
    #[serde(default)]
    pub scenarios: Vec<String>,
}

/// Converts the odds list, keeping the service's order.
pub fn decode_odds(payload: Vec<OddsPayload>) -> Result<Vec<OddsEntry>, DecodeError> {
    payload
        .into_iter()
        .map(|entry| {
            if !is_percentage(entry.playoff_probability) {
                return Err(DecodeError::Probability {
                    team_id: entry.team_id,
                    value: entry.playoff_probability,
                });
            }
            Ok(OddsEntry {
                team_id: TeamId(entry.team_id),
                team_name: entry.team_name,
                playoff_probability: entry.playoff_probability,
                headlines: entry.scenarios,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionPayload {
    pub description: String,
    pub week: u32,
    pub frequency: f64,
    pub is_own_game: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needed_winner_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub probability: f64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub conditions: Vec<ConditionPayload>,
}

impl ScenarioPayload {
    /// Season-length bounds are checked later with [`ScenarioReport::check_weeks`]
    /// by callers that hold the snapshot.
    pub fn into_report(
        self,
        league_id: &LeagueId,
        team_id: &TeamId,
    ) -> Result<ScenarioReport, DecodeError> {
        if let Some(actual) = self.team_id {
            if actual != team_id.0 {
                return Err(DecodeError::TeamMismatch {
                    expected: team_id.0.clone(),
                    actual,
                });
            }
        }
        if !is_percentage(self.probability) {
            return Err(DecodeError::Probability {
                team_id: team_id.0.clone(),
                value: self.probability,
            });
        }

        let conditions = self
            .conditions
            .into_iter()
            .map(|condition| {
                if !condition.frequency.is_finite()
                    || !(0.0..=1.0).contains(&condition.frequency)
                {
                    return Err(DecodeError::Frequency(condition.frequency));
                }
                if condition.week < 1 {
                    return Err(DecodeError::Week {
                        week: condition.week,
                        total_weeks: None,
                    });
                }
                Ok(Condition {
                    description: condition.description,
                    week: condition.week,
                    frequency: condition.frequency,
                    is_own_game: condition.is_own_game,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ScenarioReport {
            league_id: league_id.clone(),
            team_id: team_id.clone(),
            probability: self.probability,
            message: self.message,
            conditions,
        })
    }
}

fn is_percentage(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}
