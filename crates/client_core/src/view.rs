//! Pure projection from session and drill-down state to render-ready view
//! models. Nothing here touches the network or mutates state.

use serde::Serialize;
use shared::domain::{LeagueSnapshot, OddsEntry, ScenarioReport, TeamStanding};

use crate::{
    classify::{
        classify_frequency, classify_probability, condition_icon, ConditionIcon,
        ConditionSeverity, OddsCategory,
    },
    drilldown::DrilldownState,
    store::{LoadStatus, SessionView, LEAGUE_LOAD_FAILED_MESSAGE},
};

pub const LOADING_LEAGUE_TEXT: &str = "Loading league...";
pub const LOADING_SCENARIOS_TEXT: &str = "Crunching the numbers...";
const NO_DEPENDENCIES_TEXT: &str = "No specific dependencies found.";
const STRONG_POSITION_TEXT: &str = "Just keep winning!";
const TOSS_UP_TEXT: &str = "It's a toss-up.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub status: LoadStatus,
    pub status_line: Option<String>,
    pub header: Option<HeaderView>,
    pub standings: Vec<StandingRow>,
    pub odds: Vec<OddsRow>,
    pub drilldown: DrilldownPanel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderView {
    pub league_name: String,
    pub week: String,
    pub playoff_spots: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamBadge {
    Logo(String),
    Initial(char),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingRow {
    pub rank: usize,
    pub team_id: String,
    pub name: String,
    pub record: String,
    pub points_for: String,
    pub streak: String,
    pub in_playoff_position: bool,
    pub badge: TeamBadge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsRow {
    pub team_id: String,
    pub team_name: String,
    pub probability: f64,
    pub probability_text: String,
    pub category: OddsCategory,
    pub preview: Option<String>,
    pub is_loading: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionRow {
    pub description: String,
    pub week: String,
    pub impact: String,
    pub severity: ConditionSeverity,
    pub icon: ConditionIcon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DrilldownPanel {
    Closed,
    Loading {
        team_name: String,
        text: String,
    },
    Failed {
        team_name: String,
        text: String,
    },
    Ready {
        team_name: String,
        probability: String,
        category: OddsCategory,
        message: String,
        conditions: Vec<ConditionRow>,
        /// Set only when the report lists no conditions.
        fallback: Option<String>,
    },
}

pub fn project(session: &SessionView, drilldown: &DrilldownState) -> DashboardView {
    let status_line = match session.status {
        LoadStatus::Loading => Some(LOADING_LEAGUE_TEXT.to_string()),
        LoadStatus::Failed => Some(
            session
                .last_error
                .as_ref()
                .map(|failure| failure.user_message())
                .unwrap_or(LEAGUE_LOAD_FAILED_MESSAGE)
                .to_string(),
        ),
        LoadStatus::Idle | LoadStatus::Ready => None,
    };

    // Standings and odds are shown together or not at all.
    let (header, standings, odds) = match (session.status, &session.snapshot, &session.odds) {
        (LoadStatus::Ready, Some(snapshot), Some(odds)) => (
            Some(header(snapshot)),
            standings(snapshot),
            odds_rows(odds, drilldown),
        ),
        _ => (None, Vec::new(), Vec::new()),
    };

    DashboardView {
        status: session.status,
        status_line,
        header,
        standings,
        odds,
        drilldown: drilldown_panel(drilldown),
    }
}

fn header(snapshot: &LeagueSnapshot) -> HeaderView {
    HeaderView {
        league_name: snapshot.name.clone(),
        week: format!("{} / {}", snapshot.current_week, snapshot.total_weeks),
        playoff_spots: snapshot.playoff_spots,
    }
}

pub fn standings(snapshot: &LeagueSnapshot) -> Vec<StandingRow> {
    snapshot
        .teams
        .iter()
        .enumerate()
        .map(|(idx, team)| standing_row(snapshot, idx + 1, team))
        .collect()
}

fn standing_row(snapshot: &LeagueSnapshot, rank: usize, team: &TeamStanding) -> StandingRow {
    let badge = match team.logo_url.as_deref() {
        Some(url) if !url.is_empty() => TeamBadge::Logo(url.to_string()),
        _ => TeamBadge::Initial(team.initial()),
    };
    StandingRow {
        rank,
        team_id: team.team_id.to_string(),
        name: team.name.clone(),
        record: team.record(),
        points_for: format!("{:.1}", team.points_for),
        streak: team.streak.to_string(),
        in_playoff_position: snapshot.in_playoff_position(rank),
        badge,
    }
}

pub fn odds_rows(odds: &[OddsEntry], drilldown: &DrilldownState) -> Vec<OddsRow> {
    odds.iter()
        .map(|entry| OddsRow {
            team_id: entry.team_id.to_string(),
            team_name: entry.team_name.clone(),
            probability: entry.playoff_probability,
            probability_text: percent(entry.playoff_probability),
            category: classify_probability(entry.playoff_probability),
            preview: entry.preview().map(str::to_string),
            is_loading: drilldown.is_loading(&entry.team_id),
        })
        .collect()
}

pub fn drilldown_panel(state: &DrilldownState) -> DrilldownPanel {
    match state {
        DrilldownState::Closed => DrilldownPanel::Closed,
        DrilldownState::Selecting { team } | DrilldownState::Loading { team } => {
            DrilldownPanel::Loading {
                team_name: team.name.clone(),
                text: LOADING_SCENARIOS_TEXT.to_string(),
            }
        }
        DrilldownState::Failed { team, message } => DrilldownPanel::Failed {
            team_name: team.name.clone(),
            text: message.clone(),
        },
        DrilldownState::Ready { team, report } => ready_panel(team, report),
    }
}

fn ready_panel(team: &TeamStanding, report: &ScenarioReport) -> DrilldownPanel {
    let conditions: Vec<ConditionRow> = report
        .conditions
        .iter()
        .map(|condition| ConditionRow {
            description: condition.description.clone(),
            week: format!("Week {}", condition.week),
            impact: format!("{:.0}%", (condition.frequency * 100.0).round()),
            severity: classify_frequency(condition.frequency),
            icon: condition_icon(condition),
        })
        .collect();

    let fallback = conditions
        .is_empty()
        .then(|| no_dependencies_text(report.probability));

    DrilldownPanel::Ready {
        team_name: team.name.clone(),
        probability: percent(report.probability),
        category: classify_probability(report.probability),
        message: report.message.clone(),
        conditions,
        fallback,
    }
}

fn no_dependencies_text(probability: f64) -> String {
    let tail = if probability > 90.0 {
        STRONG_POSITION_TEXT
    } else {
        TOSS_UP_TEXT
    };
    format!("{NO_DEPENDENCIES_TEXT} {tail}")
}

fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
