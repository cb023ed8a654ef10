//! Canned league data. Every number served here is stored, not simulated.

use std::collections::HashMap;

use shared::protocol::{
    ConditionPayload, LeaguePayload, MatchupPayload, OddsPayload, ScenarioPayload, TeamPayload,
};

const SIMULATIONS: u32 = 2000;

pub struct FixtureLeague {
    pub league: LeaguePayload,
    /// Sorted by probability, highest first.
    pub odds: Vec<OddsPayload>,
    scenarios: HashMap<String, ScenarioPayload>,
}

impl FixtureLeague {
    fn new(
        league: LeaguePayload,
        probabilities: &[(&str, f64)],
        scenarios: Vec<ScenarioPayload>,
    ) -> Self {
        let mut odds: Vec<OddsPayload> = probabilities
            .iter()
            .filter_map(|(team_id, probability)| {
                let team = league.teams.iter().find(|team| team.id == *team_id)?;
                Some(odds_entry(team, *probability))
            })
            .collect();
        odds.sort_by(|a, b| b.playoff_probability.total_cmp(&a.playoff_probability));

        let scenarios = scenarios
            .into_iter()
            .filter_map(|scenario| scenario.team_id.clone().map(|id| (id, scenario)))
            .collect();

        Self {
            league,
            odds,
            scenarios,
        }
    }

    /// Canned report for the team, or a condition-free one built from its
    /// stored odds. `None` when the team is not in this league.
    pub fn scenario(&self, team_id: &str) -> Option<ScenarioPayload> {
        if let Some(scenario) = self.scenarios.get(team_id) {
            return Some(scenario.clone());
        }
        let entry = self.odds.iter().find(|entry| entry.team_id == team_id)?;
        Some(ScenarioPayload {
            team_id: Some(team_id.to_string()),
            probability: entry.playoff_probability,
            message: paths_message(entry.playoff_probability),
            conditions: Vec::new(),
        })
    }
}

pub struct FixtureCatalog {
    leagues: HashMap<String, FixtureLeague>,
}

impl FixtureCatalog {
    pub fn builtin() -> Self {
        let leagues = [mock_league(), demo_league()]
            .into_iter()
            .map(|fixture| (fixture.league.league_id.clone(), fixture))
            .collect();
        Self { leagues }
    }

    pub fn league(&self, league_id: &str) -> Option<&FixtureLeague> {
        self.leagues.get(league_id)
    }

    pub fn league_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.leagues.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

/// One-line summary attached to each odds entry.
pub fn headline(probability: f64) -> &'static str {
    if probability == 100.0 {
        "Clinched playoffs"
    } else if probability == 0.0 {
        "Eliminated"
    } else if probability >= 90.0 {
        "Very likely to make it"
    } else if probability <= 10.0 {
        "Needs a miracle"
    } else {
        "In the hunt"
    }
}

fn paths_message(probability: f64) -> String {
    let paths = (probability / 100.0 * f64::from(SIMULATIONS)).round() as u32;
    if paths == 0 {
        format!("No scenarios found in {SIMULATIONS} simulations. Extremely unlikely.")
    } else {
        format!("Found {paths} paths to playoffs in {SIMULATIONS} simulations.")
    }
}

fn odds_entry(team: &TeamPayload, probability: f64) -> OddsPayload {
    OddsPayload {
        team_id: team.id.clone(),
        team_name: team.name.clone(),
        playoff_probability: probability,
        clinched_playoffs: probability == 100.0,
        eliminated: probability == 0.0,
        scenarios: vec![headline(probability).to_string()],
    }
}

struct TeamRow {
    id: &'static str,
    name: &'static str,
    owner: &'static str,
    record: (u32, u32, u32),
    points_for: f64,
    points_against: f64,
    streak: Option<&'static str>,
}

fn team(row: TeamRow) -> TeamPayload {
    let (wins, losses, ties) = row.record;
    TeamPayload {
        id: row.id.into(),
        name: row.name.into(),
        owner: Some(row.owner.into()),
        wins,
        losses,
        ties,
        points_for: row.points_for,
        points_against: Some(row.points_against),
        streak: row.streak.map(str::to_string),
        logo_url: None,
    }
}

fn matchups(week: u32, pairs: &[(&str, &str)]) -> Vec<MatchupPayload> {
    pairs
        .iter()
        .map(|(team1, team2)| MatchupPayload {
            week,
            team1_id: (*team1).into(),
            team2_id: (*team2).into(),
            team1_score: None,
            team2_score: None,
            completed: false,
        })
        .collect()
}

fn condition(
    week: u32,
    (team1, team2): (&str, &str),
    winner: &str,
    description: &str,
    frequency: f64,
    is_own_game: bool,
) -> ConditionPayload {
    ConditionPayload {
        description: description.into(),
        week,
        frequency,
        is_own_game,
        game_key: Some(format!("{week}-{team1}-{team2}")),
        needed_winner_id: Some(winner.into()),
    }
}

fn scenario(team_id: &str, probability: f64, conditions: Vec<ConditionPayload>) -> ScenarioPayload {
    ScenarioPayload {
        team_id: Some(team_id.into()),
        probability,
        message: paths_message(probability),
        conditions,
    }
}

/// Six-team league used for local development.
fn mock_league() -> FixtureLeague {
    let teams = [
        ("1", "Team A", "Owner A", (8, 4, 0), 1200.5, 1100.0),
        ("2", "Team B", "Owner B", (7, 5, 0), 1150.0, 1120.0),
        ("3", "Team C", "Owner C", (7, 5, 0), 1100.0, 1050.0),
        ("4", "Team D", "Owner D", (6, 6, 0), 1050.0, 1100.0),
        ("5", "Team E", "Owner E", (5, 7, 0), 1000.0, 1150.0),
        ("6", "Team F", "Owner F", (3, 9, 0), 900.0, 1200.0),
    ]
    .into_iter()
    .map(|(id, name, owner, record, points_for, points_against)| {
        team(TeamRow {
            id,
            name,
            owner,
            record,
            points_for,
            points_against,
            streak: None,
        })
    })
    .collect();

    let mut schedule = matchups(13, &[("1", "2"), ("3", "4"), ("5", "6")]);
    schedule.extend(matchups(14, &[("1", "3"), ("2", "5"), ("4", "6")]));

    let league = LeaguePayload {
        league_id: "mock".into(),
        name: "Mock League".into(),
        teams,
        schedule,
        current_week: 13,
        total_weeks: 14,
        playoff_spots: 4,
    };

    let scenarios = vec![
        scenario(
            "1",
            97.3,
            vec![condition(13, ("1", "2"), "1", "Win vs Team B (Week 13)", 0.74, true)],
        ),
        scenario(
            "4",
            41.9,
            vec![
                condition(13, ("3", "4"), "4", "Win vs Team C (Week 13)", 0.93, true),
                condition(14, ("4", "6"), "4", "Win vs Team F (Week 14)", 0.88, true),
                condition(
                    13,
                    ("1", "2"),
                    "1",
                    "Need Team A to beat Team B (Week 13)",
                    0.71,
                    false,
                ),
            ],
        ),
    ];

    FixtureLeague::new(
        league,
        &[
            ("1", 97.3),
            ("2", 78.4),
            ("3", 69.1),
            ("4", 41.9),
            ("5", 13.3),
            ("6", 0.0),
        ],
        scenarios,
    )
}

/// Ten-team public league used in demos.
fn demo_league() -> FixtureLeague {
    let rows = [
        ("1", "Alpha", "Avery", (11, 1, 0), 1688.4, 1310.2, "W6"),
        ("2", "Beta", "Blake", (9, 3, 0), 1602.7, 1398.5, "W2"),
        ("3", "Gamma", "Casey", (8, 4, 0), 1571.0, 1450.9, "L1"),
        ("4", "Delta", "Devon", (7, 5, 0), 1533.3, 1489.1, "W1"),
        ("5", "Epsilon", "Emery", (7, 5, 0), 1498.6, 1502.4, "L2"),
        ("7", "Eta", "Harper", (6, 6, 0), 1477.2, 1466.0, "W1"),
        ("8", "Theta", "Jordan", (5, 7, 0), 1430.8, 1521.7, "L3"),
        ("9", "Iota", "Kendall", (4, 8, 0), 1389.5, 1577.3, "W1"),
        ("10", "Kappa", "Logan", (3, 9, 0), 1342.1, 1611.8, "L1"),
        ("6", "Zeta", "Morgan", (0, 11, 1), 1201.9, 1702.6, "L7"),
    ];
    let teams = rows
        .into_iter()
        .map(|(id, name, owner, record, points_for, points_against, streak)| {
            team(TeamRow {
                id,
                name,
                owner,
                record,
                points_for,
                points_against,
                streak: Some(streak),
            })
        })
        .collect();

    let mut schedule = matchups(
        13,
        &[("1", "10"), ("2", "9"), ("3", "8"), ("4", "7"), ("5", "6")],
    );
    schedule.extend(matchups(
        14,
        &[("1", "2"), ("3", "4"), ("5", "7"), ("6", "8"), ("9", "10")],
    ));

    let league = LeaguePayload {
        league_id: "7495009".into(),
        name: "Sunday Funday League".into(),
        teams,
        schedule,
        current_week: 13,
        total_weeks: 14,
        playoff_spots: 6,
    };

    let scenarios = vec![
        scenario("1", 100.0, Vec::new()),
        scenario(
            "7",
            50.0,
            vec![
                condition(13, ("4", "7"), "7", "Win vs Delta (Week 13)", 0.97, true),
                condition(14, ("5", "7"), "7", "Win vs Epsilon (Week 14)", 0.81, true),
                condition(
                    13,
                    ("2", "9"),
                    "2",
                    "Need Beta to beat Iota (Week 13)",
                    0.72,
                    false,
                ),
            ],
        ),
        scenario(
            "8",
            35.8,
            vec![
                condition(13, ("3", "8"), "8", "Win vs Gamma (Week 13)", 0.99, true),
                condition(14, ("6", "8"), "8", "Win vs Zeta (Week 14)", 0.94, true),
                condition(
                    13,
                    ("4", "7"),
                    "4",
                    "Need Delta to beat Eta (Week 13)",
                    0.78,
                    false,
                ),
            ],
        ),
    ];

    FixtureLeague::new(
        league,
        &[
            ("1", 100.0),
            ("2", 96.2),
            ("3", 88.4),
            ("4", 73.5),
            ("5", 61.0),
            ("7", 50.0),
            ("8", 35.8),
            ("9", 18.6),
            ("10", 6.3),
            ("6", 0.0),
        ],
        scenarios,
    )
}

#[cfg(test)]
#[path = "tests/fixtures_tests.rs"]
mod tests;
