use serde::Serialize;
use shared::domain::Condition;

/// Styling bucket for a playoff probability percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OddsCategory {
    Clinched,
    Eliminated,
    Favored,
    Contested,
}

impl OddsCategory {
    pub fn label(self) -> &'static str {
        match self {
            OddsCategory::Clinched => "clinched",
            OddsCategory::Eliminated => "eliminated",
            OddsCategory::Favored => "favored",
            OddsCategory::Contested => "contested",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionSeverity {
    Critical,
    Informational,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionIcon {
    Critical,
    OwnGame,
    ThirdParty,
}

impl ConditionIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            ConditionIcon::Critical => "!",
            ConditionIcon::OwnGame => "*",
            ConditionIcon::ThirdParty => "~",
        }
    }
}

const CRITICAL_FREQUENCY: f64 = 0.9;

pub fn classify_probability(probability: f64) -> OddsCategory {
    if probability == 100.0 {
        OddsCategory::Clinched
    } else if probability == 0.0 {
        OddsCategory::Eliminated
    } else if probability > 50.0 {
        OddsCategory::Favored
    } else {
        OddsCategory::Contested
    }
}

pub fn classify_frequency(frequency: f64) -> ConditionSeverity {
    if frequency > CRITICAL_FREQUENCY {
        ConditionSeverity::Critical
    } else {
        ConditionSeverity::Informational
    }
}

/// Critical outranks own-game when both apply.
pub fn condition_icon(condition: &Condition) -> ConditionIcon {
    match classify_frequency(condition.frequency) {
        ConditionSeverity::Critical => ConditionIcon::Critical,
        ConditionSeverity::Informational if condition.is_own_game => ConditionIcon::OwnGame,
        ConditionSeverity::Informational => ConditionIcon::ThirdParty,
    }
}

#[cfg(test)]
#[path = "tests/classify_tests.rs"]
mod tests;
