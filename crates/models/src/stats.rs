use serde::{Deserialize, Serialize};
use std::fmt;

/// Season-level home/away summary for one team.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TeamStats {
    pub total_home_matches: u32,
    pub home_wins: u32,
    pub home_win_rate: f64,
    pub avg_goals_home: f64,
    pub total_away_matches: u32,
    pub away_wins: u32,
    pub away_win_rate: f64,
    pub avg_goals_away: f64,
    /// All-venue scoring average, only filled by the extended profile.
    pub avg_goals_scored: Option<f64>,
    /// All-venue conceding average, only filled by the extended profile.
    pub avg_goals_conceded: Option<f64>,
    pub draw_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormSummary {
    pub points: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    /// Points over the window divided by the maximum available, in [0, 1].
    pub form_rating: f64,
    pub matches_played: u32,
}

impl FormSummary {
    /// Rating used when a team has no recorded matches.
    pub const NEUTRAL_RATING: f64 = 0.5;

    pub fn neutral() -> Self {
        Self {
            points: 0,
            goals_for: 0,
            goals_against: 0,
            form_rating: Self::NEUTRAL_RATING,
            matches_played: 0,
        }
    }
}

impl Default for FormSummary {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Thresholded view of the condition draws, for display only.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConditionFlags {
    pub injuries: bool,
    pub suspensions: bool,
    pub high_motivation: bool,
    pub fatigue: bool,
}

/// Match-day condition of a team, expressed in goals.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConditionAdjustment {
    pub injury_factor: f64,
    pub suspension_factor: f64,
    pub fatigue_factor: f64,
    pub motivation_factor: f64,
    pub crowd_factor: f64,
    /// Sum of the five factors clamped to [-0.5, 0.5].
    pub condition_impact: f64,
    pub flags: ConditionFlags,
}

impl ConditionAdjustment {
    pub const MAX_IMPACT: f64 = 0.5;

    pub fn from_factors(injury: f64, suspension: f64, fatigue: f64, motivation: f64, crowd: f64) -> Self {
        let total = injury + suspension + fatigue + motivation + crowd;
        Self {
            injury_factor: injury,
            suspension_factor: suspension,
            fatigue_factor: fatigue,
            motivation_factor: motivation,
            crowd_factor: crowd,
            condition_impact: total.clamp(-Self::MAX_IMPACT, Self::MAX_IMPACT),
            flags: ConditionFlags {
                injuries: injury < -0.15,
                suspensions: suspension < -0.1,
                high_motivation: motivation > 0.2,
                fatigue: fatigue < -0.15,
            },
        }
    }

    /// A condition with no impact at all.
    pub fn neutral() -> Self {
        Self::from_factors(0.0, 0.0, 0.0, 0.0, 0.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FormLetter {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl FormLetter {
    pub fn as_char(self) -> char {
        match self {
            Self::Win => 'W',
            Self::Draw => 'D',
            Self::Loss => 'L',
        }
    }
}

/// Historical edge of the current home side in direct confrontations.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum H2HAdvantage {
    StrongHome,
    SlightHome,
    #[default]
    Neutral,
    SlightAway,
    StrongAway,
}

impl H2HAdvantage {
    /// Classifies the current home side's win percentage over the confrontations.
    pub fn from_home_percentage(pct: f64) -> Self {
        if pct > 60.0 {
            Self::StrongHome
        } else if pct > 40.0 {
            Self::SlightHome
        } else if pct < 25.0 {
            Self::StrongAway
        } else if pct < 40.0 {
            Self::SlightAway
        } else {
            Self::Neutral
        }
    }

    /// Goal shift applied to the home side's head-to-head average.
    pub fn goal_shift(self) -> f64 {
        match self {
            Self::StrongHome => 0.4,
            Self::SlightHome => 0.2,
            Self::Neutral => 0.0,
            Self::SlightAway => -0.15,
            Self::StrongAway => -0.3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StrongHome => "strong_home",
            Self::SlightHome => "slight_home",
            Self::Neutral => "neutral",
            Self::SlightAway => "slight_away",
            Self::StrongAway => "strong_away",
        }
    }
}

impl fmt::Display for H2HAdvantage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direct confrontations, seen from the current home team.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct H2HSummary {
    pub total_matches: u32,
    pub home_wins: u32,
    pub away_wins: u32,
    pub draws: u32,
    pub avg_goals_home: f64,
    pub avg_goals_away: f64,
    /// Most recent first, at most five entries.
    pub recent_form: Vec<FormLetter>,
    pub advantage: H2HAdvantage,
    pub home_percentage: f64,
    pub has_data: bool,
}

impl H2HSummary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn recent_form_string(&self) -> String {
        self.recent_form.iter().map(|l| l.as_char()).collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AdvantageStrength {
    VeryStrong,
    Strong,
    Normal,
    Weak,
    None,
    Default,
}

impl AdvantageStrength {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryStrong => "very_strong",
            Self::Strong => "strong",
            Self::Normal => "normal",
            Self::Weak => "weak",
            Self::None => "none",
            Self::Default => "default",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CrowdSupport {
    Excellent,
    Good,
    Average,
    Poor,
    VeryPoor,
}

impl CrowdSupport {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Average => "average",
            Self::Poor => "poor",
            Self::VeryPoor => "very_poor",
        }
    }
}

/// Team-specific home-field multiplier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HomeAdvantage {
    pub factor: f64,
    pub strength: AdvantageStrength,
    pub crowd_support: CrowdSupport,
    pub home_wins_percentage: f64,
    pub home_goals_ratio: f64,
    pub home_avg_goals: Option<f64>,
    pub total_home_matches: u32,
}

impl HomeAdvantage {
    pub const DEFAULT_FACTOR: f64 = 1.2;

    /// Used when the team has never played at home.
    pub fn standard() -> Self {
        Self {
            factor: Self::DEFAULT_FACTOR,
            strength: AdvantageStrength::Default,
            crowd_support: CrowdSupport::Average,
            home_wins_percentage: 50.0,
            home_goals_ratio: 1.0,
            home_avg_goals: None,
            total_home_matches: 0,
        }
    }
}

impl Default for HomeAdvantage {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_is_clamped() {
        let high = ConditionAdjustment::from_factors(0.1, 0.0, 0.2, 0.3, 0.2);
        assert_eq!(high.condition_impact, 0.5);

        let low = ConditionAdjustment::from_factors(-0.3, -0.2, -0.2, -0.1, 0.0);
        assert_eq!(low.condition_impact, -0.5);
        assert!(low.flags.injuries);
        assert!(low.flags.suspensions);
        assert!(low.flags.fatigue);
        assert!(!low.flags.high_motivation);
    }

    #[test]
    fn test_h2h_advantage_thresholds() {
        assert_eq!(H2HAdvantage::from_home_percentage(70.0), H2HAdvantage::StrongHome);
        assert_eq!(H2HAdvantage::from_home_percentage(60.0), H2HAdvantage::SlightHome);
        assert_eq!(H2HAdvantage::from_home_percentage(40.0), H2HAdvantage::Neutral);
        assert_eq!(H2HAdvantage::from_home_percentage(30.0), H2HAdvantage::SlightAway);
        assert_eq!(H2HAdvantage::from_home_percentage(20.0), H2HAdvantage::StrongAway);
        assert_eq!(H2HAdvantage::from_home_percentage(25.0), H2HAdvantage::SlightAway);
    }

    #[test]
    fn test_labels_serialize_snake_case() {
        let json = serde_json::to_string(&H2HAdvantage::StrongHome).unwrap();
        assert_eq!(json, "\"strong_home\"");
        let json = serde_json::to_string(&CrowdSupport::VeryPoor).unwrap();
        assert_eq!(json, "\"very_poor\"");
        assert_eq!(AdvantageStrength::VeryStrong.as_str(), "very_strong");
    }
}
