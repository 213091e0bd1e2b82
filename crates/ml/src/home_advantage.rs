//! Team-specific home-field multiplier.

use footy_models::{round_to, AdvantageStrength, CrowdSupport, FullTimeResult, HomeAdvantage, MatchRecord};
use tracing::debug;

use crate::team_stats::count_u32;

/// Ordered rules, first match wins: (min win %, min goals ratio, factor, strength, crowd).
const RULES: [(f64, Option<f64>, f64, AdvantageStrength, CrowdSupport); 4] = [
    (70.0, Some(1.5), 1.4, AdvantageStrength::VeryStrong, CrowdSupport::Excellent),
    (60.0, Some(1.3), 1.3, AdvantageStrength::Strong, CrowdSupport::Good),
    (50.0, Some(1.1), 1.2, AdvantageStrength::Normal, CrowdSupport::Average),
    (40.0, None, 1.1, AdvantageStrength::Weak, CrowdSupport::Poor),
];

/// Classifies a home win percentage and home/away goals ratio.
pub fn classify_home_advantage(win_pct: f64, goals_ratio: f64) -> (f64, AdvantageStrength, CrowdSupport) {
    RULES
        .iter()
        .find(|(min_pct, min_ratio, ..)| win_pct > *min_pct && min_ratio.map_or(true, |r| goals_ratio > r))
        .map_or((1.0, AdvantageStrength::None, CrowdSupport::VeryPoor), |(_, _, factor, strength, crowd)| {
            (*factor, *strength, *crowd)
        })
}

/// Home advantage of `team` over the whole supplied history.
pub fn calculate_home_advantage(history: &[MatchRecord], team: &str) -> HomeAdvantage {
    let home: Vec<&MatchRecord> = history.iter().filter(|m| m.home_team == team).collect();
    if home.is_empty() {
        return HomeAdvantage::standard();
    }

    let home_wins = home.iter().filter(|m| m.result == FullTimeResult::Home).count();
    let home_goals: u32 = home.iter().map(|m| u32::from(m.home_goals)).sum();

    let away: Vec<&MatchRecord> = history.iter().filter(|m| m.away_team == team).collect();
    let away_avg_goals = if away.is_empty() {
        1.0
    } else {
        f64::from(away.iter().map(|m| u32::from(m.away_goals)).sum::<u32>()) / away.len() as f64
    };

    let win_pct = home_wins as f64 / home.len() as f64 * 100.0;
    let home_avg_goals = f64::from(home_goals) / home.len() as f64;
    let goals_ratio = if away_avg_goals > 0.0 {
        home_avg_goals / away_avg_goals
    } else {
        1.0
    };

    let (factor, strength, crowd_support) = classify_home_advantage(win_pct, goals_ratio);
    debug!(
        "🏠 {} home advantage x{:.1} ({}, {:.1}% wins, ratio {:.2})",
        team,
        factor,
        strength.as_str(),
        win_pct,
        goals_ratio
    );

    HomeAdvantage {
        factor,
        strength,
        crowd_support,
        home_wins_percentage: round_to(win_pct, 1),
        home_goals_ratio: round_to(goals_ratio, 2),
        home_avg_goals: Some(round_to(home_avg_goals, 2)),
        total_home_matches: count_u32(home.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn test_threshold_rules() {
        assert_eq!(classify_home_advantage(75.0, 1.6).0, 1.4);
        assert_eq!(classify_home_advantage(75.0, 1.6).1, AdvantageStrength::VeryStrong);
        assert_eq!(classify_home_advantage(75.0, 1.4).1, AdvantageStrength::Strong);
        assert_eq!(classify_home_advantage(55.0, 1.2).1, AdvantageStrength::Normal);
        assert_eq!(classify_home_advantage(55.0, 0.9).1, AdvantageStrength::Weak);
        assert_eq!(classify_home_advantage(40.0, 3.0), (1.0, AdvantageStrength::None, CrowdSupport::VeryPoor));
    }

    #[test]
    fn test_no_home_matches_uses_default() {
        let history = vec![
            record("2023-08-01", "Genk", "Gent", 0, 3),
            record("2023-08-08", "Union", "Gent", 0, 5),
        ];
        let advantage = calculate_home_advantage(&history, "Gent");
        assert_eq!(advantage.factor, 1.2);
        assert_eq!(advantage.strength, AdvantageStrength::Default);
        assert_eq!(advantage.total_home_matches, 0);
    }

    #[test]
    fn test_strong_home_side() {
        // 4 home wins out of 5, 2.4 goals per home match, 1.0 away
        let history = vec![
            record("2023-08-01", "Genk", "Gent", 3, 0),
            record("2023-08-15", "Genk", "Union", 2, 1),
            record("2023-08-29", "Genk", "Antwerp", 4, 1),
            record("2023-09-12", "Genk", "Cercle", 2, 0),
            record("2023-09-26", "Genk", "Westerlo", 1, 1),
            record("2023-10-10", "Gent", "Genk", 1, 1),
            record("2023-10-24", "Union", "Genk", 0, 1),
        ];
        let advantage = calculate_home_advantage(&history, "Genk");
        assert_eq!(advantage.factor, 1.4);
        assert_eq!(advantage.strength, AdvantageStrength::VeryStrong);
        assert_eq!(advantage.crowd_support, CrowdSupport::Excellent);
        assert_eq!(advantage.home_wins_percentage, 80.0);
        assert_eq!(advantage.home_goals_ratio, 2.4);
    }

    #[test]
    fn test_goalless_away_record_keeps_neutral_ratio() {
        let history = vec![
            record("2023-08-01", "Genk", "Gent", 1, 0),
            record("2023-08-15", "Gent", "Genk", 2, 0),
        ];
        let advantage = calculate_home_advantage(&history, "Genk");
        assert_eq!(advantage.home_goals_ratio, 1.0);
        assert_eq!(advantage.factor, 1.1);
    }
}
