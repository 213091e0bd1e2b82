use footy_models::OutcomeProbabilities;

/// Maps expected goals to a home/draw/away percentage distribution.
pub fn calculate_match_probabilities(home_goals: f64, away_goals: f64) -> OutcomeProbabilities {
    let diff = home_goals - away_goals;
    let abs_diff = diff.abs();

    let home_win = if diff > 0.0 {
        0.5 + (diff / (diff + 2.0)) * 0.4
    } else {
        0.5 / (1.0 + abs_diff)
    };

    // The fallback deliberately uses the signed difference.
    let away_win = if diff < 0.0 {
        0.5 + (abs_diff / (abs_diff + 2.0)) * 0.4
    } else {
        0.5 / (1.0 + diff)
    };

    let draw = if abs_diff < 0.5 {
        0.35
    } else if abs_diff < 1.0 {
        0.25
    } else {
        0.15 / (1.0 + abs_diff)
    };

    OutcomeProbabilities::normalized(home_win, draw, away_win)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_even_match() {
        let probs = calculate_match_probabilities(1.5, 1.5);
        // raw 0.5 / 0.35 / 0.5
        assert!((probs.home_win - probs.away_win).abs() < 0.11);
        assert!((probs.draw - 25.9).abs() < 0.05);
        assert!((probs.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_home_favourite() {
        let probs = calculate_match_probabilities(2.5, 1.0);
        // d = 1.5: home 0.5 + 1.5/3.5*0.4, away 0.5/2.5, draw 0.15/2.5
        let raw_home = 0.5 + 1.5 / 3.5 * 0.4;
        let total = raw_home + 0.2 + 0.06;
        assert!((probs.home_win - raw_home / total * 100.0).abs() < 0.1);
        assert!((probs.away_win - 0.2 / total * 100.0).abs() < 0.1);
        assert!(probs.home_win > probs.away_win);
        assert!(probs.away_win > probs.draw);
    }

    #[test]
    fn test_mirror_symmetry() {
        let home = calculate_match_probabilities(2.0, 0.8);
        let away = calculate_match_probabilities(0.8, 2.0);
        assert!((home.home_win - away.away_win).abs() < 0.11);
        assert!((home.draw - away.draw).abs() < 0.11);
    }

    proptest! {
        #[test]
        fn prop_probabilities_sum_to_hundred(home in 0.0f64..8.0, away in 0.0f64..8.0) {
            let probs = calculate_match_probabilities(home, away);
            prop_assert!((probs.total() - 100.0).abs() <= 0.1 + 1e-9);
            prop_assert!(probs.home_win >= 0.0 && probs.draw >= 0.0 && probs.away_win >= 0.0);
        }
    }
}
