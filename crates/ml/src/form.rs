//! Rolling recent form over a team's last matches.

use std::cmp::Reverse;

use footy_models::{FormSummary, MatchRecord};

pub const DEFAULT_FORM_WINDOW: usize = 5;

/// Points and goals over the `window` most recent matches of `team`.
///
/// The rating divides by the points available over the full window, so a
/// team with fewer recorded matches is rated on what it has played.
pub fn calculate_recent_form(history: &[MatchRecord], team: &str, window: usize) -> FormSummary {
    let mut team_matches: Vec<&MatchRecord> = history.iter().filter(|m| m.involves(team)).collect();
    if team_matches.is_empty() || window == 0 {
        return FormSummary::neutral();
    }
    team_matches.sort_by_key(|m| Reverse(m.date));

    let mut form = FormSummary {
        points: 0,
        goals_for: 0,
        goals_against: 0,
        form_rating: FormSummary::NEUTRAL_RATING,
        matches_played: 0,
    };

    for m in team_matches.into_iter().take(window) {
        let (scored, conceded) = m.goals_for(team);
        form.goals_for += u32::from(scored);
        form.goals_against += u32::from(conceded);
        form.matches_played += 1;
        form.points += match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => 3,
            std::cmp::Ordering::Equal => 1,
            std::cmp::Ordering::Less => 0,
        };
    }

    let max_points = window as f64 * 3.0;
    form.form_rating = f64::from(form.points) / max_points;
    form
}
