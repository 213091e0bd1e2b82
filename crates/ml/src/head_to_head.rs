//! Direct confrontations between two teams, symmetrised to the current venue.

use std::cmp::Reverse;

use footy_models::{round_to, FormLetter, H2HAdvantage, H2HSummary, MatchRecord};
use tracing::debug;

use crate::team_stats::{count_u32, mean};

pub const DEFAULT_H2H_LOOKBACK: usize = 10;
const RECENT_FORM_LEN: usize = 5;

/// Statistics over the last `lookback` meetings of `home_team` and
/// `away_team`, counted from `home_team`'s point of view whichever side it
/// occupied historically.
pub fn head_to_head(history: &[MatchRecord], home_team: &str, away_team: &str, lookback: usize) -> H2HSummary {
    let mut meetings: Vec<&MatchRecord> = history
        .iter()
        .filter(|m| m.is_between(home_team, away_team))
        .collect();
    meetings.sort_by_key(|m| Reverse(m.date));
    meetings.truncate(lookback);

    if meetings.is_empty() {
        debug!("🆚 No head-to-head history for {} vs {}", home_team, away_team);
        return H2HSummary::empty();
    }

    let mut summary = H2HSummary {
        total_matches: count_u32(meetings.len()),
        has_data: true,
        ..H2HSummary::default()
    };
    let mut goals_home = Vec::with_capacity(meetings.len());
    let mut goals_away = Vec::with_capacity(meetings.len());
    let mut form = Vec::with_capacity(meetings.len());

    for m in &meetings {
        let (scored, conceded) = m.goals_for(home_team);
        goals_home.push(f64::from(scored));
        goals_away.push(f64::from(conceded));

        let letter = match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => {
                summary.home_wins += 1;
                FormLetter::Win
            }
            std::cmp::Ordering::Less => {
                summary.away_wins += 1;
                FormLetter::Loss
            }
            std::cmp::Ordering::Equal => {
                summary.draws += 1;
                FormLetter::Draw
            }
        };
        form.push(letter);
    }

    let home_percentage = f64::from(summary.home_wins) / f64::from(summary.total_matches) * 100.0;
    summary.advantage = H2HAdvantage::from_home_percentage(home_percentage);
    summary.home_percentage = round_to(home_percentage, 1);
    summary.avg_goals_home = round_to(mean(&goals_home), 2);
    summary.avg_goals_away = round_to(mean(&goals_away), 2);
    form.truncate(RECENT_FORM_LEN);
    summary.recent_form = form;

    debug!(
        "🆚 {} vs {}: {} meetings, {}W {}D {}L ({})",
        home_team,
        away_team,
        summary.total_matches,
        summary.home_wins,
        summary.draws,
        summary.away_wins,
        summary.advantage
    );
    summary
}
