//! Match-day condition draws (injuries, suspensions, fatigue, motivation, crowd).

use footy_models::ConditionAdjustment;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Supplies a fresh condition adjustment for a team on every prediction.
pub trait ConditionSource {
    fn condition_for(&mut self, team: &str) -> ConditionAdjustment;
}

/// Draws each factor uniformly from its fixed range.
#[derive(Debug, Clone)]
pub struct RandomConditions<R: Rng = SmallRng> {
    rng: R,
}

impl RandomConditions<SmallRng> {
    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomConditions<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ConditionSource for RandomConditions<R> {
    fn condition_for(&mut self, team: &str) -> ConditionAdjustment {
        simulate_team_condition(team, &mut self.rng)
    }
}

/// Returns the same adjustment for every team.
#[derive(Debug, Clone, Default)]
pub struct FixedConditions(pub ConditionAdjustment);

impl FixedConditions {
    pub fn neutral() -> Self {
        Self(ConditionAdjustment::neutral())
    }
}

impl ConditionSource for FixedConditions {
    fn condition_for(&mut self, _team: &str) -> ConditionAdjustment {
        self.0.clone()
    }
}

pub fn simulate_team_condition<R: Rng + ?Sized>(team: &str, rng: &mut R) -> ConditionAdjustment {
    let injury = rng.gen_range(-0.3..=0.1);
    let suspension = rng.gen_range(-0.2..=0.0);
    let fatigue = rng.gen_range(-0.2..=0.2);
    let motivation = rng.gen_range(-0.1..=0.3);
    let crowd = rng.gen_range(0.0..=0.2);

    let condition = ConditionAdjustment::from_factors(injury, suspension, fatigue, motivation, crowd);
    debug!("🩹 Condition for {}: {:+.3} goals", team, condition.condition_impact);
    condition
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factors_stay_in_range() {
        let mut source = RandomConditions::seeded(7);
        for _ in 0..500 {
            let c = source.condition_for("Genk");
            assert!((-0.3..=0.1).contains(&c.injury_factor));
            assert!((-0.2..=0.0).contains(&c.suspension_factor));
            assert!((-0.2..=0.2).contains(&c.fatigue_factor));
            assert!((-0.1..=0.3).contains(&c.motivation_factor));
            assert!((0.0..=0.2).contains(&c.crowd_factor));
            assert!((-0.5..=0.5).contains(&c.condition_impact));
        }
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let a = RandomConditions::seeded(42).condition_for("Genk");
        let b = RandomConditions::seeded(42).condition_for("Gent");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fixed_conditions() {
        let fixed = ConditionAdjustment::from_factors(-0.1, 0.0, 0.0, 0.0, 0.0);
        let mut source = FixedConditions(fixed.clone());
        assert_eq!(source.condition_for("Genk"), fixed);
        assert_eq!(FixedConditions::neutral().condition_for("Gent").condition_impact, 0.0);
    }
}
