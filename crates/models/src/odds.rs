use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FootyError, Result};
use crate::predictions::OutcomeProbabilities;

/// Decimal 1X2 odds quoted by a bookmaker for a match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmakerOdds {
    pub home_win: Decimal,
    pub draw: Decimal,
    pub away_win: Decimal,
}

impl BookmakerOdds {
    pub fn new(home_win: Decimal, draw: Decimal, away_win: Decimal) -> Self {
        Self { home_win, draw, away_win }
    }

    /// Prices a percentage distribution with a bookmaker margin (overround).
    pub fn from_probabilities(probabilities: &OutcomeProbabilities, margin: f64) -> Result<Self> {
        let total = probabilities.total();
        if total <= 0.0 {
            return Err(FootyError::InvalidProbability { prob: total });
        }
        let adjusted_total = 1.0 + margin;

        let price = |pct: f64, fallback: i64| {
            let adjusted = (pct / total) * adjusted_total;
            if adjusted <= 0.0 {
                return Decimal::from(fallback);
            }
            Decimal::from_f64_retain(1.0 / adjusted)
                .map(|d| d.round_dp(2))
                .unwrap_or_else(|| Decimal::from(fallback))
        };

        Ok(Self {
            home_win: price(probabilities.home_win, 2),
            draw: price(probabilities.draw, 3),
            away_win: price(probabilities.away_win, 2),
        })
    }

    fn raw_implied(&self) -> Result<(f64, f64, f64)> {
        let invert = |odds: Decimal| -> Result<f64> {
            if odds <= Decimal::ONE {
                return Err(FootyError::InvalidOdds(format!("decimal odds must exceed 1.0, got {odds}")));
            }
            odds.to_f64()
                .map(|o| 1.0 / o)
                .ok_or_else(|| FootyError::InvalidOdds(odds.to_string()))
        };
        Ok((invert(self.home_win)?, invert(self.draw)?, invert(self.away_win)?))
    }

    /// Sum of the raw implied probabilities; above 1.0 is the bookmaker's margin.
    pub fn overround(&self) -> Result<f64> {
        let (home, draw, away) = self.raw_implied()?;
        Ok(home + draw + away)
    }

    /// Implied outcome percentages with the margin removed.
    pub fn implied_probabilities(&self) -> Result<OutcomeProbabilities> {
        let (home, draw, away) = self.raw_implied()?;
        Ok(OutcomeProbabilities::normalized(home, draw, away))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_implied_probabilities() {
        let odds = BookmakerOdds::new(dec!(2.0), dec!(4.0), dec!(4.0));
        let probs = odds.implied_probabilities().unwrap();
        assert!((probs.home_win - 50.0).abs() < 0.001);
        assert!((probs.draw - 25.0).abs() < 0.001);
        assert!((probs.away_win - 25.0).abs() < 0.001);
        assert!((odds.overround().unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overround_with_margin() {
        let odds = BookmakerOdds::new(dec!(1.90), dec!(3.40), dec!(4.20));
        let overround = odds.overround().unwrap();
        assert!(overround > 1.0);
        assert!(overround < 1.1);
    }

    #[test]
    fn test_invalid_odds() {
        let odds = BookmakerOdds::new(dec!(1.0), dec!(3.0), dec!(4.0));
        assert!(odds.implied_probabilities().is_err());
    }

    #[test]
    fn test_from_probabilities_with_margin() {
        let probs = OutcomeProbabilities { home_win: 40.0, draw: 30.0, away_win: 30.0 };
        let odds = BookmakerOdds::from_probabilities(&probs, 0.05).unwrap();

        // Fair odds for 40% = 2.5, the margin shortens them
        assert!(odds.home_win < dec!(2.5));
        assert!(odds.home_win > dec!(2.0));
        assert!(odds.overround().unwrap() > 1.0);
    }
}
