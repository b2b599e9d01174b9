//! Upset-risk classification.
//!
//! A match only carries upset risk when the two sides are clearly mismatched
//! on paper (baseline gap above `strength_gap`). Among mismatched fixtures:
//!
//! - **High**: the lower-rated side still wins more than `high_underdog_floor`
//!   of paired trials (default 0.40).
//! - **Medium**: team A's paired-trial probability sits inside the balanced
//!   band `[medium_band_low, medium_band_high]` (default 0.30–0.70).
//! - **Low**: everything else, including every evenly rated fixture.

use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};

/// Ordered risk category: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UpsetRisk {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpsetPolicy {
    /// Baseline rating gap above which a fixture counts as mismatched.
    pub strength_gap: f64,
    /// Underdog win probability above which risk is High.
    pub high_underdog_floor: f64,
    pub medium_band_low: f64,
    pub medium_band_high: f64,
}

impl Default for UpsetPolicy {
    fn default() -> Self {
        UpsetPolicy {
            strength_gap: 1.2,
            high_underdog_floor: 0.4,
            medium_band_low: 0.3,
            medium_band_high: 0.7,
        }
    }
}

impl UpsetPolicy {
    /// Classify a fixture from both baselines and team A's raw paired-trial
    /// win probability.
    pub fn classify(&self, strength_a: f64, strength_b: f64, team_a_prob: f64) -> UpsetRisk {
        if (strength_a - strength_b).abs() <= self.strength_gap {
            return UpsetRisk::Low;
        }
        let underdog_prob = if strength_a < strength_b {
            team_a_prob
        } else {
            1.0 - team_a_prob
        };
        if underdog_prob > self.high_underdog_floor {
            UpsetRisk::High
        } else if (self.medium_band_low..=self.medium_band_high).contains(&team_a_prob) {
            UpsetRisk::Medium
        } else {
            UpsetRisk::Low
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !(self.strength_gap.is_finite() && self.strength_gap >= 0.0) {
            return Err(EngineError::InvalidParams(format!(
                "upset strength_gap must be non-negative, got {}",
                self.strength_gap
            )));
        }
        for (name, value) in [
            ("high_underdog_floor", self.high_underdog_floor),
            ("medium_band_low", self.medium_band_low),
            ("medium_band_high", self.medium_band_high),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::InvalidParams(format!(
                    "upset {} must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }
        if self.medium_band_low > self.medium_band_high {
            return Err(EngineError::InvalidParams(
                "upset medium band is empty (low > high)".into(),
            ));
        }
        Ok(())
    }
}
