use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};
use super::params::SimParams;
use super::upset::UpsetRisk;

/// Snapshot of a batting innings, either fresh or taken from a live match.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchState {
    /// Overs bowled as a real number (10.5 = ten and a half overs).
    pub overs: f64,
    pub runs: u32,
    pub wickets: u8,
    /// Chase target; informational only, the trial logic does not read it.
    pub target: Option<u32>,
}

impl MatchState {
    pub fn fresh() -> Self {
        MatchState::default()
    }

    /// Reject states the simulator cannot start from. Completed innings
    /// (all out, or overs exhausted) are valid and simulate as a no-op.
    pub fn validate(&self, params: &SimParams) -> EngineResult<()> {
        if !self.overs.is_finite() || self.overs < 0.0 {
            return Err(EngineError::InvalidState(format!(
                "overs must be a non-negative number, got {}",
                self.overs
            )));
        }
        if self.overs > params.max_overs as f64 {
            return Err(EngineError::InvalidState(format!(
                "overs must not exceed {}, got {}",
                params.max_overs, self.overs
            )));
        }
        if self.wickets > params.max_wickets {
            return Err(EngineError::InvalidState(format!(
                "wickets must not exceed {}, got {}",
                params.max_wickets, self.wickets
            )));
        }
        Ok(())
    }

    /// Legal deliveries already bowled, rounded to the nearest ball.
    pub fn balls_bowled(&self, params: &SimParams) -> u32 {
        let balls = (self.overs * params.balls_per_over as f64).round() as u32;
        balls.min(params.innings_balls())
    }
}

/// One recorded point of a simulated innings path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InningsSample {
    pub overs: f64,
    /// Completed runs, floored like trial totals.
    pub runs: u32,
    pub wickets: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VenueImpact {
    BattingFriendly,
    BowlingFriendly,
    Neutral,
}

impl VenueImpact {
    pub fn from_modifier(modifier: f64) -> Self {
        if modifier > 1.0 {
            VenueImpact::BattingFriendly
        } else if modifier < 1.0 {
            VenueImpact::BowlingFriendly
        } else {
            VenueImpact::Neutral
        }
    }
}

/// Display-only point on the win-probability trend. The values are the final
/// estimate plus noise, not a per-over recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinProbPoint {
    pub over: u32,
    pub team_a: f64,
    pub team_b: f64,
}

/// Multiplicative factors behind team A's projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    /// Par score at this venue (neutral par scaled by the venue modifier).
    pub venue_base: u32,
    /// Team A's baseline relative to the reference rating, 2 decimals.
    pub team_strength_mod: f64,
    pub toss_advantage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub team_a: String,
    pub team_b: String,
    pub winner: String,
    /// Probability for `winner`; always in [0.5, 1.0].
    pub win_probability: f64,
    /// Share of paired trials won by team A.
    pub team_a_win_probability: f64,
    /// Mean final total for team A.
    pub expected_total: f64,
    pub projected_score: u32,
    pub opponent_expected_total: f64,
    pub upset_risk: UpsetRisk,
    pub venue_impact: VenueImpact,
    pub wp_curve: Vec<WinProbPoint>,
    pub breakdown: FactorBreakdown,
    pub trials: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_valid() {
        let params = SimParams::default();
        let s = MatchState::fresh();
        assert!(s.validate(&params).is_ok());
        assert_eq!(s.balls_bowled(&params), 0);
    }

    // The simulator assumes well-formed input, so these are rejected up front
    // rather than clamped.
    #[test]
    fn rejects_negative_overs() {
        let params = SimParams::default();
        let s = MatchState {
            overs: -0.5,
            ..MatchState::fresh()
        };
        assert!(matches!(s.validate(&params), Err(EngineError::InvalidState(_))));
    }

    #[test]
    fn rejects_nan_and_excess_overs() {
        let params = SimParams::default();
        for overs in [f64::NAN, f64::INFINITY, 20.5] {
            let s = MatchState {
                overs,
                ..MatchState::fresh()
            };
            assert!(s.validate(&params).is_err(), "overs {} accepted", overs);
        }
    }

    #[test]
    fn rejects_eleven_wickets() {
        let params = SimParams::default();
        let s = MatchState {
            wickets: 11,
            ..MatchState::fresh()
        };
        assert!(matches!(s.validate(&params), Err(EngineError::InvalidState(_))));
    }

    #[test]
    fn completed_innings_are_valid() {
        let params = SimParams::default();
        let all_out = MatchState {
            overs: 17.0,
            runs: 140,
            wickets: 10,
            target: None,
        };
        let overs_done = MatchState {
            overs: 20.0,
            runs: 180,
            wickets: 4,
            target: None,
        };
        assert!(all_out.validate(&params).is_ok());
        assert!(overs_done.validate(&params).is_ok());
        assert_eq!(overs_done.balls_bowled(&params), 120);
    }

    #[test]
    fn balls_bowled_rounds_to_nearest_delivery() {
        let params = SimParams::default();
        let s = MatchState {
            overs: 10.5,
            ..MatchState::fresh()
        };
        assert_eq!(s.balls_bowled(&params), 63);
    }

    #[test]
    fn venue_impact_labels() {
        assert_eq!(VenueImpact::from_modifier(1.1), VenueImpact::BattingFriendly);
        assert_eq!(VenueImpact::from_modifier(0.9), VenueImpact::BowlingFriendly);
        assert_eq!(VenueImpact::from_modifier(1.0), VenueImpact::Neutral);
    }
}
