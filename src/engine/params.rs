//! Tunable constants of the innings model.
//!
//! Every number that shapes a simulation lives here so that alternative
//! calibrations are a matter of configuration, not code. Values can be
//! overridden from a JSON file; missing keys keep their defaults.

use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};
use super::upset::UpsetPolicy;

/// Upper bound on `balls_per_over * max_overs`; a 50-over innings is 300.
pub const MAX_INNINGS_BALLS: u32 = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Legal deliveries per over; one simulation step per delivery.
    pub balls_per_over: u32,
    /// Innings length in overs.
    pub max_overs: u32,
    /// Dismissals that end an innings.
    pub max_wickets: u8,
    /// Width of the zero-mean uniform noise added to each delivery's runs.
    pub volatility: f64,
    /// Per-delivery wicket probability at the start of the innings.
    pub wicket_base_rate: f64,
    /// Relative increase of the wicket probability by the final delivery.
    /// Wicket risk is `base * (1 + ramp * elapsed_fraction)`.
    pub wicket_ramp: f64,
    /// Multiplier applied to the toss winner's drift.
    pub toss_bias: f64,
    /// Form multiplier for a roster whose average form index is 0.
    pub form_floor: f64,
    /// Added to `form_floor` per unit of average form index.
    pub form_span: f64,
    /// Strength used for teams missing from the reference table.
    pub default_strength: f64,
    /// Independent innings simulated per side.
    pub trials: usize,
    /// Width of the symmetric display noise on the win-probability curve.
    pub curve_noise: f64,
    /// Par first-innings score on a neutral pitch, used in the breakdown.
    pub venue_base_score: f64,
    /// Strength rating treated as a 1.0 multiplier in the breakdown.
    pub strength_reference: f64,
    pub upset: UpsetPolicy,
}

impl Default for SimParams {
    fn default() -> Self {
        SimParams {
            balls_per_over: 6,
            max_overs: 20,
            max_wickets: 10,
            volatility: 0.7,
            wicket_base_rate: 0.03,
            wicket_ramp: 1.0,
            toss_bias: 1.05,
            form_floor: 0.95,
            form_span: 0.1,
            default_strength: 7.0,
            trials: 1000,
            curve_noise: 0.1,
            venue_base_score: 160.0,
            strength_reference: 8.0,
            upset: UpsetPolicy::default(),
        }
    }
}

impl SimParams {
    /// Total legal deliveries in a full innings.
    pub fn innings_balls(&self) -> u32 {
        self.balls_per_over * self.max_overs
    }

    /// Fraction of an over represented by one simulation step.
    pub fn step_overs(&self) -> f64 {
        1.0 / self.balls_per_over as f64
    }

    /// Wicket probability for the delivery bowled after `balls_bowled`.
    /// Non-decreasing in `balls_bowled` for any non-negative ramp.
    pub fn wicket_probability(&self, balls_bowled: u32) -> f64 {
        let elapsed = balls_bowled as f64 / self.innings_balls() as f64;
        (self.wicket_base_rate * (1.0 + self.wicket_ramp * elapsed)).clamp(0.0, 1.0)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.balls_per_over == 0 {
            return Err(EngineError::InvalidParams(
                "balls_per_over must be positive".into(),
            ));
        }
        if self.max_overs == 0 {
            return Err(EngineError::InvalidParams("max_overs must be positive".into()));
        }
        match self.balls_per_over.checked_mul(self.max_overs) {
            Some(balls) if balls <= MAX_INNINGS_BALLS => {}
            _ => {
                return Err(EngineError::InvalidParams(format!(
                    "innings of {} overs x {} balls exceeds {} deliveries",
                    self.max_overs, self.balls_per_over, MAX_INNINGS_BALLS
                )));
            }
        }
        if self.max_wickets == 0 {
            return Err(EngineError::InvalidParams(
                "max_wickets must be positive".into(),
            ));
        }
        if self.trials == 0 {
            return Err(EngineError::InvalidParams("trials must be positive".into()));
        }
        if !(self.volatility.is_finite() && self.volatility >= 0.0) {
            return Err(EngineError::InvalidParams(format!(
                "volatility must be non-negative, got {}",
                self.volatility
            )));
        }
        if !(0.0..=1.0).contains(&self.wicket_base_rate) {
            return Err(EngineError::InvalidParams(format!(
                "wicket_base_rate must be between 0.0 and 1.0, got {}",
                self.wicket_base_rate
            )));
        }
        if !(self.wicket_ramp.is_finite() && self.wicket_ramp >= 0.0) {
            return Err(EngineError::InvalidParams(format!(
                "wicket_ramp must be non-negative, got {}",
                self.wicket_ramp
            )));
        }
        for (name, value) in [
            ("toss_bias", self.toss_bias),
            ("form_floor", self.form_floor),
            ("default_strength", self.default_strength),
            ("venue_base_score", self.venue_base_score),
            ("strength_reference", self.strength_reference),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(EngineError::InvalidParams(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !(self.form_span.is_finite() && self.form_span >= 0.0) {
            return Err(EngineError::InvalidParams(format!(
                "form_span must be non-negative, got {}",
                self.form_span
            )));
        }
        if !(self.curve_noise.is_finite() && self.curve_noise >= 0.0) {
            return Err(EngineError::InvalidParams(format!(
                "curve_noise must be non-negative, got {}",
                self.curve_noise
            )));
        }
        self.upset.validate()
    }
}
