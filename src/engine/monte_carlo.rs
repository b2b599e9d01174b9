//! Monte Carlo aggregation of paired innings simulations into a match
//! prediction.
//!
//! Both sides bat `params.trials` independent innings. Trial *i* of team A
//! is compared with trial *i* of team B. This is an approximation: the two
//! draws are independent, not a joint model of a chase. A tie counts as a
//! non-win for team A.

use rand::Rng;
use tracing::{debug, info};

use super::error::EngineResult;
use super::innings::InningsSimulator;
use super::models::{
    FactorBreakdown, InningsSample, MatchState, PredictionResult, VenueImpact, WinProbPoint,
};
use super::params::SimParams;
use super::resolver::{ContextResolver, TeamContext};
use crate::reference::ReferenceData;

/// A fully specified prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRequest {
    pub team_a: String,
    pub team_b: String,
    pub venue: Option<String>,
    pub toss_winner: Option<String>,
    /// Team A's in-progress innings; `None` starts from a fresh state.
    pub live_state: Option<MatchState>,
}

impl MatchRequest {
    pub fn new(team_a: impl Into<String>, team_b: impl Into<String>) -> Self {
        MatchRequest {
            team_a: team_a.into(),
            team_b: team_b.into(),
            venue: None,
            toss_winner: None,
            live_state: None,
        }
    }
}

pub struct MatchPredictor {
    resolver: ContextResolver,
    params: SimParams,
}

impl MatchPredictor {
    pub fn new(reference: ReferenceData, params: SimParams) -> EngineResult<Self> {
        params.validate()?;
        let resolver = ContextResolver::new(reference, &params)?;
        Ok(MatchPredictor { resolver, params })
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn resolver(&self) -> &ContextResolver {
        &self.resolver
    }

    /// From-scratch prediction: fresh innings, neutral venue, no toss.
    pub fn predict<R: Rng>(&self, team_a: &str, team_b: &str, rng: &mut R) -> PredictionResult {
        let ctx_a = self.resolver.resolve(team_a, None, None);
        let ctx_b = self.resolver.resolve(team_b, None, None);
        self.aggregate(&ctx_a, &ctx_b, &MatchState::fresh(), rng)
    }

    /// Context-aware prediction with optional venue, toss winner and live
    /// state for team A. Team B always bats from a fresh state.
    pub fn predict_with_context<R: Rng>(
        &self,
        request: &MatchRequest,
        rng: &mut R,
    ) -> EngineResult<PredictionResult> {
        let start = request.live_state.clone().unwrap_or_default();
        start.validate(&self.params)?;

        let venue = request.venue.as_deref();
        let toss_winner = request.toss_winner.as_deref();
        let ctx_a = self.resolver.resolve(&request.team_a, venue, toss_winner);
        let ctx_b = self.resolver.resolve(&request.team_b, venue, toss_winner);
        Ok(self.aggregate(&ctx_a, &ctx_b, &start, rng))
    }

    /// Final totals of `params.trials` independent innings for one side.
    pub fn simulate_side<R: Rng>(
        &self,
        ctx: &TeamContext,
        start: &MatchState,
        rng: &mut R,
    ) -> Vec<u32> {
        let sim = InningsSimulator::new(&self.params, ctx.drift_rate());
        (0..self.params.trials)
            .map(|_| sim.simulate(start, rng))
            .collect()
    }

    /// One recorded innings path for charting.
    pub fn sample_path<R: Rng>(
        &self,
        ctx: &TeamContext,
        start: &MatchState,
        rng: &mut R,
    ) -> EngineResult<Vec<InningsSample>> {
        start.validate(&self.params)?;
        let sim = InningsSimulator::new(&self.params, ctx.drift_rate());
        Ok(sim.simulate_path(start, rng))
    }

    fn aggregate<R: Rng>(
        &self,
        ctx_a: &TeamContext,
        ctx_b: &TeamContext,
        start_a: &MatchState,
        rng: &mut R,
    ) -> PredictionResult {
        let sim_a = self.simulate_side(ctx_a, start_a, rng);
        let sim_b = self.simulate_side(ctx_b, &MatchState::fresh(), rng);

        let expected_a = mean(&sim_a);
        let expected_b = mean(&sim_b);
        let p_a = paired_win_rate(&sim_a, &sim_b);
        debug!(
            "{}: drift {:.3}, expected {:.1} | {}: drift {:.3}, expected {:.1}",
            ctx_a.name,
            ctx_a.drift_rate(),
            expected_a,
            ctx_b.name,
            ctx_b.drift_rate(),
            expected_b
        );

        let (winner, win_probability) = if p_a > 0.5 {
            (ctx_a.name.clone(), p_a)
        } else {
            (ctx_b.name.clone(), 1.0 - p_a)
        };
        let upset_risk =
            self.params
                .upset
                .classify(ctx_a.base_strength, ctx_b.base_strength, p_a);
        let wp_curve = win_prob_curve(p_a, &self.params, rng);

        info!(
            "Prediction {} vs {}: {} at {:.3} over {} trials (upset risk {:?})",
            ctx_a.name, ctx_b.name, winner, win_probability, self.params.trials, upset_risk
        );

        PredictionResult {
            team_a: ctx_a.name.clone(),
            team_b: ctx_b.name.clone(),
            winner,
            win_probability,
            team_a_win_probability: p_a,
            expected_total: expected_a,
            projected_score: expected_a.floor() as u32,
            opponent_expected_total: expected_b,
            upset_risk,
            venue_impact: VenueImpact::from_modifier(ctx_a.venue_modifier),
            wp_curve,
            breakdown: FactorBreakdown {
                venue_base: (self.params.venue_base_score * ctx_a.venue_modifier).floor() as u32,
                team_strength_mod: round2(ctx_a.base_strength / self.params.strength_reference),
                toss_advantage: ctx_a.toss_bias,
            },
            trials: self.params.trials,
        }
    }
}

fn mean(totals: &[u32]) -> f64 {
    if totals.is_empty() {
        return 0.0;
    }
    totals.iter().map(|&t| t as f64).sum::<f64>() / totals.len() as f64
}

/// Share of index-paired trials in which `a` strictly outscores `b`.
fn paired_win_rate(a: &[u32], b: &[u32]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.5;
    }
    let wins = a.iter().zip(b).filter(|(x, y)| x > y).count();
    wins as f64 / n as f64
}

/// One point per over boundary (0..=max_overs): the final estimate plus
/// symmetric noise, clamped to [0, 1]. A display trend only.
fn win_prob_curve<R: Rng>(p_a: f64, params: &SimParams, rng: &mut R) -> Vec<WinProbPoint> {
    (0..=params.max_overs)
        .map(|over| {
            let jitter = (rng.gen::<f64>() - 0.5) * params.curve_noise;
            let team_a = (p_a + jitter).clamp(0.0, 1.0);
            WinProbPoint {
                over,
                team_a,
                team_b: 1.0 - team_a,
            }
        })
        .collect()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
