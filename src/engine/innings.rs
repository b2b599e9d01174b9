//! Ball-by-ball innings simulator.
//!
//! The score follows a discretised SDE with a jump process on top:
//!
//!   runs(t+dt) = runs(t) + max(0, μ·dt·(10 − w)/10 + σ·U(−½, ½))
//!
//! where μ is the side's resolved drift rate (runs per over) and dt is one
//! delivery. Before any runs accrue, a wicket is drawn with probability
//! `base · (1 + ramp · elapsed_fraction)`. A wicket ball scores nothing.
//!
//! Time is tracked in whole deliveries, so a 20-over innings takes at most
//! 120 steps and always ends exactly at the over limit or at all out.

use rand::Rng;

use super::models::{InningsSample, MatchState};
use super::params::SimParams;

/// Mutable per-trial state. Each trial owns its own copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InningsState {
    pub balls: u32,
    pub runs: f64,
    pub wickets: u8,
}

impl InningsState {
    pub fn from_match_state(state: &MatchState, params: &SimParams) -> Self {
        InningsState {
            balls: state.balls_bowled(params),
            runs: state.runs as f64,
            wickets: state.wickets.min(params.max_wickets),
        }
    }

    pub fn is_terminal(&self, params: &SimParams) -> bool {
        self.wickets >= params.max_wickets || self.balls >= params.innings_balls()
    }

    pub fn overs(&self, params: &SimParams) -> f64 {
        self.balls as f64 * params.step_overs()
    }

    /// Completed runs; fractional expected runs are dropped.
    pub fn total(&self) -> u32 {
        self.runs.floor() as u32
    }

    pub fn sample(&self, params: &SimParams) -> InningsSample {
        InningsSample {
            overs: self.overs(params),
            runs: self.total(),
            wickets: self.wickets,
        }
    }
}

/// Advance one delivery. Terminal states are returned unchanged.
pub fn step<R: Rng>(
    state: InningsState,
    drift_rate: f64,
    params: &SimParams,
    rng: &mut R,
) -> InningsState {
    if state.is_terminal(params) {
        return state;
    }

    let mut next = state;
    if rng.gen::<f64>() < params.wicket_probability(state.balls) {
        next.wickets += 1;
    } else {
        let max_wickets = params.max_wickets as f64;
        let pressure = (max_wickets - state.wickets as f64) / max_wickets;
        let drift = drift_rate * pressure / params.balls_per_over as f64;
        let noise = (rng.gen::<f64>() - 0.5) * params.volatility;
        next.runs += (drift + noise).max(0.0);
    }
    next.balls += 1;
    next
}

/// Runs innings for one side at a fixed drift rate.
pub struct InningsSimulator<'a> {
    params: &'a SimParams,
    drift_rate: f64,
}

impl<'a> InningsSimulator<'a> {
    pub fn new(params: &'a SimParams, drift_rate: f64) -> Self {
        InningsSimulator { params, drift_rate }
    }

    /// Simulate from `start` to completion and return the final total.
    pub fn simulate<R: Rng>(&self, start: &MatchState, rng: &mut R) -> u32 {
        self.run(start, rng, |_| {}).total()
    }

    /// Like [`simulate`](Self::simulate) but records every state, starting
    /// with `start` itself.
    pub fn simulate_path<R: Rng>(
        &self,
        start: &MatchState,
        rng: &mut R,
    ) -> Vec<InningsSample> {
        let mut path = Vec::with_capacity(self.params.innings_balls() as usize + 1);
        self.run(start, rng, |s| path.push(s.sample(self.params)));
        path
    }

    fn run<R: Rng>(
        &self,
        start: &MatchState,
        rng: &mut R,
        mut record: impl FnMut(&InningsState),
    ) -> InningsState {
        let mut state = InningsState::from_match_state(start, self.params);
        record(&state);
        while !state.is_terminal(self.params) {
            state = step(state, self.drift_rate, self.params, rng);
            record(&state);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn live(overs: f64, runs: u32, wickets: u8) -> MatchState {
        MatchState {
            overs,
            runs,
            wickets,
            target: None,
        }
    }

    #[test]
    fn terminal_state_is_a_no_op() {
        let params = SimParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let all_out = InningsState {
            balls: 70,
            runs: 101.0,
            wickets: 10,
        };
        assert_eq!(step(all_out, 9.0, &params, &mut rng), all_out);

        let sim = InningsSimulator::new(&params, 9.0);
        assert_eq!(sim.simulate(&live(20.0, 187, 3), &mut rng), 187);
        assert_eq!(sim.simulate(&live(12.0, 95, 10), &mut rng), 95);
    }

    #[test]
    fn terminates_within_innings_length() {
        let params = SimParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let sim = InningsSimulator::new(&params, 8.5);
        for start_balls in (0..120).step_by(7) {
            for wickets in [0u8, 4, 9] {
                let start = live(start_balls as f64 / 6.0, 0, wickets);
                let path = sim.simulate_path(&start, &mut rng);
                let steps = path.len() - 1;
                assert!(steps <= (120 - start_balls) as usize);
                let last = path.last().expect("non-empty path");
                assert!(
                    last.wickets == 10 || (last.overs - 20.0).abs() < 1e-9,
                    "not terminal: {:?}",
                    last
                );
            }
        }
    }

    #[test]
    fn runs_and_wickets_never_decrease() {
        let params = SimParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let sim = InningsSimulator::new(&params, 9.6);
        for _ in 0..200 {
            let path = sim.simulate_path(&MatchState::fresh(), &mut rng);
            for pair in path.windows(2) {
                assert!(pair[1].runs >= pair[0].runs);
                assert!(pair[1].wickets >= pair[0].wickets);
                assert!(pair[1].wickets <= 10);
                assert!(pair[1].overs > pair[0].overs);
            }
        }
    }

    #[test]
    fn live_start_keeps_runs_and_overs() {
        let params = SimParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let sim = InningsSimulator::new(&params, 8.0);
        let start = live(10.0, 90, 2);
        for _ in 0..200 {
            let path = sim.simulate_path(&start, &mut rng);
            assert_relative_eq!(path[0].overs, 10.0, epsilon = 1e-9);
            assert_eq!(path[0].runs, 90);
            assert_eq!(path[0].wickets, 2);
            assert!(path.len() <= 61);
            assert!(sim.simulate(&start, &mut rng) >= 90);
        }
    }

    #[test]
    fn noiseless_innings_without_wickets_scores_the_drift() {
        let params = SimParams {
            wicket_base_rate: 0.0,
            volatility: 0.0,
            ..SimParams::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        // 6 runs an over = one run a ball, 120 balls.
        let sim = InningsSimulator::new(&params, 6.0);
        assert_eq!(sim.simulate(&MatchState::fresh(), &mut rng), 120);
    }

    #[test]
    fn certain_wickets_end_innings_after_ten_balls() {
        let params = SimParams {
            wicket_base_rate: 1.0,
            ..SimParams::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let sim = InningsSimulator::new(&params, 12.0);
        let path = sim.simulate_path(&MatchState::fresh(), &mut rng);
        let last = path.last().expect("non-empty path");
        assert_eq!(last.wickets, 10);
        assert_eq!(path.len(), 11);
        assert_eq!(last.runs, 0);
    }

    #[test]
    fn wicket_pressure_shrinks_drift() {
        let params = SimParams {
            wicket_base_rate: 0.0,
            volatility: 0.0,
            ..SimParams::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let fresh = InningsState {
            balls: 0,
            runs: 0.0,
            wickets: 0,
        };
        let eight_down = InningsState {
            wickets: 8,
            ..fresh
        };
        let a = step(fresh, 6.0, &params, &mut rng);
        let b = step(eight_down, 6.0, &params, &mut rng);
        assert_relative_eq!(a.runs, 1.0, epsilon = 1e-12);
        assert_relative_eq!(b.runs, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn recorded_path_ends_on_simulated_total() {
        let params = SimParams::default();
        let sim = InningsSimulator::new(&params, 9.2);
        for seed in 0..50 {
            let start = live(6.0, 41, 1);
            let path = sim.simulate_path(&start, &mut ChaCha8Rng::seed_from_u64(seed));
            let total = sim.simulate(&start, &mut ChaCha8Rng::seed_from_u64(seed));
            let last = path.last().expect("non-empty path");
            assert_eq!(last.runs, total, "seed {}", seed);
        }
    }

    #[test]
    fn seeded_paths_are_reproducible() {
        let params = SimParams::default();
        let sim = InningsSimulator::new(&params, 8.4);
        let a = sim.simulate_path(&MatchState::fresh(), &mut ChaCha8Rng::seed_from_u64(11));
        let b = sim.simulate_path(&MatchState::fresh(), &mut ChaCha8Rng::seed_from_u64(11));
        assert_eq!(a, b);
    }
}
