use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::engine::{MatchRequest, MatchState, SimParams};

/// Monte Carlo T20 match predictor
#[derive(Parser, Debug, Clone)]
#[command(name = "cricket-oracle", version, about)]
pub struct Config {
    /// First team (the side whose live innings, if any, is projected)
    #[arg(long, env = "TEAM_A")]
    pub team_a: String,

    /// Second team
    #[arg(long, env = "TEAM_B")]
    pub team_b: String,

    /// Venue name or city (fuzzy matched; unknown venues play neutral)
    #[arg(long, env = "VENUE")]
    pub venue: Option<String>,

    /// Team that won the toss
    #[arg(long, env = "TOSS_WINNER")]
    pub toss_winner: Option<String>,

    /// Live state: overs bowled in team A's innings (e.g. 10.5)
    #[arg(long, env = "LIVE_OVERS")]
    pub overs: Option<f64>,

    /// Live state: runs scored by team A
    #[arg(long, env = "LIVE_RUNS")]
    pub runs: Option<u32>,

    /// Live state: wickets lost by team A
    #[arg(long, env = "LIVE_WICKETS")]
    pub wickets: Option<u8>,

    /// Live state: chase target (informational)
    #[arg(long, env = "LIVE_TARGET")]
    pub target: Option<u32>,

    /// Trials per side (overrides the params file)
    #[arg(long, env = "TRIALS")]
    pub trials: Option<usize>,

    /// RNG seed; a random seed is drawn and logged when omitted
    #[arg(long, env = "SEED")]
    pub seed: Option<u64>,

    /// JSON file with teams/players/venues tables (defaults to built-in tables)
    #[arg(long, env = "REFERENCE_DATA")]
    pub reference_data: Option<PathBuf>,

    /// JSON file overriding simulation constants
    #[arg(long, env = "SIM_PARAMS")]
    pub params: Option<PathBuf>,

    /// Also print one simulated innings path for team A
    #[arg(long, env = "SHOW_PATH", default_value = "false")]
    pub show_path: bool,

    /// Pretty-print JSON output
    #[arg(long, env = "PRETTY", default_value = "false")]
    pub pretty: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.team_a.trim().is_empty() || self.team_b.trim().is_empty() {
            anyhow::bail!("team names must not be empty");
        }
        if self.team_a.trim().eq_ignore_ascii_case(self.team_b.trim()) {
            anyhow::bail!("team_a and team_b must be different teams");
        }
        if self.trials == Some(0) {
            anyhow::bail!("trials must be positive");
        }
        if self.target.is_some() && !self.has_live_state() {
            anyhow::bail!("target needs a live state (--overs, --runs or --wickets)");
        }
        Ok(())
    }

    fn has_live_state(&self) -> bool {
        self.overs.is_some() || self.runs.is_some() || self.wickets.is_some()
    }

    /// Team A's live innings, with unspecified fields defaulting to zero.
    pub fn live_state(&self) -> Option<MatchState> {
        if !self.has_live_state() {
            return None;
        }
        Some(MatchState {
            overs: self.overs.unwrap_or(0.0),
            runs: self.runs.unwrap_or(0),
            wickets: self.wickets.unwrap_or(0),
            target: self.target,
        })
    }

    /// Whether any venue, toss or live input was supplied.
    pub fn has_context(&self) -> bool {
        self.venue.is_some() || self.toss_winner.is_some() || self.has_live_state()
    }

    pub fn match_request(&self) -> MatchRequest {
        let mut request = MatchRequest::new(self.team_a.trim(), self.team_b.trim());
        request.venue = self.venue.clone();
        request.toss_winner = self.toss_winner.clone();
        request.live_state = self.live_state();
        request
    }

    pub fn load_params(&self) -> anyhow::Result<SimParams> {
        let mut params = match &self.params {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read params file {}", path.display()))?;
                serde_json::from_str::<SimParams>(&content)
                    .context("Failed to parse simulation params JSON")?
            }
            None => SimParams::default(),
        };
        if let Some(trials) = self.trials {
            params.trials = trials;
        }
        Ok(params)
    }
}
