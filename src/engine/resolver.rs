//! Strength/context resolution: turns a team name plus match context into the
//! scalar scoring rate that drives the innings simulator.
//!
//! Nothing here rejects input. Unknown teams get the default strength, teams
//! without roster entries get a neutral form multiplier and unmatched venues
//! play as neutral.

use std::collections::HashMap;

use tracing::debug;

use super::error::EngineResult;
use super::params::SimParams;
use crate::reference::{ReferenceData, Venue};

/// Every multiplicative factor applied to one side for one match.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamContext {
    pub name: String,
    pub base_strength: f64,
    pub form_multiplier: f64,
    pub venue_modifier: f64,
    pub toss_bias: f64,
}

impl TeamContext {
    /// Expected runs per over at full batting strength.
    pub fn drift_rate(&self) -> f64 {
        self.base_strength * self.venue_modifier * self.form_multiplier * self.toss_bias
    }
}

pub struct ContextResolver {
    /// normalized team name -> baseline strength
    strengths: HashMap<String, f64>,
    /// normalized team name -> average roster form index
    average_form: HashMap<String, f64>,
    venues: Vec<Venue>,
    default_strength: f64,
    form_floor: f64,
    form_span: f64,
    toss_bias: f64,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl ContextResolver {
    pub fn new(reference: ReferenceData, params: &SimParams) -> EngineResult<Self> {
        reference.validate()?;

        let strengths = reference
            .teams
            .iter()
            .map(|t| (normalize(&t.name), t.strength))
            .collect();

        let mut form_sums: HashMap<String, (f64, usize)> = HashMap::new();
        for p in &reference.players {
            let entry = form_sums.entry(normalize(&p.team)).or_insert((0.0, 0));
            entry.0 += p.form_index;
            entry.1 += 1;
        }
        let average_form = form_sums
            .into_iter()
            .map(|(team, (sum, n))| (team, sum / n as f64))
            .collect();

        Ok(ContextResolver {
            strengths,
            average_form,
            venues: reference.venues,
            default_strength: params.default_strength,
            form_floor: params.form_floor,
            form_span: params.form_span,
            toss_bias: params.toss_bias,
        })
    }

    pub fn base_strength(&self, team: &str) -> f64 {
        match self.strengths.get(&normalize(team)) {
            Some(s) => *s,
            None => {
                debug!(
                    "Unknown team '{}', using default strength {:.2}",
                    team, self.default_strength
                );
                self.default_strength
            }
        }
    }

    /// `form_floor + form_span * avg_form`; exactly 1.0 with no roster entries.
    pub fn form_multiplier(&self, team: &str) -> f64 {
        self.average_form
            .get(&normalize(team))
            .map(|avg| self.form_floor + self.form_span * avg)
            .unwrap_or(1.0)
    }

    /// Case-insensitive substring match of the supplied venue against each
    /// table entry's name, then its city. First match wins.
    pub fn venue_modifier(&self, venue: Option<&str>) -> f64 {
        let Some(venue) = venue else {
            return 1.0;
        };
        let haystack = venue.to_lowercase();
        let found = self.venues.iter().find(|v| {
            let name = v.name.to_lowercase();
            let city = v.city.to_lowercase();
            (!name.is_empty() && haystack.contains(&name))
                || (!city.is_empty() && haystack.contains(&city))
        });
        match found {
            Some(v) => v.batting_modifier,
            None => {
                debug!("No venue match for '{}', playing as neutral", venue);
                1.0
            }
        }
    }

    pub fn toss_bias(&self, team: &str, toss_winner: Option<&str>) -> f64 {
        match toss_winner {
            Some(winner) if normalize(winner) == normalize(team) => self.toss_bias,
            _ => 1.0,
        }
    }

    pub fn resolve(&self, team: &str, venue: Option<&str>, toss_winner: Option<&str>) -> TeamContext {
        TeamContext {
            name: team.to_string(),
            base_strength: self.base_strength(team),
            form_multiplier: self.form_multiplier(team),
            venue_modifier: self.venue_modifier(venue),
            toss_bias: self.toss_bias(team, toss_winner),
        }
    }
}
