use serde::{Deserialize, Serialize};

/// Baseline rating for a national side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRating {
    pub name: String,
    /// Roughly 6.0 (associate) to 9.2 (top-ranked).
    pub strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerRole {
    Batter,
    Bowler,
    AllRounder,
}

/// Roster entry. Only `form_index` feeds the engine; xR/xW are carried for
/// consumers that render player cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub team: String,
    pub role: PlayerRole,
    /// xR: expected runs per ball faced
    pub expected_runs_per_ball: f64,
    /// xW: expected wickets per ball bowled
    pub expected_wickets_per_ball: f64,
    /// Recent form, 0.0 (out of form) to 1.0 (peak)
    pub form_index: f64,
}

/// Ground with its batting-friendliness modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub city: String,
    /// >1.0 favours batting, <1.0 favours bowling.
    pub batting_modifier: f64,
}
