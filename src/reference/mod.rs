use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::error::{EngineError, EngineResult};

pub mod models;
pub use models::*;

/// Read-only lookup tables consumed by the context resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceData {
    pub teams: Vec<TeamRating>,
    pub players: Vec<Player>,
    /// Searched in order; the first substring match wins.
    pub venues: Vec<Venue>,
}

impl ReferenceData {
    /// Tables shipped with the binary.
    pub fn builtin() -> Self {
        let teams = [
            ("India", 9.2),
            ("Australia", 8.9),
            ("England", 8.6),
            ("South Africa", 8.4),
            ("Pakistan", 8.0),
            ("New Zealand", 8.2),
            ("West Indies", 7.8),
            ("Afghanistan", 7.5),
            ("Sri Lanka", 7.7),
            ("Bangladesh", 7.0),
            ("USA", 6.0),
            ("Netherlands", 6.5),
        ]
        .into_iter()
        .map(|(name, strength)| TeamRating {
            name: name.to_string(),
            strength,
        })
        .collect();

        let venues = [
            ("Wankhede Stadium", "Mumbai", 1.1),
            ("R. Premadasa Stadium", "Colombo", 0.9),
            ("Narendra Modi Stadium", "Ahmedabad", 1.05),
            ("Pallekele International", "Kandy", 0.95),
        ]
        .into_iter()
        .map(|(name, city, batting_modifier)| Venue {
            name: name.to_string(),
            city: city.to_string(),
            batting_modifier,
        })
        .collect();

        let players = [
            ("1", "Virat Kohli", "India", PlayerRole::Batter, 1.45, 0.0, 0.92),
            ("2", "Jasprit Bumrah", "India", PlayerRole::Bowler, 0.0, 0.08, 0.98),
            ("3", "Travis Head", "Australia", PlayerRole::Batter, 1.62, 0.02, 0.88),
            ("4", "Rashid Khan", "Afghanistan", PlayerRole::AllRounder, 1.2, 0.07, 0.95),
        ]
        .into_iter()
        .map(|(id, name, team, role, xr, xw, form)| Player {
            id: id.to_string(),
            name: name.to_string(),
            team: team.to_string(),
            role,
            expected_runs_per_ball: xr,
            expected_wickets_per_ball: xw,
            form_index: form,
        })
        .collect();

        ReferenceData {
            teams,
            players,
            venues,
        }
    }

    /// Load tables from a JSON file with `teams`, `players` and `venues` arrays.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference data {}", path.display()))?;

        let data: ReferenceData =
            serde_json::from_str(&content).context("Failed to parse reference data JSON")?;
        data.validate()
            .with_context(|| format!("Rejected reference data {}", path.display()))?;

        info!(
            "Loaded reference data: {} teams, {} players, {} venues",
            data.teams.len(),
            data.players.len(),
            data.venues.len()
        );
        Ok(data)
    }

    /// All ratings and modifiers must be strictly positive and every form
    /// index must lie in [0, 1].
    pub fn validate(&self) -> EngineResult<()> {
        for t in &self.teams {
            if !(t.strength.is_finite() && t.strength > 0.0) {
                return Err(EngineError::InvalidReference(format!(
                    "team '{}' has non-positive strength {}",
                    t.name, t.strength
                )));
            }
        }
        for v in &self.venues {
            if !(v.batting_modifier.is_finite() && v.batting_modifier > 0.0) {
                return Err(EngineError::InvalidReference(format!(
                    "venue '{}' has non-positive modifier {}",
                    v.name, v.batting_modifier
                )));
            }
        }
        for p in &self.players {
            if !(0.0..=1.0).contains(&p.form_index) {
                return Err(EngineError::InvalidReference(format!(
                    "player '{}' has form index {} outside [0, 1]",
                    p.name, p.form_index
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_validate() {
        let data = ReferenceData::builtin();
        assert!(data.validate().is_ok());
        assert_eq!(data.teams.len(), 12);
        assert_eq!(data.venues.len(), 4);
        assert_eq!(data.players.len(), 4);
    }

    #[test]
    fn rejects_zero_venue_modifier() {
        let mut data = ReferenceData::builtin();
        data.venues[0].batting_modifier = 0.0;
        assert!(matches!(
            data.validate(),
            Err(EngineError::InvalidReference(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_form() {
        let mut data = ReferenceData::builtin();
        data.players[0].form_index = 1.3;
        assert!(data.validate().is_err());
    }

    #[test]
    fn parses_partial_json() {
        let json = r#"{
            "teams": [ { "name": "Nepal", "strength": 6.2 } ],
            "venues": [
                { "name": "Tribhuvan University Ground", "city": "Kirtipur", "batting_modifier": 0.97 }
            ]
        }"#;
        let data: ReferenceData = serde_json::from_str(json).expect("parse reference json");
        assert_eq!(data.teams[0].name, "Nepal");
        assert!(data.players.is_empty());
        assert!(data.validate().is_ok());
    }

    #[test]
    fn load_from_file_round_trips_builtin() {
        let path = std::env::temp_dir().join(format!(
            "cricket-oracle-reference-{}.json",
            std::process::id()
        ));
        let json = serde_json::to_string(&ReferenceData::builtin()).expect("serialize");
        std::fs::write(&path, json).expect("write fixture");
        let loaded = ReferenceData::load_from_file(&path).expect("load fixture");
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, ReferenceData::builtin());
    }

    #[test]
    fn load_from_missing_file_fails() {
        let path = Path::new("/nonexistent/cricket-oracle/reference.json");
        assert!(ReferenceData::load_from_file(path).is_err());
    }
}
