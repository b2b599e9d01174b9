pub mod error;
pub mod innings;
pub mod models;
pub mod monte_carlo;
pub mod params;
pub mod resolver;
pub mod upset;

pub use models::{MatchState, PredictionResult};
pub use monte_carlo::{MatchPredictor, MatchRequest};
pub use params::SimParams;
