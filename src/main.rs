use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

mod config;
mod engine;
mod reference;

use config::Config;
use engine::models::InningsSample;
use engine::{MatchPredictor, PredictionResult};
use reference::ReferenceData;

#[derive(Serialize)]
struct Output {
    seed: u64,
    prediction: PredictionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_path: Option<Vec<InningsSample>>,
}

fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    config.validate()?;

    let reference = match &config.reference_data {
        Some(path) => ReferenceData::load_from_file(path)?,
        None => ReferenceData::builtin(),
    };
    let params = config.load_params()?;
    let predictor =
        MatchPredictor::new(reference, params).context("Failed to build match predictor")?;

    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(
        "Simulating {} vs {} ({} trials per side, seed {})",
        config.team_a,
        config.team_b,
        predictor.params().trials,
        seed
    );
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let request = config.match_request();
    let prediction = if config.has_context() {
        predictor.predict_with_context(&request, &mut rng)?
    } else {
        predictor.predict(&request.team_a, &request.team_b, &mut rng)
    };

    let sample_path = if config.show_path {
        let ctx = predictor.resolver().resolve(
            &request.team_a,
            request.venue.as_deref(),
            request.toss_winner.as_deref(),
        );
        let start = request.live_state.clone().unwrap_or_default();
        Some(predictor.sample_path(&ctx, &start, &mut rng)?)
    } else {
        None
    };

    let output = Output {
        seed,
        prediction,
        sample_path,
    };
    let json = if config.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", json);

    Ok(())
}
