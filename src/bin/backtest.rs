use anyhow::Result;

use matchday_terminal::config::AppConfig;
use matchday_terminal::engine::PredictionEngine;

// Fits the forest exactly the way the terminal does and prints the holdout
// numbers. Useful for quick hyperparameter or cutoff experiments without
// starting the UI: MATCHES_CSV=... CUTOFF_DATE=... cargo run --bin backtest
fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = AppConfig::from_env()?;
    let engine = PredictionEngine::build(config)?;

    let metrics = engine.metrics();
    println!("Corpus:    {} matches", engine.corpus_len());
    println!(
        "Train:     {} matches (before {})",
        engine.train_len(),
        engine.config().cutoff
    );
    println!("Holdout:   {} matches", metrics.samples);
    println!("Accuracy:  {:.1}%", metrics.accuracy * 100.0);
    println!("Precision: {:.1}% (win class)", metrics.precision * 100.0);
    println!(
        "Forest:    {} trees, seed {}",
        engine.config().forest.trees,
        engine.config().forest.seed
    );

    Ok(())
}
