use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;

use crate::forest::ForestConfig;

/// Where the fitted codecs come from. An explicit choice, not an accident of
/// which code path runs first: either fit from the corpus at startup (and
/// save for next time), or load a previously persisted artifact file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecSource {
    FitAtStartup,
    LoadArtifacts,
}

/// Which records feed the rolling-form chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSource {
    FullCorpus,
    TrainOnly,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub matches_csv: PathBuf,
    pub cutoff: NaiveDate,
    pub codec_source: CodecSource,
    pub artifacts_path: PathBuf,
    pub forest: ForestConfig,
    pub form_window: usize,
    pub form_source: FormSource,
}

impl AppConfig {
    /// Reads configuration from the environment (after dotenvy has loaded
    /// `.env`), falling back to the corpus defaults.
    pub fn from_env() -> Result<Self> {
        let matches_csv = std::env::var("MATCHES_CSV")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("matches.csv"));

        let cutoff = match std::env::var("CUTOFF_DATE") {
            Ok(raw) if !raw.trim().is_empty() => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .with_context(|| format!("CUTOFF_DATE {raw:?} is not a YYYY-MM-DD date"))?,
            _ => default_cutoff(),
        };

        let codec_source = match std::env::var("CODEC_SOURCE") {
            Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "" | "fit" => CodecSource::FitAtStartup,
                "artifacts" => CodecSource::LoadArtifacts,
                other => return Err(anyhow!("CODEC_SOURCE {other:?} (expected fit|artifacts)")),
            },
            Err(_) => CodecSource::FitAtStartup,
        };

        let artifacts_path = std::env::var("CODEC_ARTIFACTS")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("codec_artifacts.json"));

        let forest = ForestConfig {
            trees: env_usize("FOREST_TREES", 50).max(1),
            seed: env_u64("FOREST_SEED", 1),
        };

        let form_window = env_usize("FORM_WINDOW", 5).clamp(1, 20);
        let form_source = match std::env::var("FORM_SOURCE") {
            Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "" | "full" => FormSource::FullCorpus,
                "train" => FormSource::TrainOnly,
                other => return Err(anyhow!("FORM_SOURCE {other:?} (expected full|train)")),
            },
            Err(_) => FormSource::FullCorpus,
        };

        Ok(Self {
            matches_csv,
            cutoff,
            codec_source,
            artifacts_path,
            forest,
            form_window,
            form_source,
        })
    }
}

pub fn default_cutoff() -> NaiveDate {
    // The corpus boundary: pre-2022 seasons train, 2022 onwards holds out.
    NaiveDate::from_ymd_opt(2022, 1, 1).expect("static date is valid")
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
