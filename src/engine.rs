use anyhow::{Context, Result, anyhow};

use crate::artifacts;
use crate::codec::CodecSet;
use crate::config::{AppConfig, CodecSource, FormSource};
use crate::dataset::{self, MatchRecord};
use crate::error::PipelineError;
use crate::features::{self, QuerySelection};
use crate::forest::{self, MatchForest, Metrics};
use crate::split;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub win: bool,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayResult {
    pub outcome_text: String,
    pub probability_text: Option<String>,
}

/// Pure presentation step: label + probability in, display strings out.
pub fn render(label: u8, probability: Option<f64>) -> DisplayResult {
    DisplayResult {
        outcome_text: if label == 1 {
            "Win".to_string()
        } else {
            "Not a win".to_string()
        },
        probability_text: probability.map(|p| format!("{:.0}% win", p * 100.0)),
    }
}

/// Process-wide immutable snapshot: corpus, fitted codecs, fitted forest and
/// its holdout metrics. Built once at startup; the UI only reads from it.
pub struct PredictionEngine {
    config: AppConfig,
    records: Vec<MatchRecord>,
    train: Vec<MatchRecord>,
    codecs: CodecSet,
    forest: MatchForest,
    metrics: Metrics,
    teams: Vec<String>,
}

impl PredictionEngine {
    /// Load corpus, resolve codecs, split, fit, evaluate. Any failure here
    /// is fatal: without a valid codec/model pair there is nothing to serve.
    pub fn build(config: AppConfig) -> Result<Self> {
        let records = dataset::load_matches_csv(&config.matches_csv)?;

        let codecs = match config.codec_source {
            CodecSource::FitAtStartup => {
                let fitted = CodecSet::fit(&records)
                    .map_err(|e| anyhow!("fit category codecs: {e}"))?;
                // Best effort save so a later session can run from artifacts.
                if let Err(err) = artifacts::save_codecs(&config.artifacts_path, &fitted, config.cutoff)
                {
                    eprintln!("warning: could not save codec artifacts: {err:#}");
                }
                fitted
            }
            CodecSource::LoadArtifacts => artifacts::load_codecs(&config.artifacts_path)
                .context("load persisted codec artifacts")?,
        };

        let (train, test) = split::split_at(&records, config.cutoff);
        if train.is_empty() {
            return Err(anyhow!(
                "no training records before cutoff {}",
                config.cutoff
            ));
        }

        let (train_matrix, train_labels) = features::assemble_training(&train, &codecs)
            .map_err(|e| anyhow!("assemble training matrix: {e}"))?;
        let forest = MatchForest::fit(&train_matrix, &train_labels, &config.forest)?;

        let metrics = match features::assemble_training(&test, &codecs) {
            Ok((test_matrix, test_labels)) => forest::evaluate(&forest, &test_matrix, &test_labels),
            // A holdout row can carry a category unseen before the cutoff
            // when codecs were loaded from stale artifacts; metrics are
            // advisory, so fall back to an empty evaluation.
            Err(_) => forest::evaluate(&forest, &[], &[]),
        };

        let teams = dataset::distinct_sorted(records.iter().map(|m| m.team.as_str()));

        Ok(Self {
            config,
            records,
            train,
            codecs,
            forest,
            metrics,
            teams,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn codecs(&self) -> &CodecSet {
        &self.codecs
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn corpus_len(&self) -> usize {
        self.records.len()
    }

    pub fn train_len(&self) -> usize {
        self.train.len()
    }

    /// One full synchronous pipeline run: assemble, predict, never letting a
    /// partially built vector reach the forest.
    pub fn predict(&self, selection: &QuerySelection) -> Result<Prediction, PipelineError> {
        let vector = features::assemble_query(selection, &self.codecs)?;
        let probability = self.forest.win_probability(&vector);
        Ok(Prediction {
            win: self.forest.predict_label(&vector) == 1,
            probability,
        })
    }

    pub fn display(&self, prediction: Prediction) -> DisplayResult {
        render(
            if prediction.win { 1 } else { 0 },
            Some(prediction.probability),
        )
    }

    /// Rolling result history for the form chart, oldest first. Which slice
    /// of history feeds it is an explicit configuration choice.
    pub fn recent_form(&self, team: &str) -> Vec<&MatchRecord> {
        let source = match self.config.form_source {
            FormSource::FullCorpus => &self.records,
            FormSource::TrainOnly => &self.train,
        };
        dataset::recent_form(source, team, self.config.form_window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_win_with_probability() {
        let out = render(1, Some(0.72));
        assert_eq!(out.outcome_text, "Win");
        assert_eq!(out.probability_text.as_deref(), Some("72% win"));
    }

    #[test]
    fn render_not_win_without_probability() {
        let out = render(0, None);
        assert_eq!(out.outcome_text, "Not a win");
        assert!(out.probability_text.is_none());
    }

    #[test]
    fn render_is_idempotent() {
        assert_eq!(render(1, Some(0.5)), render(1, Some(0.5)));
        assert_eq!(render(0, None), render(0, None));
    }
}
