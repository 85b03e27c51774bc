use std::num::NonZeroUsize;

use anyhow::{Result, anyhow};
use randomforest::RandomForestClassifierOptions;
use randomforest::criterion::Gini;
use randomforest::table::TableBuilder;
use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;

/// Hyperparameters mirror the corpus defaults: 50 trees, fixed seed so a
/// refit on the same data reproduces the same model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForestConfig {
    pub trees: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self { trees: 50, seed: 1 }
    }
}

/// Fitted win/not-win classifier. The ensemble itself comes from the
/// `randomforest` crate; this wrapper only guarantees it is fed vectors in
/// the fixed feature order and exposes the positive-class probability.
pub struct MatchForest {
    forest: randomforest::RandomForestClassifier,
    config: ForestConfig,
}

impl MatchForest {
    pub fn fit(matrix: &[[f64; 4]], labels: &[f64], config: &ForestConfig) -> Result<Self> {
        if matrix.is_empty() {
            return Err(anyhow!("cannot fit forest on an empty training set"));
        }
        if matrix.len() != labels.len() {
            return Err(anyhow!(
                "training matrix has {} rows but {} labels",
                matrix.len(),
                labels.len()
            ));
        }
        let trees = NonZeroUsize::new(config.trees)
            .ok_or_else(|| anyhow!("forest needs at least one tree"))?;

        let mut builder = TableBuilder::new();
        for (row, label) in matrix.iter().zip(labels) {
            builder
                .add_row(row, *label)
                .map_err(|e| anyhow!("add training row: {e}"))?;
        }
        let table = builder
            .build()
            .map_err(|e| anyhow!("build training table: {e}"))?;

        let forest = RandomForestClassifierOptions::new()
            .trees(trees)
            .seed(config.seed)
            .fit(Gini, table);

        Ok(Self {
            forest,
            config: *config,
        })
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Majority vote over the ensemble: 1 = win, 0 = not-win.
    pub fn predict_label(&self, vector: &FeatureVector) -> u8 {
        if self.win_probability(vector) >= 0.5 { 1 } else { 0 }
    }

    /// Fraction of trees voting for the win class.
    pub fn win_probability(&self, vector: &FeatureVector) -> f64 {
        let xs = vector.as_array();
        let mut wins = 0usize;
        let mut total = 0usize;
        for vote in self.forest.predict_individuals(&xs) {
            if vote >= 0.5 {
                wins += 1;
            }
            total += 1;
        }
        if total == 0 {
            return 0.0;
        }
        wins as f64 / total as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub samples: usize,
    pub accuracy: f64,
    pub precision: f64,
}

/// Holdout evaluation: accuracy over all predictions plus precision for the
/// win class (no positive predictions counts as precision 0).
pub fn evaluate(forest: &MatchForest, matrix: &[[f64; 4]], labels: &[f64]) -> Metrics {
    if matrix.is_empty() || matrix.len() != labels.len() {
        return Metrics {
            samples: 0,
            accuracy: 0.0,
            precision: 0.0,
        };
    }

    let mut correct = 0usize;
    let mut predicted_wins = 0usize;
    let mut true_wins = 0usize;

    for (row, label) in matrix.iter().zip(labels) {
        let vector = FeatureVector {
            venue_code: row[0] as i64,
            opponent_code: row[1] as i64,
            hour: row[2] as u8,
            day_code: row[3] as u8,
        };
        let predicted = forest.predict_label(&vector);
        let actual = if *label >= 0.5 { 1 } else { 0 };
        if predicted == actual {
            correct += 1;
        }
        if predicted == 1 {
            predicted_wins += 1;
            if actual == 1 {
                true_wins += 1;
            }
        }
    }

    Metrics {
        samples: matrix.len(),
        accuracy: correct as f64 / matrix.len() as f64,
        precision: if predicted_wins > 0 {
            true_wins as f64 / predicted_wins as f64
        } else {
            0.0
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A tiny separable corpus: home matches are wins, away matches are not.
    fn separable() -> (Vec<[f64; 4]>, Vec<f64>) {
        let mut matrix = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            let venue = (i % 2) as f64;
            matrix.push([venue, (i % 5) as f64, 15.0, (i % 7) as f64]);
            labels.push(if venue == 0.0 { 1.0 } else { 0.0 });
        }
        (matrix, labels)
    }

    #[test]
    fn fit_rejects_empty_training_set() {
        assert!(MatchForest::fit(&[], &[], &ForestConfig::default()).is_err());
    }

    #[test]
    fn learns_a_separable_signal() {
        let (matrix, labels) = separable();
        let forest = MatchForest::fit(&matrix, &labels, &ForestConfig::default()).unwrap();

        let home = FeatureVector {
            venue_code: 0,
            opponent_code: 1,
            hour: 15,
            day_code: 1,
        };
        let away = FeatureVector { venue_code: 1, ..home };
        assert_eq!(forest.predict_label(&home), 1);
        assert_eq!(forest.predict_label(&away), 0);
        assert!(forest.win_probability(&home) > forest.win_probability(&away));
    }

    #[test]
    fn probability_stays_in_unit_interval() {
        let (matrix, labels) = separable();
        let forest = MatchForest::fit(&matrix, &labels, &ForestConfig::default()).unwrap();
        for row in &matrix {
            let vector = FeatureVector {
                venue_code: row[0] as i64,
                opponent_code: row[1] as i64,
                hour: row[2] as u8,
                day_code: row[3] as u8,
            };
            let p = forest.win_probability(&vector);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn same_seed_reproduces_predictions() {
        let (matrix, labels) = separable();
        let config = ForestConfig { trees: 25, seed: 7 };
        let a = MatchForest::fit(&matrix, &labels, &config).unwrap();
        let b = MatchForest::fit(&matrix, &labels, &config).unwrap();
        let vector = FeatureVector {
            venue_code: 0,
            opponent_code: 3,
            hour: 20,
            day_code: 5,
        };
        assert_eq!(a.win_probability(&vector), b.win_probability(&vector));
    }

    #[test]
    fn evaluate_on_separable_holdout_is_strong() {
        let (matrix, labels) = separable();
        let forest = MatchForest::fit(&matrix, &labels, &ForestConfig::default()).unwrap();
        let metrics = evaluate(&forest, &matrix, &labels);
        assert_eq!(metrics.samples, matrix.len());
        assert!(metrics.accuracy > 0.9);
        assert!(metrics.precision > 0.9);
    }

    #[test]
    fn evaluate_handles_empty_holdout() {
        let (matrix, labels) = separable();
        let forest = MatchForest::fit(&matrix, &labels, &ForestConfig::default()).unwrap();
        let metrics = evaluate(&forest, &[], &[]);
        assert_eq!(metrics.samples, 0);
    }
}
