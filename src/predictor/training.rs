//! Model selection and training
//!
//! Trains a closed set of candidate regressors on historical features and
//! keeps the one with the best held-out score. Candidates are evaluated in
//! declaration order and ties keep the earlier one, so repeated runs over
//! the same series always select the same model.

use crate::error::{Result, SentinelError};
use crate::predictor::features::FeatureVector;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::error::Failed;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{LinearRegression, LinearRegressionParameters};
use tracing::{debug, info};

/// Minimum aligned rows required before training is attempted
pub const MIN_TRAINING_ROWS: usize = 5;

/// Held-out share of the train/test split
const TEST_RATIO: f64 = 0.2;

type ForestModel = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;
type LinearModel = LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Candidate regressors, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    RandomForest,
    Linear,
}

impl CandidateKind {
    pub const ALL: [CandidateKind; 2] = [CandidateKind::RandomForest, CandidateKind::Linear];

    pub fn name(&self) -> &'static str {
        match self {
            CandidateKind::RandomForest => "RandomForestRegressor",
            CandidateKind::Linear => "LinearRegression",
        }
    }
}

#[derive(Debug)]
enum Regressor {
    Forest(ForestModel),
    Linear(LinearModel),
}

impl Regressor {
    fn predict(&self, x: &DenseMatrix<f64>) -> std::result::Result<Vec<f64>, Failed> {
        match self {
            Regressor::Forest(m) => m.predict(x),
            Regressor::Linear(m) => m.predict(x),
        }
    }
}

/// Per-feature standardization, fitted on the training partition only
#[derive(Debug, Clone)]
pub struct FeatureScaler {
    mean: [f64; 4],
    scale: [f64; 4],
}

impl FeatureScaler {
    /// Zero mean, unit variance. A constant column keeps scale 1 so the
    /// transform stays finite.
    fn fit(rows: &[[f64; 4]]) -> Self {
        let n = rows.len().max(1) as f64;
        let mut mean = [0.0; 4];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut scale = [0.0; 4];
        for row in rows {
            for ((s, v), m) in scale.iter_mut().zip(row).zip(&mean) {
                *s += (v - m) * (v - m);
            }
        }
        for s in &mut scale {
            *s = (*s / n).sqrt();
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        Self { mean, scale }
    }

    fn transform_row(&self, row: [f64; 4]) -> Vec<f64> {
        row.iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((v, m), s)| (v - m) / s)
            .collect()
    }

    fn transform(&self, rows: &[[f64; 4]]) -> Vec<Vec<f64>> {
        rows.iter().map(|&r| self.transform_row(r)).collect()
    }
}

/// The selected regressor plus everything needed to run inference later
#[derive(Debug)]
pub struct TrainedModel {
    regressor: Regressor,
    scaler: FeatureScaler,
    kind: CandidateKind,
    test_r2: f64,
}

impl TrainedModel {
    pub fn kind(&self) -> CandidateKind {
        self.kind
    }

    /// Held-out coefficient of determination at selection time
    pub fn test_r2(&self) -> f64 {
        self.test_r2
    }

    /// Scale one feature row and run the selected regressor on it
    pub fn predict_row(&self, features: &FeatureVector) -> Result<f64> {
        let scaled = self.scaler.transform_row(features.to_array());
        let x = DenseMatrix::from_2d_vec(&vec![scaled]);
        let predicted = self
            .regressor
            .predict(&x)
            .map_err(|e| SentinelError::Inference(e.to_string()))?;
        predicted
            .first()
            .copied()
            .ok_or_else(|| SentinelError::Inference("regressor returned no rows".to_string()))
    }
}

/// Trains candidates and selects by held-out R2
pub struct ModelSelector {
    split_seed: u64,
    forest_trees: u16,
}

impl ModelSelector {
    pub fn new(split_seed: u64, forest_trees: u16) -> Self {
        Self {
            split_seed,
            forest_trees,
        }
    }

    /// Train on aligned (features, targets) rows.
    ///
    /// Fewer than [`MIN_TRAINING_ROWS`] rows is a normal outcome reported as
    /// `DataInsufficient`; the caller keeps the predictor untrained. Any
    /// fit or scoring failure surfaces as `Training` and is handled the
    /// same way.
    pub fn train(&self, features: &[FeatureVector], targets: &[f64]) -> Result<TrainedModel> {
        if features.len() != targets.len() {
            return Err(SentinelError::Internal(format!(
                "feature/target length mismatch: {} vs {}",
                features.len(),
                targets.len()
            )));
        }
        if features.len() < MIN_TRAINING_ROWS {
            return Err(SentinelError::DataInsufficient {
                needed: MIN_TRAINING_ROWS,
                got: features.len(),
            });
        }

        let n = features.len();
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.split_seed);
        indices.shuffle(&mut rng);

        let test_len = ((n as f64) * TEST_RATIO).ceil() as usize;
        let test_len = test_len.clamp(1, n - 1);
        let (test_idx, train_idx) = indices.split_at(test_len);

        let rows: Vec<[f64; 4]> = features.iter().map(|f| f.to_array()).collect();
        let train_rows: Vec<[f64; 4]> = train_idx.iter().map(|&i| rows[i]).collect();
        let test_rows: Vec<[f64; 4]> = test_idx.iter().map(|&i| rows[i]).collect();
        let y_train: Vec<f64> = train_idx.iter().map(|&i| targets[i]).collect();
        let y_test: Vec<f64> = test_idx.iter().map(|&i| targets[i]).collect();

        let scaler = FeatureScaler::fit(&train_rows);
        let x_train = DenseMatrix::from_2d_vec(&scaler.transform(&train_rows));
        let x_test = DenseMatrix::from_2d_vec(&scaler.transform(&test_rows));

        let mut best: Option<(CandidateKind, Regressor, f64)> = None;
        for kind in CandidateKind::ALL {
            let fitted = self.fit_candidate(kind, &x_train, &y_train)?;
            let predicted = fitted
                .predict(&x_test)
                .map_err(|e| SentinelError::Training(e.to_string()))?;
            let score = r2_score(&y_test, &predicted);
            debug!("candidate {} scored test R2 {:.4}", kind.name(), score);

            // Strictly higher wins; a tie keeps the earlier candidate
            if best.as_ref().map(|(_, _, s)| score > *s).unwrap_or(true) {
                best = Some((kind, fitted, score));
            }
        }

        let (kind, regressor, test_r2) =
            best.ok_or_else(|| SentinelError::Training("no candidate fitted".to_string()))?;
        info!(
            "model selected: {} (test R2 {:.3}, {} train / {} test rows)",
            kind.name(),
            test_r2,
            train_idx.len(),
            test_idx.len()
        );

        Ok(TrainedModel {
            regressor,
            scaler,
            kind,
            test_r2,
        })
    }

    fn fit_candidate(
        &self,
        kind: CandidateKind,
        x: &DenseMatrix<f64>,
        y: &Vec<f64>,
    ) -> Result<Regressor> {
        match kind {
            CandidateKind::RandomForest => {
                let params = RandomForestRegressorParameters::default()
                    .with_n_trees(self.forest_trees.into())
                    .with_seed(self.split_seed);
                RandomForestRegressor::fit(x, y, params)
                    .map(Regressor::Forest)
                    .map_err(|e| SentinelError::Training(e.to_string()))
            }
            CandidateKind::Linear => {
                LinearRegression::fit(x, y, LinearRegressionParameters::default())
                    .map(Regressor::Linear)
                    .map_err(|e| SentinelError::Training(e.to_string()))
            }
        }
    }
}

/// Coefficient of determination on held-out data
fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len();
    if n == 0 || n != y_pred.len() {
        return f64::NEG_INFINITY;
    }

    let mean: f64 = y_true.iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        // Held-out targets are constant; score is uninformative
        return 0.0;
    }
    1.0 - ss_res / ss_tot
}
