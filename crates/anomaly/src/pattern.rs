//! Pattern Detector
//!
//! Standardizes each row, pushes it through a fixed seeded projection to a
//! lower-dimensional latent space and back, and measures the reconstruction
//! error. Nothing is trained: the projection is a deterministic orthonormal
//! basis drawn from a seeded normal distribution.
//!
//! Rows holding a non-finite value cannot be projected and are skipped.

use crate::error::{DetectorError, Result};
use crate::protocol::AnomalyDetector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use vigil_core::{Anomaly, AnomalyType, EPSILON, FeatureMatrix, Timestamp, stats};

const NAME: &str = "pattern";

/// Features reported as affected for the worst row
const AFFECTED_FEATURES: usize = 3;

/// Fitted state: standardization, basis and error threshold
#[derive(Debug, Clone)]
struct Projection {
    features: Vec<String>,
    means: Vec<f64>,
    std_devs: Vec<f64>,
    /// Orthonormal latent basis vectors, each of feature length
    basis: Vec<Vec<f64>>,
    threshold: f64,
}

impl Projection {
    fn standardize(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.std_devs))
            .map(|(x, (m, s))| (x - m) / s)
            .collect()
    }

    /// Squared residual per feature after projecting down and back
    fn residuals(&self, row: &[f64]) -> Vec<f64> {
        let z = self.standardize(row);
        let mut reconstructed = vec![0.0; z.len()];
        for axis in &self.basis {
            let coord: f64 = axis.iter().zip(&z).map(|(a, x)| a * x).sum();
            for (r, a) in reconstructed.iter_mut().zip(axis) {
                *r += coord * a;
            }
        }
        z.iter()
            .zip(&reconstructed)
            .map(|(x, r)| (x - r).powi(2))
            .collect()
    }

    fn error(&self, row: &[f64]) -> f64 {
        stats::mean(&self.residuals(row)).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct PatternDetector {
    latent_dim: Option<usize>,
    seed: u64,
    percentile: f64,
    probability_factor: f64,
    projection: Option<Projection>,
}

impl PatternDetector {
    pub fn new(
        latent_dim: Option<usize>,
        seed: u64,
        percentile: f64,
        probability_factor: f64,
    ) -> Self {
        Self {
            latent_dim,
            seed,
            percentile,
            probability_factor,
            projection: None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.projection.is_some()
    }

    /// Reconstruction-error threshold, once fitted
    pub fn threshold(&self) -> Option<f64> {
        self.projection.as_ref().map(|p| p.threshold)
    }

    /// Latent width actually used for `n_features`
    pub fn latent_width(&self, n_features: usize) -> usize {
        self.latent_dim
            .unwrap_or(n_features / 2)
            .clamp(1, n_features.max(1))
    }

    /// Reconstruction error of one row, once fitted
    pub fn reconstruction_error(&self, row: &[f64]) -> Option<f64> {
        self.projection.as_ref().map(|p| p.error(row))
    }

    /// Build the projection and set the error threshold at the configured
    /// percentile of normal-sample errors.
    pub fn fit(&mut self, normal: &FeatureMatrix) -> Result<()> {
        let n = normal.n_features();
        if normal.is_empty() || n == 0 {
            return Err(DetectorError::insufficient(NAME, "empty training sample"));
        }
        if let Some((_, width)) = normal.ragged_row() {
            return Err(DetectorError::DimensionMismatch {
                expected: n,
                actual: width,
            });
        }

        let mut means = Vec::with_capacity(n);
        let mut std_devs = Vec::with_capacity(n);
        for i in 0..n {
            let column: Vec<f64> = normal
                .column(i)
                .into_iter()
                .filter(|v| v.is_finite())
                .collect();
            means.push(stats::mean(&column).unwrap_or(0.0));
            std_devs.push(stats::std_dev(&column).unwrap_or(0.0).max(EPSILON));
        }

        let mut projection = Projection {
            features: normal.features.clone(),
            means,
            std_devs,
            basis: seeded_basis(n, self.latent_width(n), self.seed),
            threshold: EPSILON,
        };

        let errors: Vec<f64> = normal
            .rows
            .iter()
            .filter(|r| is_complete(r))
            .map(|r| projection.error(r))
            .collect();
        projection.threshold = stats::percentile(&errors, self.percentile)
            .unwrap_or(EPSILON)
            .max(EPSILON);

        log::debug!(
            "[PATTERN] Fitted {} -> {} projection, threshold {:.4}",
            n,
            projection.basis.len(),
            projection.threshold
        );
        self.projection = Some(projection);
        Ok(())
    }
}

fn is_complete(row: &[f64]) -> bool {
    row.iter().all(|v| v.is_finite())
}

impl AnomalyDetector for PatternDetector {
    type Input = FeatureMatrix;

    fn detect(&mut self, data: &FeatureMatrix, at: Timestamp) -> Result<Vec<Anomaly>> {
        let projection = self
            .projection
            .as_ref()
            .ok_or_else(|| DetectorError::not_fitted(NAME))?;
        let expected = projection.means.len();
        if data.n_features() != expected {
            return Err(DetectorError::DimensionMismatch {
                expected,
                actual: data.n_features(),
            });
        }
        if let Some((_, width)) = data.ragged_row() {
            return Err(DetectorError::DimensionMismatch {
                expected,
                actual: width,
            });
        }

        let worst = data
            .rows
            .iter()
            .filter(|row| is_complete(row))
            .map(|row| (row, projection.error(row)))
            .max_by(|a, b| a.1.total_cmp(&b.1));
        let Some((row, error)) = worst else {
            return Ok(Vec::new());
        };
        if error <= projection.threshold {
            return Ok(Vec::new());
        }

        let severity = (error / projection.threshold - 1.0).min(1.0);
        let probability = severity * self.probability_factor;

        let mut ranked: Vec<(usize, f64)> =
            projection.residuals(row).into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        let affected: Vec<&str> = ranked
            .iter()
            .take(AFFECTED_FEATURES)
            .map(|(i, _)| projection.features[*i].as_str())
            .collect();

        Ok(vec![
            Anomaly::new(
                AnomalyType::Pattern,
                severity,
                probability,
                at,
                format!(
                    "Reconstruction error {:.3} exceeds normal threshold {:.3}",
                    error, projection.threshold
                ),
            )
            .with_affected(affected),
        ])
    }

    fn is_ready(&self) -> bool {
        self.is_fitted()
    }

    fn name(&self) -> &str {
        NAME
    }
}

/// `width` orthonormal vectors in `n` dimensions from a seeded normal draw
/// (Gram-Schmidt). Degenerate draws are skipped.
fn seeded_basis(n: usize, width: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut basis: Vec<Vec<f64>> = Vec::with_capacity(width);
    let mut attempts = 0;

    while basis.len() < width && attempts < width * 4 {
        attempts += 1;
        let mut v: Vec<f64> = (0..n).map(|_| rng.sample(StandardNormal)).collect();
        for axis in &basis {
            let dot: f64 = v.iter().zip(axis).map(|(a, b)| a * b).sum();
            for (x, a) in v.iter_mut().zip(axis) {
                *x -= dot * a;
            }
        }
        let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm < EPSILON {
            continue;
        }
        v.iter_mut().for_each(|x| *x /= norm);
        basis.push(v);
    }
    basis
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::Utc;

    /// Seeded standard-normal training sample
    fn normal_sample(rows: usize, features: usize) -> FeatureMatrix {
        let mut rng = StdRng::seed_from_u64(7);
        FeatureMatrix::from_rows(
            (0..rows)
                .map(|_| (0..features).map(|_| rng.sample(StandardNormal)).collect())
                .collect(),
        )
    }

    fn fitted() -> PatternDetector {
        let mut detector = PatternDetector::new(None, 42, 95.0, 0.75);
        detector.fit(&normal_sample(200, 6)).unwrap();
        detector
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let basis = seeded_basis(6, 3, 42);
        assert_eq!(basis.len(), 3);
        for (i, a) in basis.iter().enumerate() {
            for (j, b) in basis.iter().enumerate() {
                let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(dot, expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_projection_is_deterministic() {
        let a = fitted();
        let b = fitted();
        assert_eq!(a.threshold(), b.threshold());

        let mut other_seed = PatternDetector::new(None, 43, 95.0, 0.75);
        other_seed.fit(&normal_sample(200, 6)).unwrap();
        assert_ne!(a.threshold(), other_seed.threshold());
    }

    #[test]
    fn test_latent_width() {
        let detector = PatternDetector::new(None, 42, 95.0, 0.75);
        assert_eq!(detector.latent_width(6), 3);
        assert_eq!(detector.latent_width(1), 1);
        let wide = PatternDetector::new(Some(10), 42, 95.0, 0.75);
        assert_eq!(wide.latent_width(4), 4);
    }

    #[test]
    fn test_not_fitted_is_an_error() {
        let mut detector = PatternDetector::new(None, 42, 95.0, 0.75);
        let result = detector.detect(&normal_sample(1, 6), Utc::now());
        assert_eq!(result, Err(DetectorError::not_fitted("pattern")));
    }

    #[test]
    fn test_mean_row_is_quiet() {
        let mut detector = fitted();
        let sample = normal_sample(200, 6);
        let means: Vec<f64> = (0..6).map(|i| stats::mean(&sample.column(i)).unwrap()).collect();
        assert_abs_diff_eq!(detector.reconstruction_error(&means).unwrap(), 0.0, epsilon = 1e-12);
        let anomalies = detector
            .detect(&FeatureMatrix::from_rows(vec![means]), Utc::now())
            .unwrap();
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_extreme_row_is_flagged() {
        let mut detector = fitted();
        let extreme = vec![50.0, -50.0, 50.0, -50.0, 50.0, -50.0];
        let anomalies = detector
            .detect(&FeatureMatrix::from_rows(vec![extreme]), Utc::now())
            .unwrap();
        assert_eq!(anomalies.len(), 1);
        let a = &anomalies[0];
        assert_eq!(a.anomaly_type, AnomalyType::Pattern);
        assert_eq!(a.severity, 1.0);
        assert_eq!(a.affected.len(), AFFECTED_FEATURES);
    }

    #[test]
    fn test_calibration_pattern_probability_factor() {
        let mut detector = fitted();
        let extreme = vec![50.0, -50.0, 50.0, -50.0, 50.0, -50.0];
        let anomalies = detector
            .detect(&FeatureMatrix::from_rows(vec![extreme]), Utc::now())
            .unwrap();
        assert_abs_diff_eq!(
            anomalies[0].crisis_probability,
            anomalies[0].severity * 0.75,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_threshold_is_training_percentile() {
        let detector = fitted();
        let sample = normal_sample(200, 6);
        let errors: Vec<f64> = sample
            .rows
            .iter()
            .map(|r| detector.reconstruction_error(r).unwrap())
            .collect();
        let expected = stats::percentile(&errors, 95.0).unwrap();
        assert_abs_diff_eq!(detector.threshold().unwrap(), expected, epsilon = 1e-12);
        let above = errors.iter().filter(|e| **e > expected).count();
        assert!(above <= 10);
    }

    #[test]
    fn test_non_finite_rows_are_skipped() {
        let mut detector = fitted();
        let gap = vec![0.0, 0.0, f64::NAN, 0.0, 0.0, 0.0];
        let anomalies = detector
            .detect(&FeatureMatrix::from_rows(vec![gap.clone()]), Utc::now())
            .unwrap();
        assert!(anomalies.is_empty());

        // The complete row is still scored
        let extreme = vec![50.0, -50.0, 50.0, -50.0, 50.0, -50.0];
        let anomalies = detector
            .detect(&FeatureMatrix::from_rows(vec![gap, extreme]), Utc::now())
            .unwrap();
        assert_eq!(anomalies.len(), 1);
        assert!(anomalies[0].severity.is_finite());
    }

    #[test]
    fn test_fit_ignores_non_finite_values() {
        let mut sample = normal_sample(200, 6);
        sample.rows[0][2] = f64::NAN;
        sample.rows[1][4] = f64::INFINITY;
        let mut detector = PatternDetector::new(None, 42, 95.0, 0.75);
        detector.fit(&sample).unwrap();
        assert!(detector.threshold().unwrap().is_finite());
    }
}
