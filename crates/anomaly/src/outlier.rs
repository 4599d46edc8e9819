//! Outlier Detector
//!
//! Per-feature z-score check against a normal-period sample. A row is an
//! outlier when any feature sits more than `threshold` standard deviations
//! from its fitted mean. Non-finite values count as missing and are skipped.

use crate::error::{DetectorError, Result};
use crate::protocol::AnomalyDetector;
use vigil_core::{Anomaly, AnomalyType, EPSILON, FeatureMatrix, Timestamp, stats};

const NAME: &str = "outlier";

/// Per-feature moments of the normal sample
#[derive(Debug, Clone, PartialEq)]
struct FeatureMoments {
    features: Vec<String>,
    means: Vec<f64>,
    std_devs: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct OutlierDetector {
    threshold: f64,
    probability_cap: f64,
    moments: Option<FeatureMoments>,
}

impl OutlierDetector {
    pub fn new(threshold: f64, probability_cap: f64) -> Self {
        Self {
            threshold,
            probability_cap,
            moments: None,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_fitted(&self) -> bool {
        self.moments.is_some()
    }

    /// Store per-feature mean and standard deviation of `normal`.
    ///
    /// Refitting replaces the previous moments.
    pub fn fit(&mut self, normal: &FeatureMatrix) -> Result<()> {
        if normal.is_empty() || normal.n_features() == 0 {
            return Err(DetectorError::insufficient(NAME, "empty training sample"));
        }
        check_width(normal, normal.n_features())?;

        let mut means = Vec::with_capacity(normal.n_features());
        let mut std_devs = Vec::with_capacity(normal.n_features());
        for i in 0..normal.n_features() {
            let column: Vec<f64> = normal
                .column(i)
                .into_iter()
                .filter(|v| v.is_finite())
                .collect();
            means.push(stats::mean(&column).unwrap_or(0.0));
            std_devs.push(stats::std_dev(&column).unwrap_or(0.0).max(EPSILON));
        }

        self.moments = Some(FeatureMoments {
            features: normal.features.clone(),
            means,
            std_devs,
        });
        Ok(())
    }
}

impl AnomalyDetector for OutlierDetector {
    type Input = FeatureMatrix;

    fn detect(&mut self, data: &FeatureMatrix, at: Timestamp) -> Result<Vec<Anomaly>> {
        let moments = self
            .moments
            .as_ref()
            .ok_or_else(|| DetectorError::not_fitted(NAME))?;
        check_width(data, moments.means.len())?;

        // Worst |z| per feature over all rows; non-finite values are missing
        let mut worst = vec![0.0_f64; moments.means.len()];
        for row in &data.rows {
            for (i, value) in row.iter().enumerate() {
                if !value.is_finite() {
                    continue;
                }
                let z = ((value - moments.means[i]) / moments.std_devs[i]).abs();
                if z > worst[i] {
                    worst[i] = z;
                }
            }
        }

        let Some((worst_idx, &max_z)) = worst
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
        else {
            return Ok(Vec::new());
        };
        if max_z <= self.threshold {
            return Ok(Vec::new());
        }

        let severity = ((max_z - self.threshold) / self.threshold).min(1.0);
        let probability = severity.min(self.probability_cap);
        let affected: Vec<&str> = worst
            .iter()
            .zip(&moments.features)
            .filter(|(z, _)| **z > self.threshold)
            .map(|(_, name)| name.as_str())
            .collect();

        log::debug!(
            "[OUTLIER] max z {:.2} on {} ({} features flagged)",
            max_z,
            moments.features[worst_idx],
            affected.len()
        );

        Ok(vec![
            Anomaly::new(
                AnomalyType::Outlier,
                severity,
                probability,
                at,
                format!(
                    "{} is {:.1} standard deviations from normal",
                    moments.features[worst_idx], max_z
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

fn check_width(data: &FeatureMatrix, expected: usize) -> Result<()> {
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
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::Utc;

    /// Two features: mean 0 / std 1 and mean 10 / std 2
    fn normal_sample() -> FeatureMatrix {
        FeatureMatrix::new(
            vec!["spread".into(), "vol".into()],
            vec![vec![-1.0, 8.0], vec![1.0, 12.0], vec![-1.0, 8.0], vec![1.0, 12.0]],
        )
    }

    fn fitted() -> OutlierDetector {
        let mut detector = OutlierDetector::new(3.0, 0.8);
        detector.fit(&normal_sample()).unwrap();
        detector
    }

    fn rows(rows: Vec<Vec<f64>>) -> FeatureMatrix {
        FeatureMatrix::new(vec!["spread".into(), "vol".into()], rows)
    }

    #[test]
    fn test_not_fitted_is_an_error() {
        let mut detector = OutlierDetector::new(3.0, 0.8);
        assert!(!detector.is_ready());
        let err = detector.detect(&rows(vec![vec![0.0, 10.0]]), Utc::now());
        assert_eq!(err, Err(DetectorError::not_fitted("outlier")));
    }

    #[test]
    fn test_normal_rows_are_quiet() {
        let mut detector = fitted();
        let anomalies = detector
            .detect(&rows(vec![vec![2.5, 14.0], vec![-2.0, 6.0]]), Utc::now())
            .unwrap();
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut detector = fitted();
        // z = 3.0 exactly
        let anomalies = detector
            .detect(&rows(vec![vec![3.0, 10.0]]), Utc::now())
            .unwrap();
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_severity_and_probability() {
        let mut detector = fitted();
        // spread z = 4.5, vol z = 0
        let anomalies = detector
            .detect(&rows(vec![vec![4.5, 10.0]]), Utc::now())
            .unwrap();
        assert_eq!(anomalies.len(), 1);
        let a = &anomalies[0];
        assert_eq!(a.anomaly_type, AnomalyType::Outlier);
        assert_abs_diff_eq!(a.severity, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(a.crisis_probability, 0.5, epsilon = 1e-12);
        assert_eq!(a.affected, vec!["spread".to_string()]);
    }

    #[test]
    fn test_calibration_outlier_probability_cap() {
        let mut detector = fitted();
        // spread z = 9 -> severity 1.0, probability capped at 0.8
        let anomalies = detector
            .detect(&rows(vec![vec![9.0, 30.0]]), Utc::now())
            .unwrap();
        let a = &anomalies[0];
        assert_eq!(a.severity, 1.0);
        assert_abs_diff_eq!(a.crisis_probability, 0.8, epsilon = 1e-12);
        assert_eq!(a.affected, vec!["spread".to_string(), "vol".to_string()]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut detector = fitted();
        let data = FeatureMatrix::from_rows(vec![vec![1.0, 2.0, 3.0]]);
        assert_eq!(
            detector.detect(&data, Utc::now()),
            Err(DetectorError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );

        let ragged = rows(vec![vec![1.0, 2.0], vec![1.0]]);
        assert!(matches!(
            detector.detect(&ragged, Utc::now()),
            Err(DetectorError::DimensionMismatch { actual: 1, .. })
        ));
    }

    #[test]
    fn test_constant_feature_uses_epsilon() {
        let mut detector = OutlierDetector::new(3.0, 0.8);
        detector
            .fit(&FeatureMatrix::from_rows(vec![vec![1.0], vec![1.0]]))
            .unwrap();
        let anomalies = detector
            .detect(&FeatureMatrix::from_rows(vec![vec![1.001]]), Utc::now())
            .unwrap();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].severity, 1.0);
    }

    #[test]
    fn test_fit_rejects_empty() {
        let mut detector = OutlierDetector::new(3.0, 0.8);
        assert!(matches!(
            detector.fit(&FeatureMatrix::default()),
            Err(DetectorError::InsufficientData { .. })
        ));
        assert!(!detector.is_fitted());
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        let mut detector = fitted();
        let anomalies = detector
            .detect(&rows(vec![vec![f64::NAN, 10.0], vec![0.0, f64::INFINITY]]), Utc::now())
            .unwrap();
        assert!(anomalies.is_empty());

        // The finite spread value is still checked
        let anomalies = detector
            .detect(&rows(vec![vec![4.5, f64::NAN]]), Utc::now())
            .unwrap();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].affected, vec!["spread".to_string()]);
    }
}
