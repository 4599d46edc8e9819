//! Correlation-Breakdown Detector
//!
//! Compares short-window pairwise correlations against a baseline matrix
//! established once from a historical window. Two independent signals:
//! a pairwise break (largest absolute change above `BREAK_THRESHOLD`) and the
//! crisis signature (mean pairwise correlation above `CRISIS_MEAN_CORRELATION`).

use crate::error::{DetectorError, Result};
use crate::protocol::AnomalyDetector;
use vigil_core::{Anomaly, AnomalyType, AssetReturns, Timestamp, stats};

const NAME: &str = "correlation_breakdown";

/// Absolute correlation change that counts as a break
pub const BREAK_THRESHOLD: f64 = 0.5;

/// Mean pairwise correlation that marks the crisis signature
pub const CRISIS_MEAN_CORRELATION: f64 = 0.85;

/// Fixed severity of the crisis signature
pub const CRISIS_SIGNATURE_SEVERITY: f64 = 0.9;

#[derive(Debug, Clone, PartialEq)]
struct Baseline {
    assets: Vec<String>,
    /// Upper-triangle correlations, `(i, j, rho)` with `i < j`
    pairs: Vec<(usize, usize, f64)>,
}

#[derive(Debug, Clone)]
pub struct CorrelationBreakdownDetector {
    window: usize,
    break_probability_factor: f64,
    crisis_probability: f64,
    baseline: Option<Baseline>,
}

impl CorrelationBreakdownDetector {
    pub fn new(window: usize, break_probability_factor: f64, crisis_probability: f64) -> Self {
        Self {
            window,
            break_probability_factor,
            crisis_probability,
            baseline: None,
        }
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Assets the baseline was established over
    pub fn baseline_assets(&self) -> Option<&[String]> {
        self.baseline.as_ref().map(|b| b.assets.as_slice())
    }

    /// Baseline correlation for one asset pair
    pub fn baseline_correlation(&self, a: &str, b: &str) -> Option<f64> {
        let baseline = self.baseline.as_ref()?;
        let i = baseline.assets.iter().position(|x| x == a)?;
        let j = baseline.assets.iter().position(|x| x == b)?;
        if i == j {
            return Some(1.0);
        }
        baseline.correlation(i, j)
    }

    /// Compute and store the baseline from the full `history`.
    ///
    /// Replaces any previous baseline entirely.
    pub fn establish_baseline(&mut self, history: &AssetReturns) -> Result<()> {
        let pairs = pairwise(history, history.len())?;
        log::info!(
            "[CORRELATION] Baseline over {} assets, {} observations",
            history.n_assets(),
            history.len()
        );
        self.baseline = Some(Baseline {
            assets: history.assets.clone(),
            pairs,
        });
        Ok(())
    }
}

/// Pairwise correlations over the trailing `window` of every series
fn pairwise(returns: &AssetReturns, window: usize) -> Result<Vec<(usize, usize, f64)>> {
    if returns.n_assets() < 2 || returns.returns.len() != returns.n_assets() {
        return Err(DetectorError::insufficient(
            NAME,
            format!("need at least 2 asset series, got {}", returns.returns.len()),
        ));
    }
    let window = window.min(returns.len());
    if window < 2 {
        return Err(DetectorError::insufficient(
            NAME,
            format!("need at least 2 observations, got {}", window),
        ));
    }

    let tails = returns.tail(window);
    let mut pairs = Vec::new();
    for i in 0..tails.len() {
        for j in (i + 1)..tails.len() {
            let rho = stats::correlation(tails[i], tails[j]).unwrap_or(0.0);
            pairs.push((i, j, rho));
        }
    }
    Ok(pairs)
}

impl Baseline {
    fn correlation(&self, i: usize, j: usize) -> Option<f64> {
        self.pairs
            .iter()
            .find(|(x, y, _)| *x == i.min(j) && *y == i.max(j))
            .map(|(_, _, rho)| *rho)
    }
}

impl AnomalyDetector for CorrelationBreakdownDetector {
    type Input = AssetReturns;

    /// Assets are matched to the baseline by name. Baseline assets missing
    /// from `returns` are left out of the pass, as are assets the baseline
    /// never saw.
    fn detect(&mut self, returns: &AssetReturns, at: Timestamp) -> Result<Vec<Anomaly>> {
        let baseline = self
            .baseline
            .as_ref()
            .ok_or_else(|| DetectorError::not_fitted(NAME))?;

        let shared: Vec<(usize, &[f64])> = baseline
            .assets
            .iter()
            .enumerate()
            .filter_map(|(i, name)| returns.series(name).map(|series| (i, series)))
            .collect();
        if shared.len() < 2 {
            return Err(DetectorError::AssetMismatch(format!(
                "{} of baseline {:?} present, need 2",
                shared.len(),
                baseline.assets
            )));
        }
        if shared.len() < baseline.assets.len() {
            log::debug!(
                "[CORRELATION] {} of {} baseline assets present",
                shared.len(),
                baseline.assets.len()
            );
        }

        let shortest = shared.iter().map(|(_, series)| series.len()).min().unwrap_or(0);
        let window = self.window.min(shortest);
        if window < 2 {
            return Err(DetectorError::insufficient(
                NAME,
                format!("need at least 2 observations, got {}", window),
            ));
        }

        // (baseline i, baseline j, then, now)
        let mut current = Vec::new();
        for (a, (i, x)) in shared.iter().enumerate() {
            for (j, y) in &shared[a + 1..] {
                let now = stats::correlation(&x[x.len() - window..], &y[y.len() - window..])
                    .unwrap_or(0.0);
                let then = baseline.correlation(*i, *j).unwrap_or(0.0);
                current.push((*i, *j, then, now));
            }
        }

        let mut anomalies = Vec::new();

        let largest = current
            .iter()
            .map(|(i, j, then, now)| (*i, *j, *then, *now, (now - then).abs()))
            .fold(None, |best: Option<(usize, usize, f64, f64, f64)>, pair| match best {
                Some(b) if b.4 >= pair.4 => Some(b),
                _ => Some(pair),
            });

        if let Some((i, j, then, now, change)) = largest
            && change > BREAK_THRESHOLD
        {
            let severity = (change / BREAK_THRESHOLD).min(1.0);
            anomalies.push(
                Anomaly::new(
                    AnomalyType::CorrelationBreak,
                    severity,
                    severity * self.break_probability_factor,
                    at,
                    format!(
                        "{}/{} correlation moved from {:.2} to {:.2}",
                        baseline.assets[i], baseline.assets[j], then, now
                    ),
                )
                .with_affected([baseline.assets[i].as_str(), baseline.assets[j].as_str()]),
            );
        }

        let rhos: Vec<f64> = current.iter().map(|(_, _, _, now)| *now).collect();
        let mean_rho = stats::mean(&rhos).unwrap_or(0.0);
        if mean_rho > CRISIS_MEAN_CORRELATION {
            anomalies.push(
                Anomaly::new(
                    AnomalyType::CorrelationBreak,
                    CRISIS_SIGNATURE_SEVERITY,
                    self.crisis_probability,
                    at,
                    format!("Correlations converging: mean pairwise {:.2}", mean_rho),
                )
                .with_affected(shared.iter().map(|(i, _)| baseline.assets[*i].as_str()))
                .with_precedent("2008: cross-asset correlations converged toward 1"),
            );
        }

        Ok(anomalies)
    }

    fn is_ready(&self) -> bool {
        self.has_baseline()
    }

    fn name(&self) -> &str {
        NAME
    }
}
