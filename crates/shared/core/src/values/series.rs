//! Time-series inputs for the anomaly detectors
//!
//! Each detector consumes one of these shapes. Upstream payloads are adapted
//! into them before they reach the engine.

use serde::{Deserialize, Serialize};

/// Observations as rows, one column per named feature
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    pub features: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn new(features: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        Self { features, rows }
    }

    /// Matrix with generated feature names (`f0`, `f1`, ...)
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let features = (0..width).map(|i| format!("f{i}")).collect();
        Self { features, rows }
    }

    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one feature across all rows
    pub fn column(&self, index: usize) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.get(index).copied())
            .collect()
    }

    /// First row whose width differs from the feature count
    pub fn ragged_row(&self) -> Option<(usize, usize)> {
        self.rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.features.len())
            .map(|(i, row)| (i, row.len()))
    }
}

/// Per-asset return series, all of the same length
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetReturns {
    pub assets: Vec<String>,
    /// `returns[i]` is the series for `assets[i]`
    pub returns: Vec<Vec<f64>>,
}

impl AssetReturns {
    pub fn new(assets: Vec<String>, returns: Vec<Vec<f64>>) -> Self {
        Self { assets, returns }
    }

    pub fn n_assets(&self) -> usize {
        self.assets.len()
    }

    /// Length of the shortest series
    pub fn len(&self) -> usize {
        self.returns.iter().map(Vec::len).min().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn series(&self, asset: &str) -> Option<&[f64]> {
        self.assets
            .iter()
            .position(|a| a == asset)
            .and_then(|i| self.returns.get(i))
            .map(Vec::as_slice)
    }

    /// Trailing `window` observations of every series
    pub fn tail(&self, window: usize) -> Vec<&[f64]> {
        self.returns
            .iter()
            .map(|series| &series[series.len().saturating_sub(window)..])
            .collect()
    }
}

/// Current scalar market conditions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Implied-volatility index level (VIX-like)
    pub vix: f64,
    /// System leverage ratio
    pub leverage: f64,
    /// Credit spread in basis points
    pub credit_spread_bps: f64,
    /// Annualized realized volatility
    pub realized_volatility: f64,
}

/// Everything the anomaly ensemble may consume in one pass.
///
/// Detectors whose input is absent are not run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSeries {
    /// Feature rows for the outlier and pattern detectors
    pub features: Option<FeatureMatrix>,
    /// Periodic market returns for the regime detector
    pub market_returns: Option<Vec<f64>>,
    /// Per-asset returns for the correlation detector
    pub asset_returns: Option<AssetReturns>,
    /// Scalars for the quiet-before-storm check
    pub snapshot: Option<MarketSnapshot>,
}

impl MarketSeries {
    pub fn with_features(mut self, features: FeatureMatrix) -> Self {
        self.features = Some(features);
        self
    }

    pub fn with_market_returns(mut self, returns: Vec<f64>) -> Self {
        self.market_returns = Some(returns);
        self
    }

    pub fn with_asset_returns(mut self, returns: AssetReturns) -> Self {
        self.asset_returns = Some(returns);
        self
    }

    pub fn with_snapshot(mut self, snapshot: MarketSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}
