//! Residual-band outlier classification.
//!
//! A point is an outlier iff its residual lies outside
//! `[mean - n_std·std, mean + n_std·std]` (bounds inclusive). Mean and sample
//! standard deviation are taken over all residuals passed in.

use crate::math::{mean, sample_std};

/// Residual statistics and per-point flags.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierBand {
    pub mean: f64,
    /// `None` with fewer than two residuals; nothing is flagged then.
    pub std: Option<f64>,
    pub flags: Vec<bool>,
}

impl OutlierBand {
    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }
}

pub fn classify_outliers(residuals: &[f64], n_std: f64) -> OutlierBand {
    let m = mean(residuals).unwrap_or(0.0);
    let std = sample_std(residuals);

    let flags = match std {
        Some(s) => {
            let lower = m - n_std * s;
            let upper = m + n_std * s;
            residuals.iter().map(|&r| r < lower || r > upper).collect()
        }
        None => vec![false; residuals.len()],
    };

    OutlierBand { mean: m, std, flags }
}
