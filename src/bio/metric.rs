// SPDX-License-Identifier: AGPL-3.0-or-later
//! Pairwise profile metrics.
//!
//! Each [`Metric`] maps two equal-width feature vectors to one `f64`.
//! Similarities (cosine, |cosine|, Pearson) peak at 1.0 for identical
//! profiles; distances (cosine distance, Euclidean, Manhattan, Chebyshev)
//! are 0.0 for identical profiles.
//!
//! # Zero-norm convention
//!
//! Cosine-family metrics return similarity 0.0 (distance 1.0) when either
//! vector has zero norm, matching `spectral_match::cosine_similarity`.
//! Pearson returns 0.0 when either vector is constant.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Supported pairwise metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Metric {
    /// cos(θ) = (a·b) / (‖a‖ × ‖b‖).
    CosineSimilarity,
    /// 1 − cos(θ).
    #[default]
    CosineDistance,
    /// |cos(θ)|.
    AbsCosine,
    /// Pearson correlation (cosine of mean-centred vectors).
    Correlation,
    /// L2 distance.
    Euclidean,
    /// L1 distance.
    Manhattan,
    /// L∞ distance.
    Chebyshev,
}

impl Metric {
    /// All metrics, in declaration order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CosineSimilarity,
            Self::CosineDistance,
            Self::AbsCosine,
            Self::Correlation,
            Self::Euclidean,
            Self::Manhattan,
            Self::Chebyshev,
        ]
    }

    /// Canonical name, accepted by [`Metric::from_str`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CosineSimilarity => "cosine",
            Self::CosineDistance => "cosine_distance",
            Self::AbsCosine => "abs_cosine",
            Self::Correlation => "correlation",
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
            Self::Chebyshev => "chebyshev",
        }
    }

    /// Value of `m(a, a)` for any non-degenerate vector `a`.
    #[must_use]
    pub const fn identity(self) -> f64 {
        match self {
            Self::CosineSimilarity | Self::AbsCosine | Self::Correlation => 1.0,
            Self::CosineDistance | Self::Euclidean | Self::Manhattan | Self::Chebyshev => 0.0,
        }
    }

    /// Whether `m(a, b) == m(b, a)`. True for every metric offered here.
    #[must_use]
    pub const fn is_symmetric(self) -> bool {
        true
    }

    /// Evaluate the metric on two equal-width vectors.
    ///
    /// Widths are validated by the caller ([`super::feature_matrix::FeatureMatrix`]
    /// guarantees it); `debug_assert` only.
    #[must_use]
    pub fn compute(self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        match self {
            Self::CosineSimilarity => cosine(a, b),
            Self::CosineDistance => 1.0 - cosine(a, b),
            Self::AbsCosine => cosine(a, b).abs(),
            Self::Correlation => pearson(a, b),
            Self::Euclidean => a
                .iter()
                .zip(b)
                .map(|(&x, &y)| (x - y) * (x - y))
                .sum::<f64>()
                .sqrt(),
            Self::Manhattan => a.iter().zip(b).map(|(&x, &y)| (x - y).abs()).sum(),
            Self::Chebyshev => a
                .iter()
                .zip(b)
                .map(|(&x, &y)| (x - y).abs())
                .fold(0.0, f64::max),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        match key.as_str() {
            "cosine" | "cosine_similarity" => Ok(Self::CosineSimilarity),
            "cosine_distance" | "cosdist" => Ok(Self::CosineDistance),
            "abs_cosine" => Ok(Self::AbsCosine),
            "correlation" | "pearson" => Ok(Self::Correlation),
            "euclidean" => Ok(Self::Euclidean),
            "manhattan" => Ok(Self::Manhattan),
            "chebyshev" => Ok(Self::Chebyshev),
            _ => Err(Error::UnsupportedMetric(s.to_string())),
        }
    }
}

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom > 0.0 { dot / denom } else { 0.0 }
}

#[allow(clippy::cast_precision_loss)] // feature widths < 2^53
fn pearson(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    let denom = var_a.sqrt() * var_b.sqrt();
    if denom > 0.0 { cov / denom } else { 0.0 }
}
