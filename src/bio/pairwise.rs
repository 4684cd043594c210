// SPDX-License-Identifier: AGPL-3.0-or-later
//! All-pairs profile similarity engine.
//!
//! Evaluates a [`Metric`] on every ordered pair of rows of a
//! [`FeatureMatrix`] and returns a labelled n×n [`SimilarityMatrix`].
//!
//! # Algorithm
//!
//! 1. Build the pair set (default: full Cartesian product, n² pairs)
//! 2. Clamp the batch size to `min(batch_size, n)`
//! 3. Score the pairs batch by batch into one flat vector
//! 4. Reshape row-major: pair `k = i*n + j` → `m[i][j]`
//! 5. Label both axes with the row labels and sort each axis ascending
//!
//! Every pair is scored independently of its batch, so results are
//! bitwise-identical for any batch size.

use tracing::{debug, trace};

use super::feature_matrix::FeatureMatrix;
use super::metric::Metric;
use super::pairs::{self, PairMode};
use super::similarity_matrix::SimilarityMatrix;
use crate::error::{Error, Result};

/// Default pairs per batch (the cap used by the cosine heatmap analysis).
pub const DEFAULT_BATCH_SIZE: usize = 200;

/// Configuration for all-pairs computation.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseParams {
    /// Metric evaluated on each pair.
    pub metric: Metric,
    /// Requested pairs per batch; clamped to the sample count.
    pub batch_size: usize,
    /// Pair set to evaluate.
    pub mode: PairMode,
}

impl Default for PairwiseParams {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            mode: PairMode::Cartesian,
        }
    }
}

/// Batch size actually used for `n_samples` rows.
///
/// # Errors
///
/// [`Error::InvalidInput`] if `requested == 0`.
pub fn effective_batch_size(requested: usize, n_samples: usize) -> Result<usize> {
    if requested == 0 {
        return Err(Error::InvalidInput("batch size must be at least 1".into()));
    }
    Ok(requested.min(n_samples).max(1))
}

/// Score `pairs` of `matrix` rows in batches of `batch_size`.
///
/// Returns one value per pair, in pair order.
///
/// # Errors
///
/// [`Error::InvalidInput`] if `batch_size == 0` or a pair index is out
/// of range.
pub fn pairwise_metric(
    matrix: &FeatureMatrix,
    pairs: &[(usize, usize)],
    metric: Metric,
    batch_size: usize,
) -> Result<Vec<f64>> {
    if batch_size == 0 {
        return Err(Error::InvalidInput("batch size must be at least 1".into()));
    }
    let n = matrix.n_rows();
    if let Some(&(i, j)) = pairs.iter().find(|&&(i, j)| i >= n || j >= n) {
        return Err(Error::InvalidInput(format!(
            "pair ({i}, {j}) outside {n} rows"
        )));
    }

    let mut out = Vec::with_capacity(pairs.len());
    for (b, batch) in pairs.chunks(batch_size).enumerate() {
        trace!(batch = b, pairs = batch.len(), "scoring batch");
        out.extend(
            batch
                .iter()
                .map(|&(i, j)| metric.compute(matrix.row(i), matrix.row(j))),
        );
    }
    Ok(out)
}

/// All ordered pairs under `metric`, axes sorted by label.
///
/// # Errors
///
/// [`Error::EmptyInput`] for a matrix with no rows;
/// [`Error::InvalidInput`] for `batch_size == 0`.
///
/// # Examples
///
/// ```
/// use perturbspring::bio::feature_matrix::FeatureMatrix;
/// use perturbspring::bio::metric::Metric;
/// use perturbspring::bio::pairwise::compute_all_pairs;
///
/// let m = FeatureMatrix::new(
///     vec![vec![1.0, 0.0], vec![0.0, 1.0]],
///     vec!["HAS2".into(), "CD44".into()],
/// )
/// .unwrap();
/// let sim = compute_all_pairs(&m, Metric::CosineDistance, 2).unwrap();
/// assert_eq!(sim.row_labels()[0], "CD44");
/// assert_eq!(sim.get(0, 1), 1.0);
/// ```
pub fn compute_all_pairs(
    matrix: &FeatureMatrix,
    metric: Metric,
    batch_size: usize,
) -> Result<SimilarityMatrix> {
    let params = PairwiseParams {
        metric,
        batch_size,
        mode: PairMode::Cartesian,
    };
    compute(matrix, &params)
}

/// All pairs under `params`, axes sorted by label.
///
/// # Errors
///
/// See [`compute_all_pairs`].
pub fn compute(matrix: &FeatureMatrix, params: &PairwiseParams) -> Result<SimilarityMatrix> {
    Ok(compute_unsorted(matrix, params)?.sorted())
}

/// All pairs under `params`, axes in input row order.
///
/// # Errors
///
/// See [`compute_all_pairs`].
pub fn compute_unsorted(
    matrix: &FeatureMatrix,
    params: &PairwiseParams,
) -> Result<SimilarityMatrix> {
    let n = matrix.n_rows();
    if n == 0 {
        return Err(Error::EmptyInput);
    }
    let batch_size = effective_batch_size(params.batch_size, n)?;

    // Mirroring is only valid for symmetric metrics.
    let mode = if params.metric.is_symmetric() {
        params.mode
    } else {
        PairMode::Cartesian
    };
    let pairs = pairs::pairs_for(mode, n);
    debug!(
        n,
        width = matrix.width(),
        metric = %params.metric,
        pairs = pairs.len(),
        batch_size,
        batches = pairs.len().div_ceil(batch_size),
        "computing pairwise metric"
    );

    let scores = pairwise_metric(matrix, &pairs, params.metric, batch_size)?;
    let values = match mode {
        PairMode::Cartesian => scores,
        PairMode::UpperTriangle => mirror_upper(&pairs, &scores, n),
    };
    SimilarityMatrix::from_flat(values, matrix.labels().to_vec())
}

fn mirror_upper(pairs: &[(usize, usize)], scores: &[f64], n: usize) -> Vec<f64> {
    let mut full = vec![0.0; n * n];
    for (&(i, j), &s) in pairs.iter().zip(scores) {
        full[i * n + j] = s;
        full[j * n + i] = s;
    }
    full
}
