// SPDX-License-Identifier: AGPL-3.0-or-later
//! Row-index pair sets for all-pairs computation.
//!
//! The default set is the full Cartesian product `[0, n) × [0, n)`:
//! n² ordered pairs, self-pairs included, both orderings of every
//! off-diagonal pair. Pair `k` is `(k / n, k % n)`, so a flat result
//! vector reshapes row-major into the n×n matrix.
//!
//! The upper-triangle set (`i <= j`, n(n+1)/2 pairs) is an opt-in
//! shortcut for symmetric metrics.

/// Which pairs the engine evaluates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PairMode {
    /// All n² ordered pairs.
    #[default]
    Cartesian,
    /// `i <= j` only, mirrored into the lower triangle afterwards.
    UpperTriangle,
}

/// Full Cartesian product of row indices, row-major.
///
/// ```
/// use perturbspring::bio::pairs::cartesian;
///
/// assert_eq!(cartesian(2), vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
/// ```
#[must_use]
pub fn cartesian(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            pairs.push((i, j));
        }
    }
    pairs
}

/// Upper triangle including the diagonal, row-major.
#[must_use]
pub fn upper_triangle(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(n * (n + 1) / 2);
    for i in 0..n {
        for j in i..n {
            pairs.push((i, j));
        }
    }
    pairs
}

/// Pair set for `mode`.
#[must_use]
pub fn pairs_for(mode: PairMode, n: usize) -> Vec<(usize, usize)> {
    match mode {
        PairMode::Cartesian => cartesian(n),
        PairMode::UpperTriangle => upper_triangle(n),
    }
}
