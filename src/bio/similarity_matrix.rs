// SPDX-License-Identifier: AGPL-3.0-or-later
//! Labelled n×n similarity matrix with sortable axes.
//!
//! The engine produces values in input row order; [`SimilarityMatrix::sorted`]
//! reorders rows by row label and columns by column label, each axis
//! independently and ascending. The sort is stable, so rows sharing a
//! label keep their input order and sorting is idempotent.

use crate::error::{Error, Result};

/// Square metric matrix addressable by label on both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    values: Vec<f64>,
    row_labels: Vec<String>,
    col_labels: Vec<String>,
}

impl SimilarityMatrix {
    /// Wrap a flat row-major buffer of `labels.len()²` values.
    ///
    /// Row and column labels both start as `labels`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if `values.len() != labels.len()²`.
    pub fn from_flat(values: Vec<f64>, labels: Vec<String>) -> Result<Self> {
        let n = labels.len();
        if values.len() != n * n {
            return Err(Error::InvalidInput(format!(
                "{} values cannot fill a {n}×{n} matrix",
                values.len()
            )));
        }
        Ok(Self {
            values,
            col_labels: labels.clone(),
            row_labels: labels,
        })
    }

    /// Side length.
    #[must_use]
    pub fn n(&self) -> usize {
        self.row_labels.len()
    }

    /// (rows, columns).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.row_labels.len(), self.col_labels.len())
    }

    /// Entry at row `i`, column `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let n = self.n();
        assert!(i < n && j < n, "index ({i}, {j}) outside {n}×{n} matrix");
        self.values[i * n + j]
    }

    /// Row `i` as a slice.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.n();
        &self.values[i * n..(i + 1) * n]
    }

    /// Entry at the first row labelled `row` and first column labelled `col`.
    #[must_use]
    pub fn get_by_label(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.row_labels.iter().position(|l| l == row)?;
        let j = self.col_labels.iter().position(|l| l == col)?;
        Some(self.get(i, j))
    }

    /// Row-axis labels.
    #[must_use]
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Column-axis labels.
    #[must_use]
    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    /// Flat row-major values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Copy out as nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.n()).map(|i| self.row(i).to_vec()).collect()
    }

    /// Both axes ascending by label.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.row_labels.windows(2).all(|w| w[0] <= w[1])
            && self.col_labels.windows(2).all(|w| w[0] <= w[1])
    }

    /// Reorder rows by row label and columns by column label (stable, ascending).
    #[must_use]
    pub fn sorted(&self) -> Self {
        let n = self.n();
        let row_order = stable_order(&self.row_labels);
        let col_order = stable_order(&self.col_labels);

        let mut values = Vec::with_capacity(n * n);
        for &r in &row_order {
            let src = &self.values[r * n..(r + 1) * n];
            values.extend(col_order.iter().map(|&c| src[c]));
        }

        Self {
            values,
            row_labels: row_order.iter().map(|&r| self.row_labels[r].clone()).collect(),
            col_labels: col_order.iter().map(|&c| self.col_labels[c].clone()).collect(),
        }
    }
}

fn stable_order(labels: &[String]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by(|&a, &b| labels[a].cmp(&labels[b]));
    order
}
