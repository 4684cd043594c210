// SPDX-License-Identifier: AGPL-3.0-or-later
//! Labelled feature matrix, the input to the pairwise engine.
//!
//! Rows are samples (one perturbation well/profile each), columns are
//! numeric features. Storage is flat row-major; every row has the same
//! width, checked at construction.

use crate::error::{Error, Result};

/// Fixed-width numeric profiles with one label per row.
///
/// Labels are typically gene symbols and need not be unique (replicate
/// wells of the same perturbation share a label).
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    values: Vec<f64>,
    labels: Vec<String>,
    width: usize,
}

impl FeatureMatrix {
    /// Build from per-row vectors and a parallel label sequence.
    ///
    /// An empty `rows` is accepted here; the engine rejects it with
    /// [`Error::EmptyInput`].
    ///
    /// # Errors
    ///
    /// [`Error::InconsistentShape`] if a row's width differs from row 0;
    /// [`Error::InvalidInput`] if `labels.len() != rows.len()`.
    pub fn new(rows: Vec<Vec<f64>>, labels: Vec<String>) -> Result<Self> {
        if labels.len() != rows.len() {
            return Err(Error::InvalidInput(format!(
                "{} labels for {} rows",
                labels.len(),
                rows.len()
            )));
        }
        let width = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(width * rows.len());
        for (row, r) in rows.iter().enumerate() {
            if r.len() != width {
                return Err(Error::InconsistentShape {
                    row,
                    expected: width,
                    found: r.len(),
                });
            }
            values.extend_from_slice(r);
        }
        Ok(Self {
            values,
            labels,
            width,
        })
    }

    /// Build from an already-flat row-major buffer.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if `values.len() != labels.len() * width`.
    pub fn from_flat(values: Vec<f64>, labels: Vec<String>, width: usize) -> Result<Self> {
        if values.len() != labels.len() * width {
            return Err(Error::InvalidInput(format!(
                "flat buffer of {} values does not hold {} rows × {width} features",
                values.len(),
                labels.len()
            )));
        }
        Ok(Self {
            values,
            labels,
            width,
        })
    }

    /// Number of samples.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.labels.len()
    }

    /// Features per sample.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// True when the matrix has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Feature vector of row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_rows()`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.width..(i + 1) * self.width]
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.n_rows()).map(move |i| self.row(i))
    }

    /// Row labels in row order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn new_stores_rows_in_order() {
        let m = FeatureMatrix::new(
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]],
            labels(&["CD44", "HAS2", "CD44"]),
        )
        .unwrap();
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.width(), 2);
        assert_eq!(m.row(1), &[0.0, 1.0]);
        assert_eq!(m.labels()[2], "CD44");
        assert_eq!(m.rows().count(), 3);
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = FeatureMatrix::new(
            vec![vec![1.0, 0.0], vec![0.0, 1.0, 2.0]],
            labels(&["A", "B"]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InconsistentShape {
                row: 1,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn label_count_mismatch_rejected() {
        let err = FeatureMatrix::new(vec![vec![1.0]], labels(&["A", "B"])).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn empty_matrix_is_constructible() {
        let m = FeatureMatrix::new(vec![], vec![]).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.width(), 0);
    }

    #[test]
    fn from_flat_checks_length() {
        let ok = FeatureMatrix::from_flat(vec![1.0, 2.0, 3.0, 4.0], labels(&["A", "B"]), 2);
        assert!(ok.is_ok());
        let bad = FeatureMatrix::from_flat(vec![1.0, 2.0, 3.0], labels(&["A", "B"]), 2);
        assert!(matches!(bad, Err(Error::InvalidInput(_))));
    }
}
