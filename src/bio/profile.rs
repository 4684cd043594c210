// SPDX-License-Identifier: AGPL-3.0-or-later
//! Perturbation profile table with an explicit column schema.
//!
//! JUMP profile tables mix metadata columns (`Metadata_Source`,
//! `Metadata_Plate`, `Metadata_JCP2022`, ...) with numeric feature
//! columns. [`ProfileSchema`] names the metadata columns and the prefix
//! that marks further metadata; every other column is a feature.

use tracing::debug;

use super::feature_matrix::FeatureMatrix;
use super::identifier_index::IdentifierIndex;
use crate::error::{Error, Result};

/// Identifier column in JUMP harmonized profiles.
pub const JCP2022_COLUMN: &str = "Metadata_JCP2022";

/// Prefix marking a metadata column.
pub const METADATA_PREFIX: &str = "Metadata";

/// Column schema for profile tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSchema {
    /// Column carrying the perturbation identifier per row.
    pub id_column: String,
    /// Prefix classifying a column as metadata.
    pub metadata_prefix: String,
    /// Extra metadata columns that do not carry the prefix.
    pub metadata_columns: Vec<String>,
}

impl Default for ProfileSchema {
    fn default() -> Self {
        Self {
            id_column: JCP2022_COLUMN.to_string(),
            metadata_prefix: METADATA_PREFIX.to_string(),
            metadata_columns: Vec::new(),
        }
    }
}

impl ProfileSchema {
    /// Whether `column` is a metadata column.
    #[must_use]
    pub fn is_metadata(&self, column: &str) -> bool {
        column == self.id_column
            || column.starts_with(&self.metadata_prefix)
            || self.metadata_columns.iter().any(|c| c == column)
    }

    /// Whether `column` is a numeric feature column.
    #[must_use]
    pub fn is_feature(&self, column: &str) -> bool {
        !self.is_metadata(column)
    }

    /// Split a header into (id column index, feature column indices).
    ///
    /// # Errors
    ///
    /// [`Error::Profile`] if the id column is missing, duplicated, or no
    /// feature column remains.
    pub fn classify(&self, header: &[String]) -> Result<(usize, Vec<usize>)> {
        let id_positions: Vec<usize> = header
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == self.id_column)
            .map(|(i, _)| i)
            .collect();
        let id_idx = match id_positions.as_slice() {
            [i] => *i,
            [] => {
                return Err(Error::Profile(format!(
                    "missing id column {}",
                    self.id_column
                )));
            }
            _ => {
                return Err(Error::Profile(format!(
                    "id column {} appears {} times",
                    self.id_column,
                    id_positions.len()
                )));
            }
        };
        let features: Vec<usize> = header
            .iter()
            .enumerate()
            .filter(|(_, c)| self.is_feature(c))
            .map(|(i, _)| i)
            .collect();
        if features.is_empty() {
            return Err(Error::Profile("no feature columns".into()));
        }
        Ok((id_idx, features))
    }
}

/// Validated profile table: one identifier and one feature vector per row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileTable {
    identifiers: Vec<String>,
    feature_names: Vec<String>,
    values: Vec<f64>,
}

impl ProfileTable {
    /// Build from parallel identifiers and rows.
    ///
    /// # Errors
    ///
    /// [`Error::InconsistentShape`] if a row width differs from
    /// `feature_names.len()`; [`Error::Profile`] on a non-finite value or
    /// an identifier/row count mismatch.
    pub fn new(
        identifiers: Vec<String>,
        feature_names: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if identifiers.len() != rows.len() {
            return Err(Error::Profile(format!(
                "{} identifiers for {} rows",
                identifiers.len(),
                rows.len()
            )));
        }
        let width = feature_names.len();
        let mut values = Vec::with_capacity(width * rows.len());
        for (row, r) in rows.iter().enumerate() {
            if r.len() != width {
                return Err(Error::InconsistentShape {
                    row,
                    expected: width,
                    found: r.len(),
                });
            }
            if let Some(col) = r.iter().position(|v| !v.is_finite()) {
                return Err(Error::Profile(format!(
                    "row {row}, feature {}: non-finite value",
                    feature_names[col]
                )));
            }
            values.extend_from_slice(r);
        }
        Ok(Self {
            identifiers,
            feature_names,
            values,
        })
    }

    /// Number of profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// True when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Perturbation identifiers in row order.
    #[must_use]
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Feature column names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Feature vector of row `i`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        let w = self.feature_names.len();
        &self.values[i * w..(i + 1) * w]
    }

    /// Rows whose identifier is in `index`, relabelled with the gene symbol.
    ///
    /// Row order of the table is preserved. An index matching no row
    /// yields an empty matrix (the engine then reports `EmptyInput`).
    ///
    /// # Errors
    ///
    /// Propagates [`FeatureMatrix::from_flat`] errors (not expected for a
    /// validated table).
    pub fn select(&self, index: &IdentifierIndex) -> Result<FeatureMatrix> {
        let width = self.feature_names.len();
        let mut values = Vec::new();
        let mut labels = Vec::new();
        for (i, id) in self.identifiers.iter().enumerate() {
            if let Some(gene) = index.gene(id) {
                values.extend_from_slice(self.row(i));
                labels.push(gene.to_string());
            }
        }
        debug!(
            modality = index.modality(),
            selected = labels.len(),
            of = self.len(),
            "selected profiles"
        );
        FeatureMatrix::from_flat(values, labels, width)
    }
}
