// SPDX-License-Identifier: AGPL-3.0-or-later
//! Delimited-text perturbation catalog.
//!
//! An export of the JUMP gene/compound lookup table, one row per
//! perturbation:
//!
//! ```text
//! standard_key  plate_type  JCP2022          ...
//! CD44          crispr      JCP2022_800001
//! CD44          orf         JCP2022_900001
//! ```
//!
//! Held in memory; queries are exact string matches on one column and
//! return rows in file order.

use std::path::Path;

use tracing::info;

use super::delimited;
use crate::bio::resolver::{ALL_COLUMNS, Catalog, CatalogEntry};
use crate::error::{Error, Result};

/// Column holding the perturbation modality.
pub const MODALITY_COLUMN: &str = "plate_type";

/// Column holding the default perturbation identifier.
pub const IDENTIFIER_COLUMN: &str = "JCP2022";

/// In-memory catalog table.
#[derive(Debug, Clone)]
pub struct TableCatalog {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    modality_idx: usize,
    identifier_idx: usize,
}

impl TableCatalog {
    /// Load a catalog file (`.tsv`, `.csv`, optionally `.gz`).
    ///
    /// # Errors
    ///
    /// [`Error::CatalogUnavailable`] if the file cannot be read, lacks the
    /// modality or identifier column, or has a malformed row.
    pub fn open(path: &Path) -> Result<Self> {
        let (header, records) =
            delimited::read_table(path).map_err(|e| Error::CatalogUnavailable {
                reason: format!("cannot read {}", path.display()),
                source: Some(Box::new(e)),
            })?;
        let mut rows = Vec::with_capacity(records.len());
        for (line_no, fields) in records {
            if fields.len() != header.len() {
                return Err(Error::catalog_unavailable(format!(
                    "{}:{line_no}: {} fields, header has {}",
                    path.display(),
                    fields.len(),
                    header.len()
                )));
            }
            rows.push(fields);
        }
        let catalog = Self::from_rows(header, rows)?;
        info!(path = %path.display(), rows = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    /// Build from an in-memory header and rows.
    ///
    /// # Errors
    ///
    /// [`Error::CatalogUnavailable`] if the modality or identifier column
    /// is missing, or a row width differs from the header.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let find = |name: &str| {
            columns.iter().position(|c| c == name).ok_or_else(|| {
                Error::catalog_unavailable(format!("catalog has no {name} column"))
            })
        };
        let modality_idx = find(MODALITY_COLUMN)?;
        let identifier_idx = find(IDENTIFIER_COLUMN)?;
        if let Some(bad) = rows.iter().position(|r| r.len() != columns.len()) {
            return Err(Error::catalog_unavailable(format!(
                "catalog row {bad} has {} fields, header has {}",
                rows[bad].len(),
                columns.len()
            )));
        }
        Ok(Self {
            columns,
            rows,
            modality_idx,
            identifier_idx,
        })
    }

    /// Number of catalog rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the catalog has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::CatalogQuery(format!("unknown column {name}")))
    }
}

impl Catalog for TableCatalog {
    fn query(
        &self,
        query: &str,
        input_column: &str,
        output_column: &str,
    ) -> Result<Vec<CatalogEntry>> {
        if query.is_empty() {
            return Err(Error::CatalogQuery("empty query".into()));
        }
        let input_idx = self.column(input_column)?;
        let output_idx = if output_column == ALL_COLUMNS {
            self.identifier_idx
        } else {
            self.column(output_column)?
        };
        Ok(self
            .rows
            .iter()
            .filter(|r| r[input_idx] == query)
            .map(|r| CatalogEntry::new(r[self.modality_idx].as_str(), r[output_idx].as_str()))
            .collect())
    }
}
