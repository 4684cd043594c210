// SPDX-License-Identifier: AGPL-3.0-or-later
//! Profile table parser.
//!
//! Reads a delimited export of a harmonized profile table (one row per
//! well, `Metadata_*` columns plus numeric features) and validates it
//! against a [`ProfileSchema`]:
//!
//! - the id column exists exactly once
//! - at least one feature column remains
//! - every row has the header's width
//! - every feature cell parses as a finite `f64` (empty, `NA`, `NaN`
//!   and `inf` cells are rejected)

use std::path::Path;

use tracing::info;

use super::delimited;
use crate::bio::profile::{ProfileSchema, ProfileTable};
use crate::error::{Error, Result};

/// Parse and validate a profile table from `path`.
///
/// # Errors
///
/// [`Error::Io`] on read failure; [`Error::Profile`] on schema violation
/// or an unparseable feature cell.
pub fn parse_profiles(path: &Path, schema: &ProfileSchema) -> Result<ProfileTable> {
    let (header, records) = delimited::read_table(path)?;
    if header.is_empty() {
        return Err(Error::Profile(format!("{}: empty file", path.display())));
    }
    let (id_idx, feature_idx) = schema.classify(&header)?;
    let feature_names: Vec<String> = feature_idx.iter().map(|&i| header[i].clone()).collect();

    let mut identifiers = Vec::with_capacity(records.len());
    let mut rows = Vec::with_capacity(records.len());
    for (line_no, fields) in records {
        if fields.len() != header.len() {
            return Err(Error::Profile(format!(
                "{}:{line_no}: {} fields, header has {}",
                path.display(),
                fields.len(),
                header.len()
            )));
        }
        let mut row = Vec::with_capacity(feature_idx.len());
        for &i in &feature_idx {
            row.push(parse_feature(&fields[i]).ok_or_else(|| {
                Error::Profile(format!(
                    "{}:{line_no}: column {} has non-numeric value {:?}",
                    path.display(),
                    header[i],
                    fields[i]
                ))
            })?);
        }
        identifiers.push(fields[id_idx].clone());
        rows.push(row);
    }

    let table = ProfileTable::new(identifiers, feature_names, rows)?;
    info!(
        path = %path.display(),
        profiles = table.len(),
        features = table.feature_names().len(),
        "loaded profile table"
    );
    Ok(table)
}

fn parse_feature(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}
