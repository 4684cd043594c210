// SPDX-License-Identifier: AGPL-3.0-or-later
//! Gene symbol → perturbation identifier resolution.
//!
//! A [`Catalog`] answers exact-match lookups on a named column and
//! returns every (modality, identifier) row in catalog order. The
//! [`Resolver`] keeps at most one identifier per requested modality.
//!
//! # Ambiguity
//!
//! A gene can have several CRISPR guides or ORF constructs in the
//! catalog. The default [`MatchPolicy::FirstWins`] keeps the first row
//! the catalog returns and discards the rest with a `warn!`. Catalog
//! order is not guaranteed stable across catalog versions, so analyses
//! that depend on a specific construct should use [`MatchPolicy::Unique`],
//! which fails instead of choosing.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Column holding the gene symbol in the JUMP catalog.
pub const STANDARD_KEY: &str = "standard_key";

/// `output_column` value selecting the catalog's default identifier column.
pub const ALL_COLUMNS: &str = "*";

/// One catalog row: perturbation modality and dataset identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Modality key (`"crispr"`, `"orf"`, `"compound"`).
    pub modality: String,
    /// Dataset-specific perturbation identifier.
    pub identifier: String,
}

impl CatalogEntry {
    /// Build an entry.
    #[must_use]
    pub fn new(modality: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            modality: modality.into(),
            identifier: identifier.into(),
        }
    }
}

/// Exact-match lookup service for perturbation identifiers.
pub trait Catalog {
    /// Every row with `input_column == query`, in catalog order.
    ///
    /// `output_column` names the column supplying the identifier;
    /// [`ALL_COLUMNS`] selects the default identifier column.
    ///
    /// # Errors
    ///
    /// [`Error::CatalogUnavailable`] if the catalog cannot be read;
    /// [`Error::CatalogQuery`] if a column is unknown or the query is empty.
    fn query(&self, query: &str, input_column: &str, output_column: &str)
    -> Result<Vec<CatalogEntry>>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn query(
        &self,
        query: &str,
        input_column: &str,
        output_column: &str,
    ) -> Result<Vec<CatalogEntry>> {
        (**self).query(query, input_column, output_column)
    }
}

/// How to pick one identifier when a modality has several candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Keep the first candidate in catalog order.
    #[default]
    FirstWins,
    /// Fail with [`Error::AmbiguousMatch`] on more than one candidate.
    Unique,
}

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverParams {
    /// Column matched against the gene symbol.
    pub input_column: String,
    /// Column supplying identifiers.
    pub output_column: String,
    /// Tie policy.
    pub match_policy: MatchPolicy,
}

impl Default for ResolverParams {
    fn default() -> Self {
        Self {
            input_column: STANDARD_KEY.to_string(),
            output_column: ALL_COLUMNS.to_string(),
            match_policy: MatchPolicy::FirstWins,
        }
    }
}

/// Identifiers resolved for one gene: modality → identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerturbationMatch {
    by_modality: BTreeMap<String, String>,
}

impl PerturbationMatch {
    /// Identifier for `modality`, if one resolved.
    #[must_use]
    pub fn get(&self, modality: &str) -> Option<&str> {
        self.by_modality.get(modality).map(String::as_str)
    }

    /// Number of modalities resolved.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_modality.len()
    }

    /// True when nothing resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_modality.is_empty()
    }

    /// (modality, identifier) pairs, modality-ordered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_modality
            .iter()
            .map(|(m, id)| (m.as_str(), id.as_str()))
    }
}

/// Resolves gene symbols through an injected [`Catalog`].
pub struct Resolver<C> {
    catalog: C,
    params: ResolverParams,
}

impl<C: Catalog> Resolver<C> {
    /// Resolver with default params (`standard_key`, `*`, first wins).
    pub fn new(catalog: C) -> Self {
        Self::with_params(catalog, ResolverParams::default())
    }

    /// Resolver with explicit params.
    pub const fn with_params(catalog: C, params: ResolverParams) -> Self {
        Self { catalog, params }
    }

    /// Resolve one gene for the requested modalities.
    ///
    /// Modalities with no catalog row are absent from the result.
    ///
    /// # Errors
    ///
    /// Catalog errors propagate unchanged; [`Error::AmbiguousMatch`]
    /// under [`MatchPolicy::Unique`].
    pub fn resolve(&self, gene: &str, modalities: &BTreeSet<String>) -> Result<PerturbationMatch> {
        let rows = self
            .catalog
            .query(gene, &self.params.input_column, &self.params.output_column)?;
        debug!(gene, rows = rows.len(), "catalog query");

        let mut by_modality = BTreeMap::new();
        for modality in modalities {
            let candidates: Vec<&str> = rows
                .iter()
                .filter(|r| &r.modality == modality)
                .map(|r| r.identifier.as_str())
                .collect();
            let Some(&first) = candidates.first() else {
                continue;
            };
            if candidates.len() > 1 {
                match self.params.match_policy {
                    MatchPolicy::FirstWins => warn!(
                        gene,
                        modality = modality.as_str(),
                        kept = first,
                        discarded = candidates.len() - 1,
                        "several catalog identifiers; keeping the first"
                    ),
                    MatchPolicy::Unique => {
                        return Err(Error::AmbiguousMatch {
                            gene: gene.to_string(),
                            modality: modality.clone(),
                            candidates: candidates.iter().map(|s| (*s).to_string()).collect(),
                        });
                    }
                }
            }
            by_modality.insert(modality.clone(), first.to_string());
        }
        Ok(PerturbationMatch { by_modality })
    }

    /// Resolve several genes, in the order given.
    ///
    /// # Errors
    ///
    /// The first error from [`Resolver::resolve`].
    pub fn resolve_all<S: AsRef<str>>(
        &self,
        genes: &[S],
        modalities: &BTreeSet<String>,
    ) -> Result<Vec<(String, PerturbationMatch)>> {
        genes
            .iter()
            .map(|g| {
                let gene = g.as_ref();
                self.resolve(gene, modalities)
                    .map(|m| (gene.to_string(), m))
            })
            .collect()
    }
}

/// Build a modality set from string slices.
#[must_use]
pub fn modality_set(modalities: &[&str]) -> BTreeSet<String> {
    modalities.iter().map(|m| (*m).to_string()).collect()
}
