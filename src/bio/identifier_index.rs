// SPDX-License-Identifier: AGPL-3.0-or-later
//! Perturbation identifier → gene symbol index for one modality.
//!
//! Built by inverting per-gene [`PerturbationMatch`] results. Two genes
//! resolving to the same identifier is a catalog data-quality problem:
//! [`CollisionPolicy::Overwrite`] keeps the later gene and logs a warning,
//! [`CollisionPolicy::Reject`] fails the build.

use std::collections::BTreeMap;

use tracing::warn;

use super::resolver::PerturbationMatch;
use crate::error::{Error, Result};

/// What to do when two genes share an identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Later gene replaces the earlier one; a warning is logged.
    #[default]
    Overwrite,
    /// Fail with [`Error::IdentifierCollision`].
    Reject,
}

/// Identifier → gene symbol for a single modality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierIndex {
    modality: String,
    genes: BTreeMap<String, String>,
}

impl IdentifierIndex {
    /// Invert `matches` for `modality`, in the order given.
    ///
    /// Genes with no identifier for `modality` are skipped.
    ///
    /// # Errors
    ///
    /// [`Error::IdentifierCollision`] under [`CollisionPolicy::Reject`].
    pub fn build(
        matches: &[(String, PerturbationMatch)],
        modality: &str,
        policy: CollisionPolicy,
    ) -> Result<Self> {
        let mut genes: BTreeMap<String, String> = BTreeMap::new();
        for (gene, m) in matches {
            let Some(identifier) = m.get(modality) else {
                continue;
            };
            if let Some(previous) = genes.get(identifier) {
                if previous != gene {
                    match policy {
                        CollisionPolicy::Overwrite => warn!(
                            identifier,
                            kept = gene.as_str(),
                            dropped = previous.as_str(),
                            "identifier claimed by two genes; later gene wins"
                        ),
                        CollisionPolicy::Reject => {
                            return Err(Error::IdentifierCollision {
                                identifier: identifier.to_string(),
                                kept: previous.clone(),
                                dropped: gene.clone(),
                            });
                        }
                    }
                }
            }
            genes.insert(identifier.to_string(), gene.clone());
        }
        Ok(Self {
            modality: modality.to_string(),
            genes,
        })
    }

    /// Modality this index covers.
    #[must_use]
    pub fn modality(&self) -> &str {
        &self.modality
    }

    /// Gene symbol for `identifier`.
    #[must_use]
    pub fn gene(&self, identifier: &str) -> Option<&str> {
        self.genes.get(identifier).map(String::as_str)
    }

    /// Whether `identifier` is indexed.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.genes.contains_key(identifier)
    }

    /// Number of identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// True when no gene resolved for this modality.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// (identifier, gene) pairs, identifier-ordered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.genes.iter().map(|(id, g)| (id.as_str(), g.as_str()))
    }
}
