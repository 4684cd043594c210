// SPDX-License-Identifier: AGPL-3.0-or-later
//! Pipeline configuration.
//!
//! Defaults reproduce the CD44 / HAS2 CRISPR heatmap. Every field can be
//! overridden from the environment:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `PERTURBSPRING_PROFILES` | `profiles` | `data/profiles.tsv` |
//! | `PERTURBSPRING_CATALOG` | `catalog` | `data/catalog.tsv` |
//! | `PERTURBSPRING_FIGS_DIR` | `output_dir` | `figs` |
//! | `PERTURBSPRING_GENES` | `genes` (comma-separated) | `CD44,HAS2` |
//! | `PERTURBSPRING_MODALITY` | `modality` | `crispr` |
//! | `PERTURBSPRING_METRIC` | `pairwise.metric` | `cosine_distance` |
//! | `PERTURBSPRING_BATCH_SIZE` | `pairwise.batch_size` | `200` |
//!
//! Relative defaults resolve against the crate root, like the validation
//! binaries' data directories.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::bio::identifier_index::CollisionPolicy;
use crate::bio::metric::Metric;
use crate::bio::pairwise::PairwiseParams;
use crate::bio::profile::ProfileSchema;
use crate::bio::resolver::ResolverParams;
use crate::error::{Error, Result};
use crate::validation::data_dir_from;

/// Profile table path.
pub const ENV_PROFILES: &str = "PERTURBSPRING_PROFILES";
/// Catalog table path.
pub const ENV_CATALOG: &str = "PERTURBSPRING_CATALOG";
/// Output directory for the heatmap.
pub const ENV_FIGS_DIR: &str = "PERTURBSPRING_FIGS_DIR";
/// Comma-separated genes of interest.
pub const ENV_GENES: &str = "PERTURBSPRING_GENES";
/// Modality used for row selection.
pub const ENV_MODALITY: &str = "PERTURBSPRING_MODALITY";
/// Metric name accepted by `Metric::from_str`.
pub const ENV_METRIC: &str = "PERTURBSPRING_METRIC";
/// Pairwise batch size, a positive integer.
pub const ENV_BATCH_SIZE: &str = "PERTURBSPRING_BATCH_SIZE";

/// Genes of interest when none are configured.
pub const DEFAULT_GENES: &[&str] = &["CD44", "HAS2"];

/// Modality whose identifiers select profile rows.
pub const DEFAULT_MODALITY: &str = "crispr";

/// Modalities requested from the catalog.
pub const DEFAULT_MODALITIES: &[&str] = &["crispr", "orf"];

/// Everything one pipeline run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Profile table path.
    pub profiles: PathBuf,
    /// Catalog table path.
    pub catalog: PathBuf,
    /// Directory receiving the heatmap artifact.
    pub output_dir: PathBuf,
    /// Genes of interest, in query order.
    pub genes: Vec<String>,
    /// Modality used for row selection.
    pub modality: String,
    /// Modalities resolved per gene.
    pub modalities: BTreeSet<String>,
    /// Metric, batch size and pair mode.
    pub pairwise: PairwiseParams,
    /// Catalog lookup columns and tie policy.
    pub resolver: ResolverParams,
    /// What to do when two genes claim one identifier.
    pub collision_policy: CollisionPolicy,
    /// Profile column classification.
    pub schema: ProfileSchema,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            profiles: data_dir_from(None, "data/profiles.tsv"),
            catalog: data_dir_from(None, "data/catalog.tsv"),
            output_dir: data_dir_from(None, "figs"),
            genes: DEFAULT_GENES.iter().map(|g| (*g).to_string()).collect(),
            modality: DEFAULT_MODALITY.to_string(),
            modalities: DEFAULT_MODALITIES.iter().map(|m| (*m).to_string()).collect(),
            pairwise: PairwiseParams::default(),
            resolver: ResolverParams::default(),
            collision_policy: CollisionPolicy::default(),
            schema: ProfileSchema::default(),
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden from the process environment.
    ///
    /// # Errors
    ///
    /// See [`PipelineConfig::from_lookup`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup(variable)`.
    ///
    /// The selection modality is always added to `modalities`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for an empty gene list, an empty modality or
    /// a batch size that is not a positive integer;
    /// [`Error::UnsupportedMetric`] for an unknown metric name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            profiles: data_dir_from(lookup(ENV_PROFILES), "data/profiles.tsv"),
            catalog: data_dir_from(lookup(ENV_CATALOG), "data/catalog.tsv"),
            output_dir: data_dir_from(lookup(ENV_FIGS_DIR), "figs"),
            ..Self::default()
        };
        if let Some(raw) = lookup(ENV_GENES) {
            config.genes = parse_genes(&raw)?;
        }
        if let Some(raw) = lookup(ENV_MODALITY) {
            let modality = raw.trim();
            if modality.is_empty() {
                return Err(Error::InvalidInput(format!("{ENV_MODALITY} is empty")));
            }
            config.modality = modality.to_string();
        }
        if let Some(raw) = lookup(ENV_METRIC) {
            config.pairwise.metric = raw.trim().parse::<Metric>()?;
        }
        if let Some(raw) = lookup(ENV_BATCH_SIZE) {
            config.pairwise.batch_size = parse_batch_size(&raw)?;
        }
        config.modalities.insert(config.modality.clone());
        Ok(config)
    }
}

fn parse_genes(raw: &str) -> Result<Vec<String>> {
    let genes: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect();
    if genes.is_empty() {
        return Err(Error::InvalidInput(format!("{ENV_GENES} lists no genes")));
    }
    Ok(genes)
}

fn parse_batch_size(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::InvalidInput(format!(
            "{ENV_BATCH_SIZE} must be a positive integer, got {raw:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let c = PipelineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(c.genes, vec!["CD44", "HAS2"]);
        assert_eq!(c.modality, "crispr");
        assert!(c.modalities.contains("crispr") && c.modalities.contains("orf"));
        assert_eq!(c.pairwise.metric, Metric::CosineDistance);
        assert_eq!(c.pairwise.batch_size, 200);
        assert!(c.profiles.ends_with("data/profiles.tsv"));
        assert!(c.output_dir.ends_with("figs"));
        assert_eq!(c, PipelineConfig::default());
    }

    #[test]
    fn overrides() {
        let c = PipelineConfig::from_lookup(lookup(&[
            (ENV_PROFILES, "/tmp/p.csv.gz"),
            (ENV_FIGS_DIR, "/tmp/out"),
            (ENV_GENES, " TP53, ,MDM2 "),
            (ENV_MODALITY, "orf"),
            (ENV_METRIC, "euclidean"),
            (ENV_BATCH_SIZE, "16"),
        ]))
        .unwrap();
        assert_eq!(c.profiles, PathBuf::from("/tmp/p.csv.gz"));
        assert_eq!(c.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(c.genes, vec!["TP53", "MDM2"]);
        assert_eq!(c.modality, "orf");
        assert_eq!(c.pairwise.metric, Metric::Euclidean);
        assert_eq!(c.pairwise.batch_size, 16);
    }

    #[test]
    fn custom_modality_is_resolved() {
        let c = PipelineConfig::from_lookup(lookup(&[(ENV_MODALITY, "compound")])).unwrap();
        assert!(c.modalities.contains("compound"));
    }

    #[test]
    fn invalid_values() {
        assert!(matches!(
            PipelineConfig::from_lookup(lookup(&[(ENV_METRIC, "jaccard")])),
            Err(Error::UnsupportedMetric(_))
        ));
        for bad in ["0", "-3", "many", ""] {
            assert!(matches!(
                PipelineConfig::from_lookup(lookup(&[(ENV_BATCH_SIZE, bad)])),
                Err(Error::InvalidInput(_))
            ));
        }
        assert!(matches!(
            PipelineConfig::from_lookup(lookup(&[(ENV_GENES, " , ")])),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            PipelineConfig::from_lookup(lookup(&[(ENV_MODALITY, "  ")])),
            Err(Error::InvalidInput(_))
        ));
    }
}
