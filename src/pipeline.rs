// SPDX-License-Identifier: AGPL-3.0-or-later
//! End-to-end heatmap run.
//!
//! ```text
//! load profiles ─► resolve genes ─► index ─► select ─► compute ─► render
//!   [Load]          [Resolution]            [Selection] [Similarity] [Rendering]
//! ```
//!
//! Every failure is wrapped in [`Error::Stage`] with the stage it came
//! from. Nothing is written until the matrix is complete.

use std::path::PathBuf;

use tracing::info;

use crate::bio::identifier_index::IdentifierIndex;
use crate::bio::pairwise;
use crate::bio::resolver::{Catalog, Resolver};
use crate::bio::similarity_matrix::SimilarityMatrix;
use crate::config::PipelineConfig;
use crate::error::{Result, Stage};
use crate::io::catalog::TableCatalog;
use crate::io::profiles::parse_profiles;
use crate::render::{Renderer, TsvMatrixRenderer, render_heatmap};

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Artifact written.
    pub output: PathBuf,
    /// Sorted similarity matrix that was rendered.
    pub matrix: SimilarityMatrix,
    /// Profile rows selected for the genes of interest.
    pub selected: usize,
}

/// Run the pipeline with an injected catalog and renderer.
///
/// # Errors
///
/// [`Error::Stage`](crate::error::Error::Stage) wrapping the first failure.
pub fn run<C, R>(config: &PipelineConfig, catalog: C, renderer: &R) -> Result<PipelineReport>
where
    C: Catalog,
    R: Renderer + ?Sized,
{
    let table = parse_profiles(&config.profiles, &config.schema)
        .map_err(|e| e.in_stage(Stage::Load))?;

    let resolver = Resolver::with_params(catalog, config.resolver.clone());
    let index = resolver
        .resolve_all(&config.genes, &config.modalities)
        .and_then(|matches| {
            IdentifierIndex::build(&matches, &config.modality, config.collision_policy)
        })
        .map_err(|e| e.in_stage(Stage::Resolution))?;
    info!(
        genes = config.genes.len(),
        modality = config.modality.as_str(),
        identifiers = index.len(),
        "resolved genes"
    );

    let features = table
        .select(&index)
        .map_err(|e| e.in_stage(Stage::Selection))?;
    info!(rows = features.n_rows(), "selected profiles");

    let matrix = pairwise::compute(&features, &config.pairwise)
        .map_err(|e| e.in_stage(Stage::Similarity))?;
    info!(n = matrix.n(), metric = %config.pairwise.metric, "computed similarity matrix");

    let output = render_heatmap(renderer, &matrix, &config.output_dir, &config.genes)
        .map_err(|e| e.in_stage(Stage::Rendering))?;

    Ok(PipelineReport {
        output,
        selected: features.n_rows(),
        matrix,
    })
}

/// Run with the catalog file named in `config` and the TSV renderer.
///
/// # Errors
///
/// A catalog that cannot be opened fails in the resolution stage, as
/// an unreachable catalog does in [`run`]; otherwise see [`run`].
pub fn run_from_config(config: &PipelineConfig) -> Result<PipelineReport> {
    let catalog =
        TableCatalog::open(&config.catalog).map_err(|e| e.in_stage(Stage::Resolution))?;
    run(config, catalog, &TsvMatrixRenderer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::resolver::CatalogEntry;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    struct Fixed;

    impl Catalog for Fixed {
        fn query(&self, query: &str, _: &str, _: &str) -> Result<Vec<CatalogEntry>> {
            Ok(match query {
                "CD44" => vec![CatalogEntry::new("crispr", "JCP_1")],
                "HAS2" => vec![CatalogEntry::new("crispr", "JCP_2")],
                _ => vec![],
            })
        }
    }

    fn config(dir: &TempDir, profile_lines: &[&str]) -> PipelineConfig {
        let profiles = dir.path().join("profiles.tsv");
        fs::write(&profiles, profile_lines.join("\n")).unwrap();
        PipelineConfig {
            profiles,
            output_dir: dir.path().join("figs"),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn run_writes_sorted_matrix() {
        let dir = TempDir::new().unwrap();
        let cfg = config(
            &dir,
            &[
                "Metadata_JCP2022\tX_1\tX_2",
                "JCP_2\t0\t1",
                "JCP_1\t1\t0",
                "JCP_9\t5\t5",
                "JCP_1\t2\t0",
            ],
        );
        let report = run(&cfg, Fixed, &TsvMatrixRenderer).unwrap();
        assert_eq!(report.selected, 3);
        assert_eq!(report.matrix.row_labels(), &["CD44", "CD44", "HAS2"]);
        assert_eq!(
            report.output,
            cfg.output_dir.join("heatmap_cosdist_harmony_cd44_has2.tsv")
        );
        assert!(report.output.exists());
    }

    #[test]
    fn empty_selection_fails_in_similarity_stage_without_output() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir, &["Metadata_JCP2022\tX_1", "JCP_9\t1"]);
        let err = run(&cfg, Fixed, &TsvMatrixRenderer).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Similarity));
        assert!(matches!(err, Error::Stage { ref source, .. } if matches!(**source, Error::EmptyInput)));
        assert!(!cfg.output_dir.exists());
    }

    #[test]
    fn missing_profiles_fail_in_load_stage() {
        let dir = TempDir::new().unwrap();
        let cfg = PipelineConfig {
            profiles: dir.path().join("absent.tsv"),
            ..PipelineConfig::default()
        };
        let err = run(&cfg, Fixed, &TsvMatrixRenderer).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Load));
    }

    #[test]
    fn missing_catalog_fails_in_resolution_stage() {
        let dir = TempDir::new().unwrap();
        let mut cfg = config(&dir, &["Metadata_JCP2022\tX_1", "JCP_1\t1"]);
        cfg.catalog = dir.path().join("absent_catalog.tsv");
        let err = run_from_config(&cfg).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Resolution));
        assert!(err.to_string().starts_with("resolution"), "{err}");
        assert!(matches!(
            err,
            Error::Stage { ref source, .. } if matches!(**source, Error::CatalogUnavailable { .. })
        ));
    }
}
