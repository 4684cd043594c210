// SPDX-License-Identifier: AGPL-3.0-or-later
//! Integration tests across bio modules: resolve → index → select → compute.
//!
//! Uses an in-memory catalog so no files or network are involved.

use perturbspring::bio::feature_matrix::FeatureMatrix;
use perturbspring::bio::identifier_index::{CollisionPolicy, IdentifierIndex};
use perturbspring::bio::metric::Metric;
use perturbspring::bio::pairwise::{self, PairwiseParams};
use perturbspring::bio::profile::ProfileTable;
use perturbspring::bio::resolver::{
    Catalog, CatalogEntry, MatchPolicy, Resolver, ResolverParams, modality_set,
};
use perturbspring::error::{Error, Result};
use perturbspring::tolerances;

struct VecCatalog(Vec<(&'static str, &'static str, &'static str)>);

impl Catalog for VecCatalog {
    fn query(&self, query: &str, _: &str, _: &str) -> Result<Vec<CatalogEntry>> {
        Ok(self
            .0
            .iter()
            .filter(|(gene, _, _)| *gene == query)
            .map(|&(_, modality, id)| CatalogEntry::new(modality, id))
            .collect())
    }
}

fn jump_catalog() -> VecCatalog {
    VecCatalog(vec![
        ("CD44", "crispr", "JCP2022_800001"),
        ("CD44", "orf", "JCP2022_900001"),
        ("CD44", "crispr", "JCP2022_800077"),
        ("HAS2", "crispr", "JCP2022_800002"),
        ("TP53", "orf", "JCP2022_900003"),
    ])
}

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| (*s).to_string()).collect()
}

fn profile_table() -> ProfileTable {
    ProfileTable::new(
        strings(&[
            "JCP2022_800002",
            "JCP2022_800001",
            "JCP2022_999999",
            "JCP2022_800001",
            "JCP2022_800077",
        ]),
        strings(&["X_1", "X_2"]),
        vec![
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.5, 0.5],
            vec![3.0, 0.0],
            vec![0.0, -1.0],
        ],
    )
    .unwrap()
}

// ── Resolver ────────────────────────────────────────────────────

#[test]
fn resolve_all_first_wins_per_modality() {
    let catalog = jump_catalog();
    let resolved = Resolver::new(&catalog)
        .resolve_all(&["CD44", "HAS2", "TP53"], &modality_set(&["crispr", "orf"]))
        .unwrap();
    assert_eq!(resolved.len(), 3);
    assert_eq!(resolved[0].0, "CD44");
    assert_eq!(resolved[0].1.get("crispr"), Some("JCP2022_800001"));
    assert_eq!(resolved[0].1.get("orf"), Some("JCP2022_900001"));
    assert_eq!(resolved[1].1.get("orf"), None);
    assert_eq!(resolved[2].1.get("crispr"), None);
}

#[test]
fn unique_policy_rejects_multiple_guides() {
    let catalog = jump_catalog();
    let params = ResolverParams {
        match_policy: MatchPolicy::Unique,
        ..ResolverParams::default()
    };
    let err = Resolver::with_params(&catalog, params)
        .resolve_all(&["HAS2", "CD44"], &modality_set(&["crispr"]))
        .unwrap_err();
    match err {
        Error::AmbiguousMatch {
            gene,
            modality,
            candidates,
        } => {
            assert_eq!(gene, "CD44");
            assert_eq!(modality, "crispr");
            assert_eq!(candidates, strings(&["JCP2022_800001", "JCP2022_800077"]));
        }
        other => panic!("expected AmbiguousMatch, got {other}"),
    }
}

// ── Index + selection ───────────────────────────────────────────

#[test]
fn select_keeps_table_order_and_relabels() {
    let catalog = jump_catalog();
    let resolved = Resolver::new(&catalog)
        .resolve_all(&["CD44", "HAS2"], &modality_set(&["crispr", "orf"]))
        .unwrap();
    let index = IdentifierIndex::build(&resolved, "crispr", CollisionPolicy::Reject).unwrap();
    assert_eq!(index.len(), 2);
    let m = profile_table().select(&index).unwrap();
    assert_eq!(m.labels(), &["HAS2", "CD44", "CD44"]);
    assert_eq!(m.row(2), &[3.0, 0.0]);
}

#[test]
fn shared_identifier_collision_policies() {
    let catalog = VecCatalog(vec![("A", "crispr", "JCP_1"), ("B", "crispr", "JCP_1")]);
    let resolved = Resolver::new(&catalog)
        .resolve_all(&["A", "B"], &modality_set(&["crispr"]))
        .unwrap();

    let index = IdentifierIndex::build(&resolved, "crispr", CollisionPolicy::Overwrite).unwrap();
    assert_eq!(index.gene("JCP_1"), Some("B"));

    let err = IdentifierIndex::build(&resolved, "crispr", CollisionPolicy::Reject).unwrap_err();
    assert!(matches!(
        err,
        Error::IdentifierCollision { ref kept, ref dropped, .. } if kept == "A" && dropped == "B"
    ));
}

// ── End-to-end compute ──────────────────────────────────────────

#[test]
fn cd44_has2_cosine_distance_heatmap() {
    let catalog = jump_catalog();
    let resolved = Resolver::new(&catalog)
        .resolve_all(&["CD44", "HAS2"], &modality_set(&["crispr", "orf"]))
        .unwrap();
    let index = IdentifierIndex::build(&resolved, "crispr", CollisionPolicy::default()).unwrap();
    let features = profile_table().select(&index).unwrap();
    let s = pairwise::compute(&features, &PairwiseParams::default()).unwrap();

    assert_eq!(s.shape(), (3, 3));
    assert_eq!(s.row_labels(), &["CD44", "CD44", "HAS2"]);
    for i in 0..3 {
        assert!(s.get(i, i).abs() < tolerances::COSINE_IDENTITY);
    }
    // The two CD44 rows are collinear ([1,0] and [3,0]).
    assert!(s.get(0, 1).abs() < tolerances::ANALYTICAL_F64);
    assert!((s.get(0, 2) - 1.0).abs() < tolerances::ANALYTICAL_F64);
    assert!((s.get(2, 1) - 1.0).abs() < tolerances::ANALYTICAL_F64);
}

#[test]
fn reference_matrix_batch_two() {
    let m = FeatureMatrix::new(
        vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]],
        strings(&["CD44", "HAS2", "CD44"]),
    )
    .unwrap();
    let s = pairwise::compute_all_pairs(&m, Metric::CosineDistance, 2).unwrap();
    assert_eq!(
        s.to_rows(),
        vec![
            vec![0.0, 0.0, 1.0],
            vec![0.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ]
    );
    assert_eq!(s.get_by_label("HAS2", "CD44"), Some(1.0));
}

#[test]
fn cosine_similarity_and_distance_agree() {
    let m = FeatureMatrix::new(
        vec![vec![1.0, 2.0, 3.0], vec![-1.0, 0.5, 2.0], vec![4.0, 0.0, -1.0]],
        strings(&["A", "B", "C"]),
    )
    .unwrap();
    let sim = pairwise::compute_all_pairs(&m, Metric::CosineSimilarity, 3).unwrap();
    let dist = pairwise::compute_all_pairs(&m, Metric::CosineDistance, 3).unwrap();
    for (s, d) in sim.values().iter().zip(dist.values()) {
        assert!((1.0 - s - d).abs() < tolerances::ANALYTICAL_F64);
    }
}

#[test]
fn unmatched_genes_give_empty_input() {
    let catalog = jump_catalog();
    let resolved = Resolver::new(&catalog)
        .resolve_all(&["TP53"], &modality_set(&["crispr", "orf"]))
        .unwrap();
    let index = IdentifierIndex::build(&resolved, "crispr", CollisionPolicy::default()).unwrap();
    assert!(index.is_empty());
    let features = profile_table().select(&index).unwrap();
    assert!(matches!(
        pairwise::compute(&features, &PairwiseParams::default()),
        Err(Error::EmptyInput)
    ));
}
