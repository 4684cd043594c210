// SPDX-License-Identifier: AGPL-3.0-or-later
//! Validate the pairwise similarity engine against analytical expectations.
//!
//! | Field | Value |
//! |-------|-------|
//! | Exact command | `cargo run --bin validate_pairwise` |
//! | Data | Synthetic (orthogonal and collinear profiles) |
//!
//! # Methodology
//!
//! 1. **Determinism**: repeated runs are bitwise-equal
//! 2. **Batch invariance**: every batch size gives the same matrix
//! 3. **Identity**: cosine diagonals are 1 (similarity) and 0 (distance)
//! 4. **Symmetry**: `m[i][j] == m[j][i]` for cosine
//! 5. **Shape**: n×n output
//! 6. **Sorting**: label sort is idempotent
//! 7. **End-to-end**: the CD44 / HAS2 reference matrix
//! 8. **Errors**: empty input and unknown metric names are rejected

use perturbspring::bio::feature_matrix::FeatureMatrix;
use perturbspring::bio::metric::Metric;
use perturbspring::bio::pairs::PairMode;
use perturbspring::bio::pairwise::{self, PairwiseParams};
use perturbspring::error::Error;
use perturbspring::tolerances;
use perturbspring::validation::{self, Validator};

fn main() {
    let mut v = Validator::new("perturbSpring Pairwise Engine Validation");

    validate_determinism(&mut v);
    validate_identity_and_symmetry(&mut v);
    validate_sorting(&mut v);
    validate_reference(&mut v);
    validate_errors(&mut v);

    v.finish();
}

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

/// Deterministic pseudo-profiles: 7 rows × 32 features.
fn synthetic() -> FeatureMatrix {
    let genes = ["TP53", "CD44", "MDM2", "HAS2", "CD44", "EGFR", "TP53"];
    let rows: Vec<Vec<f64>> = (0..genes.len())
        .map(|i| {
            (0..32)
                .map(|j| {
                    let x = (i * 31 + j * 17) % 23;
                    f64::from(u32::try_from(x).unwrap_or(0)) / 7.0 - 1.5
                })
                .collect()
        })
        .collect();
    FeatureMatrix::new(rows, labels(&genes)).expect("synthetic matrix is rectangular")
}

// ── Determinism and batch invariance ────────────────────────────────────────

fn validate_determinism(v: &mut Validator) {
    v.section("Determinism / batch invariance");
    let m = synthetic();
    let params = PairwiseParams::default();
    let a = pairwise::compute(&m, &params).expect("compute");
    let b = pairwise::compute(&m, &params).expect("compute");
    v.check_bits("rerun", a.values(), b.values());
    v.check_bool("rerun labels", a.row_labels() == b.row_labels());

    for batch_size in [1, 2, 3, 7, 200] {
        let p = PairwiseParams {
            batch_size,
            ..PairwiseParams::default()
        };
        let c = pairwise::compute(&m, &p).expect("compute");
        v.check_bits(&format!("batch {batch_size} == batch 200"), c.values(), a.values());
    }

    let upper = PairwiseParams {
        mode: PairMode::UpperTriangle,
        ..PairwiseParams::default()
    };
    let u = pairwise::compute(&m, &upper).expect("compute");
    v.check_bits("upper triangle == cartesian", u.values(), a.values());
}

// ── Identity, symmetry, shape ───────────────────────────────────────────────

fn validate_identity_and_symmetry(v: &mut Validator) {
    v.section("Identity / symmetry / shape");
    let m = synthetic();
    let n = m.n_rows();
    for metric in [Metric::CosineSimilarity, Metric::CosineDistance] {
        let params = PairwiseParams {
            metric,
            ..PairwiseParams::default()
        };
        let s = pairwise::compute_unsorted(&m, &params).expect("compute");
        let (rows, cols) = s.shape();
        v.check_count(&format!("{metric} rows"), rows, n);
        v.check_count(&format!("{metric} cols"), cols, n);

        let worst_diag = (0..n)
            .map(|i| (s.get(i, i) - metric.identity()).abs())
            .fold(0.0_f64, f64::max);
        v.check(
            &format!("{metric} diagonal"),
            worst_diag,
            0.0,
            tolerances::COSINE_IDENTITY,
        );

        let mut worst_asym = 0.0_f64;
        for i in 0..n {
            for j in 0..n {
                worst_asym = worst_asym.max((s.get(i, j) - s.get(j, i)).abs());
            }
        }
        v.check(
            &format!("{metric} symmetry"),
            worst_asym,
            0.0,
            tolerances::COSINE_SYMMETRY,
        );
    }
}

// ── Label sorting ───────────────────────────────────────────────────────────

fn validate_sorting(v: &mut Validator) {
    v.section("Label sorting");
    let s = pairwise::compute(&synthetic(), &PairwiseParams::default()).expect("compute");
    v.check_bool("axes sorted", s.is_sorted());
    let twice = s.sorted();
    v.check_bits("sort idempotent", twice.values(), s.values());
    v.check_bool("sort idempotent labels", twice.row_labels() == s.row_labels());
    v.check_bool("column labels mirror rows", s.row_labels() == s.col_labels());
}

// ── CD44 / HAS2 reference ───────────────────────────────────────────────────

fn validate_reference(v: &mut Validator) {
    v.section("CD44 / HAS2 reference");
    let m = FeatureMatrix::new(
        vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]],
        labels(&["CD44", "HAS2", "CD44"]),
    )
    .expect("reference matrix");
    let params = PairwiseParams {
        metric: Metric::CosineDistance,
        batch_size: 2,
        mode: PairMode::Cartesian,
    };
    let s = pairwise::compute(&m, &params).expect("compute");
    v.check_count("3×3", s.n(), 3);
    v.check_bool(
        "axes CD44, CD44, HAS2",
        s.row_labels() == ["CD44", "CD44", "HAS2"],
    );
    for i in 0..3 {
        v.check(&format!("diag[{i}]"), s.get(i, i), 0.0, tolerances::ANALYTICAL_F64);
    }
    v.check("CD44 vs CD44", s.get(0, 1), 0.0, tolerances::ANALYTICAL_F64);
    v.check("CD44 vs HAS2", s.get(0, 2), 1.0, tolerances::ANALYTICAL_F64);
    v.check("HAS2 vs CD44", s.get(2, 1), 1.0, tolerances::ANALYTICAL_F64);
    #[rustfmt::skip]
    let expected = [
        0.0, 0.0, 1.0,
        0.0, 0.0, 1.0,
        1.0, 1.0, 0.0,
    ];
    v.check(
        "max deviation from reference",
        validation::max_abs_deviation(s.values(), &expected),
        0.0,
        tolerances::ANALYTICAL_F64,
    );
}

// ── Error cases ─────────────────────────────────────────────────────────────

fn validate_errors(v: &mut Validator) {
    v.section("Error cases");
    let empty = FeatureMatrix::new(vec![], vec![]).expect("empty matrix");
    let params = PairwiseParams {
        metric: Metric::CosineDistance,
        batch_size: 1,
        mode: PairMode::Cartesian,
    };
    v.check_bool(
        "empty matrix → EmptyInput",
        matches!(pairwise::compute(&empty, &params), Err(Error::EmptyInput)),
    );
    v.check_bool(
        "unknown metric → UnsupportedMetric",
        matches!("jaccard".parse::<Metric>(), Err(Error::UnsupportedMetric(_))),
    );
    let ragged = FeatureMatrix::new(vec![vec![1.0, 2.0], vec![1.0]], labels(&["A", "B"]));
    v.check_bool(
        "ragged rows → InconsistentShape",
        matches!(ragged, Err(Error::InconsistentShape { row: 1, .. })),
    );
}
