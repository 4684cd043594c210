// SPDX-License-Identifier: AGPL-3.0-or-later
//! Console harness for the engine property checks.
//!
//! `validate_pairwise` feeds analytical cases through the engine and
//! records each comparison here. Every check prints one line:
//!
//! ```text
//!   [OK]    cosine_distance diagonal: 0.000000 (expected 0.000000, tol 1e-10)
//!   [FAIL]  batch 7 == batch 200: 3 of 49 cells differ
//! ```
//!
//! [`Validator::finish`] prints the tally, repeats the failed labels and
//! exits 0 when everything passed, 1 otherwise.

use std::path::{Path, PathBuf};

fn tag(pass: bool) -> &'static str {
    if pass { "OK" } else { "FAIL" }
}

/// Absolute-tolerance comparison with a printed verdict line.
///
/// A tolerance of `0.0` demands equality. NaN never passes.
///
/// ```
/// use perturbspring::validation::check;
///
/// assert!(check("cos(a, a)", 1.0, 1.0, 1e-12));
/// assert!(!check("off by half", 2.0, 1.0, 0.4));
/// ```
#[must_use]
pub fn check(label: &str, actual: f64, expected: f64, tolerance: f64) -> bool {
    let pass = (actual - expected).abs() <= tolerance;
    println!(
        "  [{}]  {label}: {actual:.6} (expected {expected:.6}, tol {tolerance:e})",
        tag(pass)
    );
    pass
}

/// Exact count comparison (matrix dimension, selected rows).
///
/// ```
/// use perturbspring::validation::check_count;
///
/// assert!(check_count("matrix rows", 3, 3));
/// assert!(!check_count("selected", 2, 4));
/// ```
#[must_use]
pub fn check_count(label: &str, actual: usize, expected: usize) -> bool {
    let pass = actual == expected;
    println!("  [{}]  {label}: {actual} (expected {expected})", tag(pass));
    pass
}

/// Bitwise equality of two score buffers, cell by cell via `to_bits()`.
///
/// ```
/// use perturbspring::validation::check_bits;
///
/// assert!(check_bits("rerun", &[0.0, 1.0], &[0.0, 1.0]));
/// assert!(!check_bits("signed zero", &[0.0], &[-0.0]));
/// ```
#[must_use]
pub fn check_bits(label: &str, actual: &[f64], expected: &[f64]) -> bool {
    if actual.len() != expected.len() {
        println!(
            "  [FAIL]  {label}: {} cells vs {} expected",
            actual.len(),
            expected.len()
        );
        return false;
    }
    let differing = actual
        .iter()
        .zip(expected)
        .filter(|(a, e)| a.to_bits() != e.to_bits())
        .count();
    let pass = differing == 0;
    if pass {
        println!("  [OK]  {label}: {} cells bitwise-equal", actual.len());
    } else {
        println!("  [FAIL]  {label}: {differing} of {} cells differ", actual.len());
    }
    pass
}

/// Largest `|actual[i] - expected[i]|`, or infinity on a length mismatch.
#[must_use]
pub fn max_abs_deviation(actual: &[f64], expected: &[f64]) -> f64 {
    if actual.len() != expected.len() {
        return f64::INFINITY;
    }
    actual
        .iter()
        .zip(expected)
        .map(|(a, e)| (a - e).abs())
        .fold(0.0, f64::max)
}

/// Print the closing banner. Returns whether every check passed.
#[must_use]
pub fn print_result(name: &str, passed: u32, total: u32) -> bool {
    let ok = passed == total;
    println!("\n───────────────────────────────────────────────────────────");
    println!("  {name}: {passed}/{total} checks passed");
    if ok {
        println!("  RESULT: PASS");
    } else {
        println!("  RESULT: FAIL ({} failed)", total - passed);
    }
    println!("───────────────────────────────────────────────────────────");
    ok
}

/// Input path: `value` when set, else `CARGO_MANIFEST_DIR/{default_subpath}`.
///
/// ```
/// use perturbspring::validation::data_dir_from;
///
/// let p = data_dir_from(Some("/data/profiles.tsv".into()), "data/profiles.tsv");
/// assert_eq!(p, std::path::PathBuf::from("/data/profiles.tsv"));
/// ```
#[must_use]
pub fn data_dir_from(value: Option<String>, default_subpath: &str) -> PathBuf {
    value.map_or_else(
        || Path::new(env!("CARGO_MANIFEST_DIR")).join(default_subpath),
        PathBuf::from,
    )
}

// ── Validator ─────────────────────────────────────────────────

/// Running tally of checks for one validation binary.
///
/// # Examples
///
/// ```
/// use perturbspring::validation::Validator;
///
/// let mut v = Validator::new("doc-test");
/// v.check("diagonal", 0.0, 0.0, 1e-12);
/// v.check_count("rows", 3, 3);
/// v.check_bits("rerun", &[0.5, 1.0], &[0.5, 1.0]);
/// v.check_bool("axes sorted", false);
/// assert_eq!(v.counts(), (3, 4));
/// assert_eq!(v.failures(), &["axes sorted"]);
/// ```
#[derive(Debug)]
pub struct Validator {
    name: String,
    passed: u32,
    total: u32,
    failures: Vec<String>,
}

impl Validator {
    /// Start a run and print its banner.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        println!("───────────────────────────────────────────────────────────");
        println!("  {name}");
        println!("───────────────────────────────────────────────────────────");
        Self {
            name,
            passed: 0,
            total: 0,
            failures: Vec::new(),
        }
    }

    /// Section heading; not counted.
    pub fn section(&self, label: &str) {
        println!("\n{label}");
    }

    fn record(&mut self, label: &str, pass: bool) {
        self.total += 1;
        if pass {
            self.passed += 1;
        } else {
            self.failures.push(label.to_string());
        }
    }

    /// See [`check`].
    pub fn check(&mut self, label: &str, actual: f64, expected: f64, tolerance: f64) {
        let pass = check(label, actual, expected, tolerance);
        self.record(label, pass);
    }

    /// See [`check_count`].
    pub fn check_count(&mut self, label: &str, actual: usize, expected: usize) {
        let pass = check_count(label, actual, expected);
        self.record(label, pass);
    }

    /// See [`check_bits`].
    pub fn check_bits(&mut self, label: &str, actual: &[f64], expected: &[f64]) {
        let pass = check_bits(label, actual, expected);
        self.record(label, pass);
    }

    /// Boolean property (error variant raised, labels sorted).
    pub fn check_bool(&mut self, label: &str, condition: bool) {
        println!("  [{}]  {label}", tag(condition));
        self.record(label, condition);
    }

    /// (passed, total) so far.
    #[must_use]
    pub const fn counts(&self) -> (u32, u32) {
        (self.passed, self.total)
    }

    /// Labels of the failed checks, in order.
    #[must_use]
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Print the summary and exit with 0 (all passed) or 1.
    pub fn finish(self) -> ! {
        let ok = print_result(&self.name, self.passed, self.total);
        for label in &self.failures {
            println!("  failed: {label}");
        }
        std::process::exit(i32::from(!ok))
    }
}
