// SPDX-License-Identifier: AGPL-3.0-or-later
//! Labelled matrix export as tab-separated text.
//!
//! ```text
//! <tab>CD44<tab>CD44<tab>HAS2
//! CD44<tab>0<tab>0<tab>1
//! ...
//! ```
//!
//! Values use Rust's shortest round-trip `f64` formatting.

use std::io::Write;

use crate::bio::similarity_matrix::SimilarityMatrix;

/// Write `matrix` as TSV to `out`.
///
/// # Errors
///
/// Propagates writer errors.
pub fn write_matrix_tsv<W: Write + ?Sized>(
    out: &mut W,
    matrix: &SimilarityMatrix,
) -> std::io::Result<()> {
    for label in matrix.col_labels() {
        write!(out, "\t{label}")?;
    }
    writeln!(out)?;
    for (i, label) in matrix.row_labels().iter().enumerate() {
        write!(out, "{label}")?;
        for v in matrix.row(i) {
            write!(out, "\t{v}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tsv_layout() {
        let m = SimilarityMatrix::from_flat(
            vec![0.0, 1.0, 1.0, 0.0],
            vec!["CD44".into(), "HAS2".into()],
        )
        .unwrap();
        let mut buf = Vec::new();
        write_matrix_tsv(&mut buf, &m).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "\tCD44\tHAS2\nCD44\t0\t1\nHAS2\t1\t0\n");
    }

    #[test]
    fn fractional_values_round_trip() {
        let m = SimilarityMatrix::from_flat(vec![0.1 + 0.2], vec!["A".into()]).unwrap();
        let mut buf = Vec::new();
        write_matrix_tsv(&mut buf, &m).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let cell: f64 = text.lines().nth(1).unwrap().split('\t').nth(1).unwrap().parse().unwrap();
        assert_eq!(cell.to_bits(), (0.1_f64 + 0.2).to_bits());
    }
}
