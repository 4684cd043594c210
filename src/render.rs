// SPDX-License-Identifier: AGPL-3.0-or-later
//! Output artifacts for a computed similarity matrix.
//!
//! A [`Renderer`] turns a sorted, labelled [`SimilarityMatrix`] into a file.
//! File names follow the heatmap convention:
//!
//! ```text
//! heatmap_cosdist_harmony_{gene_a}_{gene_b}.{ext}    (genes lowercased)
//! ```
//!
//! Renderers write through [`persist_atomically`]: content goes to a
//! temporary file in the destination directory and is renamed into place
//! only after the write succeeds, so a failed run leaves no partial file.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::bio::similarity_matrix::SimilarityMatrix;
use crate::error::{Error, Result};
use crate::io::matrix::write_matrix_tsv;

/// File name prefix for heatmap artifacts.
pub const HEATMAP_PREFIX: &str = "heatmap_cosdist_harmony_";

/// Heatmap file name for `genes` with extension `ext`.
///
/// ```
/// use perturbspring::render::heatmap_filename;
///
/// assert_eq!(
///     heatmap_filename(&["CD44", "HAS2"], "png"),
///     "heatmap_cosdist_harmony_cd44_has2.png"
/// );
/// ```
#[must_use]
pub fn heatmap_filename<S: AsRef<str>>(genes: &[S], ext: &str) -> String {
    let joined = genes
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join("_")
        .to_lowercase();
    format!("{HEATMAP_PREFIX}{joined}.{ext}")
}

/// Produces an artifact from a similarity matrix.
pub trait Renderer {
    /// File extension of the artifact, without the dot.
    fn extension(&self) -> &str;

    /// Write `matrix` to `path`.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the artifact cannot be written.
    fn render(&self, matrix: &SimilarityMatrix, path: &Path) -> Result<()>;
}

/// Writes the labelled matrix as a TSV table, the input for an external
/// heatmap plotter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsvMatrixRenderer;

impl Renderer for TsvMatrixRenderer {
    fn extension(&self) -> &str {
        "tsv"
    }

    fn render(&self, matrix: &SimilarityMatrix, path: &Path) -> Result<()> {
        persist_atomically(path, |w| write_matrix_tsv(w, matrix))
    }
}

/// Create `dir` (and parents) if it does not exist.
///
/// # Errors
///
/// [`Error::Io`] if the directory cannot be created.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::Io {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Write via `write` to a temporary file beside `path`, then rename it
/// onto `path`.
///
/// # Errors
///
/// [`Error::Io`] if the temporary file cannot be created, written or
/// persisted. The temporary file is removed on failure.
pub fn persist_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    let io_err = |source: std::io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut w = BufWriter::new(tmp.as_file());
        write(&mut w).map_err(io_err)?;
        w.flush().map_err(io_err)?;
    }
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    info!(path = %path.display(), "wrote artifact");
    Ok(())
}

/// Render `matrix` into `out_dir` with the heatmap name for `genes`.
///
/// Returns the artifact path.
///
/// # Errors
///
/// [`Error::Io`] from directory creation or the renderer.
pub fn render_heatmap<R: Renderer + ?Sized, S: AsRef<str>>(
    renderer: &R,
    matrix: &SimilarityMatrix,
    out_dir: &Path,
    genes: &[S],
) -> Result<PathBuf> {
    ensure_output_dir(out_dir)?;
    let path = out_dir.join(heatmap_filename(genes, renderer.extension()));
    renderer.render(matrix, &path)?;
    Ok(path)
}
