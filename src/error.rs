// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for perturbSpring loading, resolution and similarity.
//!
//! All failures use [`Error`], one variant per failure mode. Every error is
//! fatal for a run; [`Error::Stage`] tags which pipeline stage raised it.

use std::fmt;
use std::path::PathBuf;

/// Pipeline stage that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the profile table and the catalog.
    Load,
    /// Gene symbol → perturbation identifier resolution.
    Resolution,
    /// Filtering and relabelling profile rows.
    Selection,
    /// All-pairs metric computation.
    Similarity,
    /// Writing the output artifact.
    Rendering,
}

impl Stage {
    /// Lowercase stage name used in messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Resolution => "resolution",
            Self::Selection => "selection",
            Self::Similarity => "similarity",
            Self::Rendering => "rendering",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors produced by perturbSpring parsers, resolvers and engines.
#[derive(Debug)]
pub enum Error {
    /// File I/O error with path context.
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Feature matrix has no rows.
    EmptyInput,
    /// A row's feature width differs from the first row.
    InconsistentShape {
        /// Zero-based offending row.
        row: usize,
        /// Width of row 0.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// Metric name not recognized.
    UnsupportedMetric(String),
    /// Catalog could not be opened or read.
    CatalogUnavailable {
        /// What was wrong with the catalog.
        reason: String,
        /// Underlying read or parse error, if any.
        source: Option<Box<Error>>,
    },
    /// Catalog rejected the query (unknown column, empty key).
    CatalogQuery(String),
    /// More than one catalog candidate under the unique-match policy.
    AmbiguousMatch {
        /// Gene symbol queried.
        gene: String,
        /// Modality with several candidates.
        modality: String,
        /// Candidate identifiers in catalog order.
        candidates: Vec<String>,
    },
    /// Two genes resolved to the same identifier under the reject policy.
    IdentifierCollision {
        /// Shared perturbation identifier.
        identifier: String,
        /// Gene that claimed the identifier first.
        kept: String,
        /// Gene that tried to claim it again.
        dropped: String,
    },
    /// Profile table parse or schema error.
    Profile(String),
    /// Invalid input parameters (batch size, configuration values).
    InvalidInput(String),
    /// Failure inside a named pipeline stage.
    Stage {
        /// Stage that failed.
        stage: Stage,
        /// Underlying error.
        source: Box<Error>,
    },
}

/// Result type alias for perturbSpring operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap this error with the stage it occurred in.
    #[must_use]
    pub fn in_stage(self, stage: Stage) -> Self {
        Self::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// [`Error::CatalogUnavailable`] without an underlying cause.
    #[must_use]
    pub fn catalog_unavailable(reason: impl Into<String>) -> Self {
        Self::CatalogUnavailable {
            reason: reason.into(),
            source: None,
        }
    }

    /// Stage tag, if this error was raised inside the pipeline.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::EmptyInput => write!(f, "empty input: feature matrix has no rows"),
            Self::InconsistentShape {
                row,
                expected,
                found,
            } => write!(
                f,
                "inconsistent shape: row {row} has {found} features, expected {expected}"
            ),
            Self::UnsupportedMetric(name) => write!(f, "unsupported metric: {name}"),
            Self::CatalogUnavailable { reason, source } => match source {
                Some(inner) => write!(f, "catalog unavailable: {reason}: {inner}"),
                None => write!(f, "catalog unavailable: {reason}"),
            },
            Self::CatalogQuery(msg) => write!(f, "catalog query error: {msg}"),
            Self::AmbiguousMatch {
                gene,
                modality,
                candidates,
            } => write!(
                f,
                "ambiguous match: {gene} has {} {modality} identifiers ({})",
                candidates.len(),
                candidates.join(", ")
            ),
            Self::IdentifierCollision {
                identifier,
                kept,
                dropped,
            } => write!(
                f,
                "identifier collision: {identifier} maps to both {kept} and {dropped}"
            ),
            Self::Profile(msg) => write!(f, "profile table error: {msg}"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::Stage { stage, source } => write!(f, "{stage} stage failed: {source}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Stage { source, .. } => Some(source.as_ref()),
            Self::CatalogUnavailable { source, .. } => {
                source.as_deref().map(|e| e as &(dyn std::error::Error + 'static))
            }
            Self::EmptyInput
            | Self::InconsistentShape { .. }
            | Self::UnsupportedMetric(_)
            | Self::CatalogQuery(_)
            | Self::AmbiguousMatch { .. }
            | Self::IdentifierCollision { .. }
            | Self::Profile(_)
            | Self::InvalidInput(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_io_error() {
        let err = Error::Io {
            path: PathBuf::from("profiles/harmonized.tsv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("harmonized.tsv"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn display_all_variants() {
        let cases: Vec<(Error, &str)> = vec![
            (Error::EmptyInput, "empty input"),
            (
                Error::InconsistentShape {
                    row: 2,
                    expected: 4,
                    found: 3,
                },
                "inconsistent shape",
            ),
            (
                Error::UnsupportedMetric("jaccard".into()),
                "unsupported metric",
            ),
            (
                Error::catalog_unavailable("no file"),
                "catalog unavailable",
            ),
            (Error::CatalogQuery("bad column".into()), "catalog query error"),
            (
                Error::AmbiguousMatch {
                    gene: "CD44".into(),
                    modality: "crispr".into(),
                    candidates: vec!["A".into(), "B".into()],
                },
                "ambiguous match",
            ),
            (
                Error::IdentifierCollision {
                    identifier: "JCP2022_X".into(),
                    kept: "CD44".into(),
                    dropped: "HAS2".into(),
                },
                "identifier collision",
            ),
            (Error::Profile("missing column".into()), "profile table error"),
            (Error::InvalidInput("batch size 0".into()), "invalid input"),
        ];
        for (err, expected_prefix) in cases {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "'{msg}' should start with '{expected_prefix}'"
            );
        }
    }

    #[test]
    fn stage_wrapper_names_stage() {
        let err = Error::EmptyInput.in_stage(Stage::Similarity);
        assert_eq!(err.stage(), Some(Stage::Similarity));
        let msg = err.to_string();
        assert!(msg.starts_with("similarity stage failed"), "{msg}");
        assert!(msg.contains("empty input"));
    }

    #[test]
    fn error_source_chain() {
        let io_err = Error::Io {
            path: PathBuf::from("x"),
            source: std::io::Error::other("inner"),
        };
        assert!(std::error::Error::source(&io_err).is_some());

        let staged = Error::CatalogQuery("q".into()).in_stage(Stage::Resolution);
        assert!(std::error::Error::source(&staged).is_some());

        assert!(std::error::Error::source(&Error::EmptyInput).is_none());
    }

    #[test]
    fn catalog_unavailable_keeps_io_cause() {
        let err = Error::CatalogUnavailable {
            reason: "cannot read catalog".into(),
            source: Some(Box::new(Error::Io {
                path: PathBuf::from("catalog.tsv"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            })),
        };
        assert_eq!(
            err.to_string(),
            "catalog unavailable: cannot read catalog: catalog.tsv: gone"
        );
        let cause = std::error::Error::source(&err).unwrap();
        let io = std::error::Error::source(cause).unwrap();
        assert_eq!(io.to_string(), "gone");
        assert!(std::error::Error::source(&Error::catalog_unavailable("x")).is_none());
    }

    #[test]
    fn unstaged_error_has_no_stage() {
        assert_eq!(Error::InvalidInput("x".into()).stage(), None);
    }
}
