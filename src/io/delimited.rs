// SPDX-License-Identifier: AGPL-3.0-or-later
//! Shared delimited-text reading for profile and catalog tables.
//!
//! Tab-separated by default, comma-separated for `.csv`. A trailing
//! `.gz` is decompressed with `flate2::read::GzDecoder`, so
//! `profiles.tsv.gz` and `catalog.csv.gz` both work. Field splitting
//! and RFC 4180 quoting are handled by `csv::Reader`, so a quoted field
//! may contain the delimiter.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{Error, Result};

/// Field delimiter implied by `path`'s extension (ignoring `.gz`).
#[must_use]
pub fn delimiter_for(path: &Path) -> u8 {
    let name = path.file_name().and_then(OsStr::to_str).unwrap_or("");
    let stem = name
        .strip_suffix(".gz")
        .or_else(|| name.strip_suffix(".GZ"))
        .unwrap_or(name);
    if stem.to_ascii_lowercase().ends_with(".csv") {
        b','
    } else {
        b'\t'
    }
}

/// Open `path` for buffered reading, decompressing `.gz`.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be opened.
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let ext = path.extension().and_then(OsStr::to_str).unwrap_or("");
    if ext.eq_ignore_ascii_case("gz") {
        let decoder = flate2::read::GzDecoder::new(file);
        Ok(Box::new(BufReader::new(decoder)))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read `path` as (header, records).
///
/// Each record is paired with its 1-based starting line number for error
/// messages. Blank lines are skipped and fields are trimmed. Row widths
/// are not checked here; callers report mismatches against the header.
///
/// # Errors
///
/// [`Error::Io`] on open/read failure (including corrupt gzip);
/// [`Error::Profile`] with `path:line` for malformed text such as
/// invalid UTF-8. An empty file yields an empty header.
pub fn read_table(path: &Path) -> Result<(Vec<String>, Vec<(usize, Vec<String>)>)> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter_for(path))
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(open_reader(path)?);

    let mut header = Vec::new();
    let mut records = Vec::new();
    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => return Err(csv_error(path, e)),
        }
        if record.iter().all(str::is_empty) {
            continue;
        }
        let fields: Vec<String> = record.iter().map(str::to_string).collect();
        if header.is_empty() {
            header = fields;
        } else {
            let line = record.position().map_or(0, |p| p.line());
            records.push((usize::try_from(line).unwrap_or(usize::MAX), fields));
        }
    }
    Ok((header, records))
}

fn csv_error(path: &Path, e: csv::Error) -> Error {
    let line = e.position().map(csv::Position::line);
    let detail = e.to_string();
    match e.into_kind() {
        csv::ErrorKind::Io(source) => Error::Io {
            path: path.to_path_buf(),
            source,
        },
        _ => match line {
            Some(line) => Error::Profile(format!("{}:{line}: {detail}", path.display())),
            None => Error::Profile(format!("{}: {detail}", path.display())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        File::create(&path).unwrap().write_all(bytes).unwrap();
        path
    }

    #[test]
    fn delimiter_from_extension() {
        assert_eq!(delimiter_for(Path::new("p.tsv")), b'\t');
        assert_eq!(delimiter_for(Path::new("p.csv")), b',');
        assert_eq!(delimiter_for(Path::new("p.CSV.gz")), b',');
        assert_eq!(delimiter_for(Path::new("p.tsv.gz")), b'\t');
        assert_eq!(delimiter_for(Path::new("p")), b'\t');
    }

    #[test]
    fn quoted_delimiter_stays_in_field() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "catalog.csv",
            b"standard_key,plate_type,JCP2022,note\r\n\
              CD44,crispr,JCP2022_800001,\"CD44, guide 1\"\r\n\
              \"HAS2\", orf ,JCP2022_900002,\"say \"\"hi\"\"\"\r\n",
        );
        let (header, records) = read_table(&path).unwrap();
        assert_eq!(header.len(), 4);
        assert_eq!(
            records[0].1,
            vec!["CD44", "crispr", "JCP2022_800001", "CD44, guide 1"]
        );
        assert_eq!(records[1].1[0], "HAS2");
        assert_eq!(records[1].1[1], "orf");
        assert_eq!(records[1].1[3], "say \"hi\"");
    }

    #[test]
    fn read_table_skips_blank_lines_and_keeps_line_numbers() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "t.tsv", b"a\tb\n\n1\t2\n");
        let (header, records) = read_table(&path).unwrap();
        assert_eq!(header, vec!["a", "b"]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, 3);
    }

    #[test]
    fn ragged_rows_are_returned_for_caller_checks() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "t.tsv", b"a\tb\n1\n");
        let (_, records) = read_table(&path).unwrap();
        assert_eq!(records[0], (2, vec!["1".to_string()]));
    }

    #[test]
    fn invalid_utf8_reports_line() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "t.tsv", b"a\tb\n1\t\xff\xfe\n");
        let err = read_table(&path).unwrap_err();
        assert!(matches!(err, Error::Profile(ref m) if m.contains(":2:")), "{err}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_table(Path::new("/nonexistent/perturbspring/t.tsv")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
