//! Load feature tables and segmentations, and write alignment reports.
//!
//! Two inputs feed the aligner:
//! - a comma-separated **feature table** whose header ends in a column named
//!   `cell_value` (the word form); every column before it is a feature name,
//!   and each row becomes one [`FeatureAssignment`] holding its non-blank
//!   cells;
//! - a tab-separated **segmentation** file, one `word<TAB>seg seg ...` line
//!   per word.
//!
//! Callers choose between memory-mapped files or owned buffers at runtime via
//! [`LoadMode`]. Every parse failure is fatal and reports the file and the
//! 1-based line it happened on.
//!
//! # Example
//! ```no_run
//! use morphalign_lexicon::{LoadMode, load_features, load_segments};
//!
//! # fn main() -> anyhow::Result<()> {
//! let features = load_features("features.csv", LoadMode::Mmap)?;
//! let segments = load_segments("segments.tsv", LoadMode::Owned)?;
//! println!("{} analysed words, {} segmented words", features.len(), segments.len());
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p morphalign-lexicon --example summary -- <features> <segments>`.
//!
//! [`FeatureAssignment`]: morphalign_types::FeatureAssignment

use std::fs::File;
use std::io::Read;
use std::path::Path;

use memmap2::Mmap;
use thiserror::Error;

mod features;
mod report;
mod segments;

pub use features::{WORD_COLUMN, load_features, parse_features};
pub use report::{COUNT_HEADER, SEGMENT_HEADER, write_report, write_report_file};
pub use segments::{load_segments, parse_segments};

/// Strategy for loading input files.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the file (fast, zero-copy).
    #[default]
    Mmap,
    /// Read the file into an owned buffer (portable fallback).
    Owned,
}

/// Failures while reading a feature table or segmentation.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {file}: {source}")]
    Io {
        file: String,
        source: std::io::Error,
    },
    #[error("{file}: malformed CSV: {source}")]
    Csv { file: String, source: csv::Error },
    #[error("{file}: header has no `cell_value` column")]
    MissingWordColumn { file: String },
    #[error("{file}:{line}: expected at least {expected} columns, found {found}")]
    ShortRow {
        file: String,
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("{file}:{line}: invalid UTF-8")]
    InvalidUtf8 { file: String, line: u64 },
    #[error("{file}:{line}: missing tab between word and segmentation")]
    MissingTab { file: String, line: u64 },
    #[error("{file}:{line}: word `{word}` has no segments")]
    EmptySegmentation { file: String, line: u64, word: String },
}

/// Failures while writing a report.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create {file}: {source}")]
    Io {
        file: String,
        source: std::io::Error,
    },
    #[error("failed to write {file}: {source}")]
    Csv { file: String, source: csv::Error },
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer, LoadError> {
    let io_err = |source| LoadError::Io {
        file: path.display().to_string(),
        source,
    };
    match mode {
        LoadMode::Mmap => {
            let file = File::open(path).map_err(io_err)?;
            // SAFETY: inputs are read once and not expected to change underneath us.
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .map_err(io_err)
        }
        LoadMode::Owned => {
            let mut file = File::open(path).map_err(io_err)?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf).map_err(io_err)?;
            Ok(Buffer::Owned(buf))
        }
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn both_modes_see_the_same_bytes() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "cat\tcat\n").unwrap();
        let mapped = load_file(file.path(), LoadMode::Mmap).unwrap();
        let owned = load_file(file.path(), LoadMode::Owned).unwrap();
        assert_eq!(mapped.as_slice(), owned.as_slice());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.tsv"), LoadMode::Owned)
            .err()
            .expect("missing file fails");
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn strips_trailing_carriage_return() {
        assert_eq!(strip_cr(b"abc\r"), b"abc");
        assert_eq!(strip_cr(b"abc"), b"abc");
    }
}
