use std::io::Read;
use std::path::Path;

use morphalign_types::{FeatureAssignment, FeatureMap};
use tracing::{debug, info};

use crate::{LoadError, LoadMode, load_file};

/// Header of the column holding the word form.
pub const WORD_COLUMN: &str = "cell_value";

/// Load a feature table from disk.
pub fn load_features(path: impl AsRef<Path>, mode: LoadMode) -> Result<FeatureMap, LoadError> {
    let path = path.as_ref();
    let buffer = load_file(path, mode)?;
    let map = parse_features(buffer.as_slice(), &path.display().to_string())?;
    info!("loaded feature analyses for {} words from {}", map.len(), path.display());
    Ok(map)
}

/// Parse a feature table from any reader; `file` only labels errors.
///
/// Columns before `cell_value` are feature names. Columns after it are
/// ignored. Rows repeating a word append another analysis for that word.
pub fn parse_features<R: Read>(rdr: R, file: &str) -> Result<FeatureMap, LoadError> {
    let csv_err = |source| LoadError::Csv {
        file: file.to_string(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr);
    let mut records = reader.records();

    let header = match records.next() {
        Some(rec) => rec.map_err(csv_err)?,
        None => {
            return Err(LoadError::MissingWordColumn {
                file: file.to_string(),
            });
        }
    };
    let word_idx = header
        .iter()
        .position(|col| col == WORD_COLUMN)
        .ok_or_else(|| LoadError::MissingWordColumn {
            file: file.to_string(),
        })?;
    let names: Vec<String> = header.iter().take(word_idx).map(str::to_string).collect();

    let mut map = FeatureMap::new();
    for rec in records {
        let rec = rec.map_err(csv_err)?;
        let line = rec.position().map(|p| p.line()).unwrap_or_default();
        let Some(word) = rec.get(word_idx) else {
            return Err(LoadError::ShortRow {
                file: file.to_string(),
                line,
                expected: word_idx + 1,
                found: rec.len(),
            });
        };

        let assignment: FeatureAssignment = names
            .iter()
            .zip(rec.iter())
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        if assignment.is_empty() {
            debug!("{file}:{line}: no feature values for `{word}`");
        }
        map.entry(word.to_string()).or_default().push(assignment);
    }
    Ok(map)
}
