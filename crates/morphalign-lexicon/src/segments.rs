use std::path::Path;

use morphalign_types::SegmentMap;
use tracing::{debug, info};

use crate::{LoadError, LoadMode, load_file, strip_cr};

/// Load a `word<TAB>seg seg ...` segmentation file from disk.
pub fn load_segments(path: impl AsRef<Path>, mode: LoadMode) -> Result<SegmentMap, LoadError> {
    let path = path.as_ref();
    let buffer = load_file(path, mode)?;
    let map = parse_segments(buffer.as_slice(), &path.display().to_string())?;
    info!("loaded segmentations for {} words from {}", map.len(), path.display());
    Ok(map)
}

/// Parse segmentation lines; `file` only labels errors.
///
/// Blank lines are skipped. A word listed twice keeps its last segmentation.
pub fn parse_segments(bytes: &[u8], file: &str) -> Result<SegmentMap, LoadError> {
    let mut map = SegmentMap::new();
    for (idx, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line_no = idx as u64 + 1;
        let line = strip_cr(raw_line);
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let line = std::str::from_utf8(line).map_err(|_| LoadError::InvalidUtf8 {
            file: file.to_string(),
            line: line_no,
        })?;
        let Some((word, rest)) = line.split_once('\t') else {
            return Err(LoadError::MissingTab {
                file: file.to_string(),
                line: line_no,
            });
        };
        let segments: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
        if segments.is_empty() {
            return Err(LoadError::EmptySegmentation {
                file: file.to_string(),
                line: line_no,
                word: word.to_string(),
            });
        }
        if map.insert(word.to_string(), segments).is_some() {
            debug!("{file}:{line_no}: `{word}` segmented again, keeping the later line");
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_word_and_segments() {
        let data = b"cat\tcat\ncats\tcat s\r\n\nwalked\twalk  ed\n";
        let map = parse_segments(data, "segments.tsv").unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map["cat"], vec!["cat"]);
        assert_eq!(map["cats"], vec!["cat", "s"]);
        assert_eq!(map["walked"], vec!["walk", "ed"]);
    }

    #[test]
    fn later_line_wins_for_duplicate_word() {
        let data = b"dogs\tdogs\ndogs\tdog s\n";
        let map = parse_segments(data, "segments.tsv").unwrap();
        assert_eq!(map["dogs"], vec!["dog", "s"]);
    }

    #[test]
    fn line_without_tab_is_fatal() {
        let data = b"cat\tcat\ncats cat s\n";
        let err = parse_segments(data, "segments.tsv").unwrap_err();
        assert!(matches!(err, LoadError::MissingTab { line: 2, .. }));
    }

    #[test]
    fn empty_segmentation_is_fatal() {
        let err = parse_segments(b"cat\t  \n", "segments.tsv").unwrap_err();
        assert!(matches!(err, LoadError::EmptySegmentation { line: 1, .. }));
    }

    #[test]
    fn invalid_utf8_is_fatal() {
        let err = parse_segments(b"ca\xfft\tcat\n", "segments.tsv").unwrap_err();
        assert!(matches!(err, LoadError::InvalidUtf8 { line: 1, .. }));
    }
}
