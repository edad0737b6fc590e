use std::fs::File;
use std::io::Write;
use std::path::Path;

use morphalign_types::{GlobalSegmentCounts, SegmentFeatureCounts};
use tracing::info;

use crate::WriteError;

pub const SEGMENT_HEADER: &str = "Segment";
pub const COUNT_HEADER: &str = "Count";

/// Write one row per segment and one column per feature instance.
///
/// Rows and columns come out in lexicographic order. Missing cells are left
/// empty rather than written as zero. When `segment_counts` is given a
/// trailing `Count` column carries each segment's corpus frequency.
pub fn write_report<W: Write>(
    wtr: W,
    table: &SegmentFeatureCounts,
    segment_counts: Option<&GlobalSegmentCounts>,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(wtr);
    let labels = table.feature_labels();

    let mut header: Vec<&str> = Vec::with_capacity(labels.len() + 2);
    header.push(SEGMENT_HEADER);
    header.extend(labels.iter().map(|l| l.as_str()));
    if segment_counts.is_some() {
        header.push(COUNT_HEADER);
    }
    writer.write_record(&header)?;

    for (segment, row) in table.rows() {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        record.push(segment.to_string());
        for label in &labels {
            record.push(row.get(*label).map(f64::to_string).unwrap_or_default());
        }
        if let Some(counts) = segment_counts {
            record.push(
                counts
                    .get(segment)
                    .map(u64::to_string)
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write the report into it.
pub fn write_report_file(
    path: impl AsRef<Path>,
    table: &SegmentFeatureCounts,
    segment_counts: Option<&GlobalSegmentCounts>,
) -> Result<(), WriteError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| WriteError::Io {
        file: path.display().to_string(),
        source,
    })?;
    write_report(file, table, segment_counts).map_err(|source| WriteError::Csv {
        file: path.display().to_string(),
        source,
    })?;
    info!("wrote {} segment rows to {}", table.len(), path.display());
    Ok(())
}
