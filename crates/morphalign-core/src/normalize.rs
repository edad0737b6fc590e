use morphalign_types::{GlobalSegmentCounts, SegmentFeatureCounts};
use tracing::info;

/// How filtered counts are rescaled into comparable scores.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Normalization {
    /// Each feature-instance column sums to 1.
    ByFeature,
    /// Each cell is divided by the segment's corpus frequency, capped at 1.
    #[default]
    BySegment,
    /// Each cell is divided by its column total times its row total.
    ByFeatureAndSegment,
}

impl Normalization {
    pub fn apply(&self, table: &mut SegmentFeatureCounts, counts: &GlobalSegmentCounts) {
        match self {
            Normalization::ByFeature => normalize_by_feature(table),
            Normalization::BySegment => normalize_by_segment(table, counts),
            Normalization::ByFeatureAndSegment => normalize_by_feature_and_segment(table),
        }
        info!("normalized {} segment rows ({self:?})", table.len());
    }
}

/// Divide every cell by its column total over the current rows.
///
/// # Panics
/// If a column sums to zero, which the counter never produces.
pub fn normalize_by_feature(table: &mut SegmentFeatureCounts) {
    let totals = table.feature_totals();
    for (_, row) in table.rows_mut() {
        for (feature, value) in row.iter_mut() {
            let total = totals.get(feature).copied().unwrap_or(0.0);
            assert!(total > 0.0, "feature `{feature}` has a zero column total");
            *value /= total;
        }
    }
}

/// Divide every cell by the segment's corpus frequency and cap it at 1.
///
/// `counts` come from the unfiltered segmentation. A segment can collect more
/// hits than occurrences when its words carry several analyses, hence the cap.
///
/// # Panics
/// If a segment in the table has no recorded occurrences.
pub fn normalize_by_segment(table: &mut SegmentFeatureCounts, counts: &GlobalSegmentCounts) {
    for (segment, row) in table.rows_mut() {
        let occurrences = counts.get(segment).copied().unwrap_or(0);
        assert!(occurrences > 0, "segment `{segment}` has no corpus occurrences");
        let occurrences = occurrences as f64;
        for value in row.values_mut() {
            *value = (*value / occurrences).min(1.0);
        }
    }
}

/// Divide every cell by (column total * row total), both taken before rescaling.
///
/// # Panics
/// If a row or column sums to zero.
pub fn normalize_by_feature_and_segment(table: &mut SegmentFeatureCounts) {
    let totals = table.feature_totals();
    for (segment, row) in table.rows_mut() {
        let row_total: f64 = row.values().sum();
        assert!(row_total > 0.0, "segment `{segment}` has a zero row total");
        for (feature, value) in row.iter_mut() {
            let column_total = totals.get(feature).copied().unwrap_or(0.0);
            assert!(column_total > 0.0, "feature `{feature}` has a zero column total");
            *value /= column_total * row_total;
        }
    }
}
