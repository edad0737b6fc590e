//! Corpus-wide counts and association measures shared by filters and normalizers.

use morphalign_types::{GlobalFeatureCounts, GlobalSegmentCounts, SegmentFeatureCounts, SegmentMap};

/// Occurrences of every segment over every segmentation in the corpus.
///
/// A segment repeated inside one word counts once per occurrence.
pub fn global_segment_counts(segments: &SegmentMap) -> GlobalSegmentCounts {
    let mut counts = GlobalSegmentCounts::new();
    for segment in segments.values().flatten() {
        *counts.entry(segment.clone()).or_insert(0) += 1;
    }
    counts
}

/// Column sums of the table as it currently stands.
pub fn global_feature_counts(table: &SegmentFeatureCounts) -> GlobalFeatureCounts {
    table.feature_totals()
}

/// `log2(P(a,b) / (P(a) * P(b)))`.
///
/// Negative when `a` and `b` co-occur less often than chance would predict.
/// Callers pass strictly positive probabilities.
pub fn pointwise_mutual_information(p_joint: f64, p_a: f64, p_b: f64) -> f64 {
    (p_joint / (p_a * p_b)).log2()
}
