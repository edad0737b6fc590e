use morphalign_types::{FeatureMap, GlobalSegmentCounts, SegmentFeatureCounts, SegmentMap};
use tracing::{info, warn};

use crate::counter::{CountSummary, count_cooccurrences};
use crate::filter::{AllomorphCandidate, SegmentFilter};
use crate::normalize::Normalization;
use crate::stats::global_segment_counts;

/// Count, filter, merge and normalize, in that order.
///
/// Exactly one filter and one normalization run per pipeline. Merges are
/// optional and only ever cover pairs named by the caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pipeline {
    pub filter: SegmentFilter,
    pub normalization: Normalization,
    merges: Vec<(String, String)>,
}

/// Everything a pipeline run produced.
#[derive(Clone, Debug)]
pub struct Alignment {
    pub table: SegmentFeatureCounts,
    /// Corpus frequency per segment, with merged segments folded together.
    pub segment_counts: GlobalSegmentCounts,
    pub summary: CountSummary,
    pub removed_rows: usize,
    pub allomorphs: Vec<AllomorphCandidate>,
}

impl Pipeline {
    pub fn new(filter: SegmentFilter, normalization: Normalization) -> Self {
        Self {
            filter,
            normalization,
            merges: Vec::new(),
        }
    }

    /// Fold the `absorb` row into `keep` after filtering.
    pub fn with_merge(mut self, keep: impl Into<String>, absorb: impl Into<String>) -> Self {
        self.merges.push((keep.into(), absorb.into()));
        self
    }

    pub fn merges(&self) -> &[(String, String)] {
        &self.merges
    }

    pub fn run(&self, features: &FeatureMap, segments: &SegmentMap) -> Alignment {
        let (mut table, summary) = count_cooccurrences(features, segments);
        let mut segment_counts = global_segment_counts(segments);

        let outcome = self.filter.apply(&mut table, segments, &segment_counts);

        for (keep, absorb) in &self.merges {
            if !table.contains_segment(keep) {
                warn!("segment `{keep}` is not in the table, not merging `{absorb}` into it");
                continue;
            }
            if table.merge_rows(keep, absorb) {
                let absorbed = segment_counts.remove(absorb).unwrap_or(0);
                *segment_counts.entry(keep.clone()).or_insert(0) += absorbed;
                info!("merged segment `{absorb}` into `{keep}`");
            } else {
                warn!("nothing to merge from `{absorb}` into `{keep}`");
            }
        }

        self.normalization.apply(&mut table, &segment_counts);

        Alignment {
            table,
            segment_counts,
            summary,
            removed_rows: outcome.removed_rows,
            allomorphs: outcome.allomorphs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphalign_types::FeatureAssignment;

    fn lexicon() -> (FeatureMap, SegmentMap) {
        let features = FeatureMap::from([
            (
                "walked".to_string(),
                vec![[("tense", "past")].into_iter().collect::<FeatureAssignment>()],
            ),
            (
                "dreamt".to_string(),
                vec![[("tense", "past")].into_iter().collect::<FeatureAssignment>()],
            ),
        ]);
        let segments = SegmentMap::from([
            ("walked".to_string(), vec!["walk".into(), "ed".into()]),
            ("dreamt".to_string(), vec!["dream".into(), "t".into()]),
        ]);
        (features, segments)
    }

    #[test]
    fn merge_folds_rows_and_frequencies() {
        let (features, segments) = lexicon();
        let pipeline = Pipeline::new(SegmentFilter::FrequencyThreshold(0), Normalization::BySegment)
            .with_merge("ed", "t");
        let out = pipeline.run(&features, &segments);

        assert!(!out.table.contains_segment("t"));
        assert_eq!(out.segment_counts["ed"], 2);
        assert!(!out.segment_counts.contains_key("t"));
        assert_eq!(out.table.get("ed", "tense: past"), Some(1.0));
    }

    #[test]
    fn unknown_merge_is_ignored() {
        let (features, segments) = lexicon();
        let plain = Pipeline::new(SegmentFilter::FrequencyThreshold(0), Normalization::ByFeature)
            .run(&features, &segments);
        let merged = Pipeline::new(SegmentFilter::FrequencyThreshold(0), Normalization::ByFeature)
            .with_merge("ed", "nope")
            .run(&features, &segments);
        assert_eq!(plain.table, merged.table);
    }

    #[test]
    fn merge_into_filtered_segment_is_skipped() {
        let (features, segments) = lexicon();
        // Every segment occurs once, so `walk` and `dream` are dropped as roots.
        let out = Pipeline::new(SegmentFilter::RootRemoval, Normalization::BySegment)
            .with_merge("walk", "t")
            .run(&features, &segments);

        assert!(!out.table.contains_segment("walk"));
        assert!(out.table.contains_segment("t"));
        assert_eq!(out.segment_counts["t"], 1);
        assert_eq!(out.table.get("t", "tense: past"), Some(1.0));
    }

    #[test]
    fn allomorph_report_surfaces_candidates() {
        let (features, mut segments) = lexicon();
        segments.insert("walkt".to_string(), vec!["walk".into(), "t".into()]);
        let out = Pipeline::new(SegmentFilter::AllomorphReport, Normalization::ByFeature)
            .run(&features, &segments);
        assert_eq!(out.removed_rows, 0);
        assert!(
            out.allomorphs
                .iter()
                .any(|c| c.first == "ed" && c.second == "t")
        );
        assert!(out.table.contains_segment("walk"));
    }
}
