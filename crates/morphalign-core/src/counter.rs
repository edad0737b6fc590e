use morphalign_types::{FeatureInstance, FeatureMap, SegmentFeatureCounts, SegmentMap};
use tracing::{info, warn};

/// What the counter saw while filling the table.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CountSummary {
    /// Words present in both inputs.
    pub counted_words: usize,
    /// Words with feature analyses but no segmentation.
    pub words_without_segments: usize,
    /// Words with a segmentation but no feature analyses.
    pub words_without_features: usize,
    /// Total number of cell increments.
    pub increments: u64,
}

impl CountSummary {
    pub fn skipped_words(&self) -> usize {
        self.words_without_segments + self.words_without_features
    }
}

/// Count every (segment, feature instance) pair over the words both maps share.
///
/// Each segment of a word is paired with every `(name, value)` of every
/// analysis of that word. Words known to only one map are skipped and
/// reported in the returned [`CountSummary`].
pub fn count_cooccurrences(
    features: &FeatureMap,
    segments: &SegmentMap,
) -> (SegmentFeatureCounts, CountSummary) {
    let mut table = SegmentFeatureCounts::new();
    let mut summary = CountSummary::default();

    for (word, analyses) in features {
        let Some(segmentation) = segments.get(word) else {
            summary.words_without_segments += 1;
            continue;
        };
        summary.counted_words += 1;

        let instances: Vec<FeatureInstance> =
            analyses.iter().flat_map(|a| a.instances()).collect();
        for segment in segmentation {
            for instance in &instances {
                table.increment(segment, instance);
                summary.increments += 1;
            }
        }
    }
    summary.words_without_features = segments
        .keys()
        .filter(|word| !features.contains_key(*word))
        .count();

    if summary.skipped_words() > 0 {
        warn!(
            "skipped {} words missing a segmentation and {} words missing features",
            summary.words_without_segments, summary.words_without_features
        );
    }
    info!(
        "counted {} words into {} segment rows ({} increments)",
        summary.counted_words,
        table.len(),
        summary.increments
    );
    (table, summary)
}
