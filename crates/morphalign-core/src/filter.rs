use std::collections::{BTreeMap, BTreeSet};

use morphalign_types::{GlobalSegmentCounts, SegmentFeatureCounts, SegmentMap};
use serde::Serialize;
use tracing::{debug, info};

use crate::stats::pointwise_mutual_information;

/// Threshold used by [`SegmentFilter::FrequencyThreshold`] when none is given.
pub const DEFAULT_FREQUENCY_THRESHOLD: u64 = 100;

/// Which segments to drop from the table before normalization.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SegmentFilter {
    /// Drop the least frequent segment of every multi-segment word.
    #[default]
    RootRemoval,
    /// Drop segments seen fewer than this many times in the corpus.
    FrequencyThreshold(u64),
    /// Leave the table alone and rank candidate allomorph pairs.
    AllomorphReport,
}

/// Result of running a [`SegmentFilter`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterOutcome {
    pub removed_rows: usize,
    pub allomorphs: Vec<AllomorphCandidate>,
}

impl SegmentFilter {
    pub fn apply(
        &self,
        table: &mut SegmentFeatureCounts,
        segments: &SegmentMap,
        counts: &GlobalSegmentCounts,
    ) -> FilterOutcome {
        match *self {
            SegmentFilter::RootRemoval => FilterOutcome {
                removed_rows: remove_roots(table, segments, counts),
                allomorphs: Vec::new(),
            },
            SegmentFilter::FrequencyThreshold(threshold) => FilterOutcome {
                removed_rows: remove_rare_segments(table, counts, threshold),
                allomorphs: Vec::new(),
            },
            SegmentFilter::AllomorphReport => {
                let allomorphs = allomorph_candidates(segments, counts);
                for cand in &allomorphs {
                    info!(
                        "allomorph candidate {} ~ {}: pmi {:.4} over {} shared contexts",
                        cand.first, cand.second, cand.pmi, cand.shared_contexts
                    );
                }
                FilterOutcome {
                    removed_rows: 0,
                    allomorphs,
                }
            }
        }
    }
}

/// Least frequent segment of a segmentation, first one in word order on ties.
///
/// Single-segment words have nothing to compare against and yield `None`.
pub fn root_of<'a>(segmentation: &'a [String], counts: &GlobalSegmentCounts) -> Option<&'a str> {
    if segmentation.len() < 2 {
        return None;
    }
    segmentation
        .iter()
        .min_by_key(|seg| counts.get(seg.as_str()).copied().unwrap_or(0))
        .map(String::as_str)
}

/// Remove the row of every word's root segment, returning how many rows went.
pub fn remove_roots(
    table: &mut SegmentFeatureCounts,
    segments: &SegmentMap,
    counts: &GlobalSegmentCounts,
) -> usize {
    let mut removed = 0;
    for (word, segmentation) in segments {
        if let Some(root) = root_of(segmentation, counts)
            && table.remove_row(root).is_some()
        {
            debug!("removed root `{root}` of `{word}`");
            removed += 1;
        }
    }
    info!("root removal dropped {removed} segment rows");
    removed
}

/// Remove rows of segments occurring fewer than `threshold` times.
pub fn remove_rare_segments(
    table: &mut SegmentFeatureCounts,
    counts: &GlobalSegmentCounts,
    threshold: u64,
) -> usize {
    let before = table.len();
    table.retain_rows(|segment, _| counts.get(segment).copied().unwrap_or(0) >= threshold);
    let removed = before - table.len();
    info!("frequency threshold {threshold} dropped {removed} segment rows");
    removed
}

/// Two segments that fill the same slot between the same neighbours.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AllomorphCandidate {
    pub first: String,
    pub second: String,
    /// Number of distinct contexts in which both segments occur.
    pub shared_contexts: u64,
    pub pmi: f64,
}

/// Rank segment pairs that are interchangeable in some context, lowest PMI first.
///
/// A context is what remains of a multi-segment word once one segment is cut
/// out, with the remaining segments concatenated into one sub-word string.
///
/// With `C` distinct contexts and `N` segment occurrences in the corpus,
/// `P(a,b)` is the share of contexts that admit both `a` and `b`, and `P(a)`
/// is `count(a) / N`.
pub fn allomorph_candidates(
    segments: &SegmentMap,
    counts: &GlobalSegmentCounts,
) -> Vec<AllomorphCandidate> {
    let mut contexts: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    for segmentation in segments.values() {
        if segmentation.len() < 2 {
            continue;
        }
        for (idx, segment) in segmentation.iter().enumerate() {
            let key = format!(
                "{}{}",
                segmentation[..idx].concat(),
                segmentation[idx + 1..].concat()
            );
            contexts.entry(key).or_default().insert(segment.as_str());
        }
    }

    let mut joint: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for fillers in contexts.values() {
        let fillers: Vec<&str> = fillers.iter().copied().collect();
        for (i, a) in fillers.iter().enumerate() {
            for b in &fillers[i + 1..] {
                *joint.entry((*a, *b)).or_insert(0) += 1;
            }
        }
    }

    let context_total = contexts.len() as f64;
    let occurrence_total: u64 = counts.values().sum();
    if joint.is_empty() || occurrence_total == 0 {
        return Vec::new();
    }
    let occurrence_total = occurrence_total as f64;
    let prob = |seg: &str| counts.get(seg).copied().unwrap_or(0) as f64 / occurrence_total;

    let mut candidates: Vec<AllomorphCandidate> = joint
        .into_iter()
        .map(|((a, b), shared)| AllomorphCandidate {
            first: a.to_string(),
            second: b.to_string(),
            shared_contexts: shared,
            pmi: pointwise_mutual_information(shared as f64 / context_total, prob(a), prob(b)),
        })
        .collect();
    candidates.sort_by(|x, y| {
        x.pmi
            .total_cmp(&y.pmi)
            .then_with(|| x.first.cmp(&y.first))
            .then_with(|| x.second.cmp(&y.second))
    });
    candidates
}
