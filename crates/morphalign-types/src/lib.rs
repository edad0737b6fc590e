//! Shared types for aligning morphological segments with feature values.
//!
//! The data model is deliberately small: words and segments are plain
//! strings, a word owns a list of [`FeatureAssignment`]s (candidate analyses)
//! and an ordered segmentation, and every `(name, value)` pair collapses into a
//! single [`FeatureInstance`] label such as `"tense: past"`.
//!
//! [`SegmentFeatureCounts`] is the central table keyed by segment and then by
//! feature instance. It starts as integer co-occurrence counts and is rescaled
//! in place by the normalizers. Rows and columns are kept in sorted maps so
//! every pass over the table is reproducible.
//!
//! ```rust
//! use morphalign_types::{FeatureInstance, SegmentFeatureCounts};
//!
//! let tense = FeatureInstance::new("tense", "past");
//! let mut table = SegmentFeatureCounts::new();
//! table.increment("ed", &tense);
//! table.increment("ed", &tense);
//! assert_eq!(table.get("ed", "tense: past"), Some(2.0));
//! ```

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;

/// Opaque word form shared by the feature and segment inputs.
pub type Word = String;

/// Opaque morpheme token produced by a segmenter.
pub type Segment = String;

/// Word -> candidate analyses, in input order.
pub type FeatureMap = BTreeMap<Word, Vec<FeatureAssignment>>;

/// Word -> ordered segmentation.
pub type SegmentMap = BTreeMap<Word, Vec<Segment>>;

/// Segment -> number of occurrences across every segmentation in the corpus.
pub type GlobalSegmentCounts = HashMap<Segment, u64>;

/// Feature instance -> sum of its column in a [`SegmentFeatureCounts`] table.
pub type GlobalFeatureCounts = BTreeMap<FeatureInstance, f64>;

/// One row of [`SegmentFeatureCounts`].
pub type SegmentRow = BTreeMap<FeatureInstance, f64>;

const LABEL_SEPARATOR: &str = ": ";

/// Canonical `"name: value"` label used as a column key.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(transparent)]
pub struct FeatureInstance(String);

impl FeatureInstance {
    /// Combine a feature name and its realised value into one label.
    pub fn new(name: &str, value: &str) -> Self {
        Self(format!("{name}{LABEL_SEPARATOR}{value}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FeatureInstance {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One candidate analysis of a word: feature name -> chosen value.
///
/// Only non-blank cells of the feature table end up here, so an assignment may
/// be empty when a row carries no feature at all.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureAssignment {
    values: BTreeMap<String, String>,
}

impl FeatureAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Iterate `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Labels for every pair in this assignment.
    pub fn instances(&self) -> impl Iterator<Item = FeatureInstance> + '_ {
        self.iter().map(|(name, value)| FeatureInstance::new(name, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FeatureAssignment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Segment -> feature instance -> count or score.
///
/// Absent cells are implicitly zero. Values are never negative: they start as
/// whole-number counts and become real-valued scores after normalization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentFeatureCounts {
    rows: BTreeMap<Segment, SegmentRow>,
}

impl SegmentFeatureCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation of `feature` alongside `segment`.
    pub fn increment(&mut self, segment: &str, feature: &FeatureInstance) {
        self.add(segment, feature, 1.0);
    }

    /// Add `amount` to a cell, creating the row and cell on demand.
    pub fn add(&mut self, segment: &str, feature: &FeatureInstance, amount: f64) {
        debug_assert!(amount >= 0.0, "table cells must stay non-negative");
        let row = self.rows.entry(segment.to_string()).or_default();
        *row.entry(feature.clone()).or_insert(0.0) += amount;
    }

    pub fn get(&self, segment: &str, feature: &str) -> Option<f64> {
        self.rows.get(segment)?.get(feature).copied()
    }

    pub fn row(&self, segment: &str) -> Option<&SegmentRow> {
        self.rows.get(segment)
    }

    pub fn contains_segment(&self, segment: &str) -> bool {
        self.rows.contains_key(segment)
    }

    /// Rows in segment order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &SegmentRow)> + '_ {
        self.rows.iter().map(|(s, row)| (s.as_str(), row))
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = (&str, &mut SegmentRow)> + '_ {
        self.rows.iter_mut().map(|(s, row)| (s.as_str(), row))
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.keys().map(String::as_str)
    }

    /// Drop a whole row. Removing an absent row is a no-op.
    pub fn remove_row(&mut self, segment: &str) -> Option<SegmentRow> {
        self.rows.remove(segment)
    }

    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &SegmentRow) -> bool,
    {
        self.rows.retain(|segment, row| keep(segment, row));
    }

    /// Fold the `absorb` row into the `keep` row, then drop `absorb`.
    ///
    /// Returns `false` when there is nothing to move (same segment, or no
    /// `absorb` row).
    pub fn merge_rows(&mut self, keep: &str, absorb: &str) -> bool {
        if keep == absorb {
            return false;
        }
        let Some(absorbed) = self.rows.remove(absorb) else {
            return false;
        };
        let target = self.rows.entry(keep.to_string()).or_default();
        for (feature, value) in absorbed {
            *target.entry(feature).or_insert(0.0) += value;
        }
        true
    }

    /// Sorted union of the column labels present in any row.
    pub fn feature_labels(&self) -> Vec<&FeatureInstance> {
        let labels: BTreeSet<&FeatureInstance> =
            self.rows.values().flat_map(|row| row.keys()).collect();
        labels.into_iter().collect()
    }

    /// Column sums over the current rows.
    pub fn feature_totals(&self) -> GlobalFeatureCounts {
        let mut totals = GlobalFeatureCounts::new();
        for row in self.rows.values() {
            for (feature, value) in row {
                *totals.entry(feature.clone()).or_insert(0.0) += value;
            }
        }
        totals
    }

    /// Sum of one row, zero if the segment is absent.
    pub fn row_total(&self, segment: &str) -> f64 {
        self.rows
            .get(segment)
            .map(|row| row.values().sum())
            .unwrap_or(0.0)
    }

    /// Sum of every cell.
    pub fn total(&self) -> f64 {
        self.rows.values().flat_map(|row| row.values()).sum()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
