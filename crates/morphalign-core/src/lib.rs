//! Estimate which morphological segment carries which grammatical feature.
//!
//! Every segment of a word is credited with every feature value of every
//! analysis of that word. The resulting co-occurrence table is then pruned by
//! one [`SegmentFilter`] and rescaled by one [`Normalization`]:
//!
//! 1. Count (segment, feature instance) pairs over words both inputs share.
//! 2. Filter rows: drop each word's rarest segment (taken to be its root),
//!    drop globally rare segments, or only report likely allomorph pairs.
//! 3. Optionally merge rows the caller names as allomorphs.
//! 4. Normalize by feature column, by segment frequency, or by both.
//!
//! # Example
//! ```rust
//! use morphalign_core::{Normalization, Pipeline, SegmentFilter};
//! use morphalign_types::{FeatureAssignment, FeatureMap, SegmentMap};
//!
//! let features = FeatureMap::from([
//!     ("cat".to_string(), vec![FeatureAssignment::from_iter([("number", "sg")])]),
//!     ("cats".to_string(), vec![FeatureAssignment::from_iter([("number", "pl")])]),
//! ]);
//! let segments = SegmentMap::from([
//!     ("cat".to_string(), vec!["cat".to_string()]),
//!     ("cats".to_string(), vec!["cat".to_string(), "s".to_string()]),
//! ]);
//!
//! let out = Pipeline::new(SegmentFilter::RootRemoval, Normalization::BySegment)
//!     .run(&features, &segments);
//! assert_eq!(out.table.get("cat", "number: pl"), Some(0.5));
//! assert!(!out.table.contains_segment("s"));
//! ```

pub mod counter;
pub mod filter;
pub mod normalize;
pub mod pipeline;
pub mod stats;

pub use counter::{CountSummary, count_cooccurrences};
pub use filter::{
    AllomorphCandidate, DEFAULT_FREQUENCY_THRESHOLD, FilterOutcome, SegmentFilter,
    allomorph_candidates, remove_rare_segments, remove_roots, root_of,
};
pub use normalize::{
    Normalization, normalize_by_feature, normalize_by_feature_and_segment, normalize_by_segment,
};
pub use pipeline::{Alignment, Pipeline};
pub use stats::{global_feature_counts, global_segment_counts, pointwise_mutual_information};
