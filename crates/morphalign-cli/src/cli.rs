use std::env;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use morphalign_core::{DEFAULT_FREQUENCY_THRESHOLD, Normalization, Pipeline, SegmentFilter};
use morphalign_lexicon::LoadMode;
use thiserror::Error;

pub const LOAD_MODE_ENV: &str = "MORPHALIGN_LOAD_MODE";

#[derive(Debug, Parser)]
#[command(name = "morphalign")]
#[command(about = "Align morphological segments with the grammatical features they express")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// How input files are read (`mmap` or `owned`); falls back to $MORPHALIGN_LOAD_MODE.
    #[arg(long, global = true, value_parser = load_mode_arg)]
    pub load_mode: Option<LoadMode>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Count, filter and normalize, then write the segment-by-feature table.
    Align(AlignArgs),
    /// Print the parsed feature table as JSON.
    Features {
        #[arg(long, value_name = "CSV")]
        features: PathBuf,
    },
    /// Print candidate allomorph pairs ranked by PMI as JSON.
    Allomorphs {
        #[arg(long, value_name = "TSV")]
        segments: PathBuf,
        /// Only print the first N candidates.
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },
}

#[derive(Debug, Args)]
pub struct AlignArgs {
    /// Feature table whose header ends with a `cell_value` column.
    #[arg(long, value_name = "CSV")]
    pub features: PathBuf,
    /// Segmentation file with `word<TAB>seg seg ...` lines.
    #[arg(long, value_name = "TSV")]
    pub segments: PathBuf,
    /// Where to write the resulting table.
    #[arg(long, short, value_name = "CSV")]
    pub output: PathBuf,
    /// Normalize each feature column instead of each segment row.
    #[arg(long, conflicts_with = "normalize")]
    pub by_feature: bool,
    /// Drop segments seen fewer than N times instead of removing roots.
    #[arg(long, value_name = "N")]
    pub threshold: Option<u64>,
    #[arg(long, value_enum)]
    pub filter: Option<FilterKind>,
    #[arg(long, value_enum)]
    pub normalize: Option<NormalizeKind>,
    /// Append each segment's corpus frequency as a final column.
    #[arg(long)]
    pub count_column: bool,
    /// Fold segment ABSORB into segment KEEP before normalizing.
    #[arg(long = "merge", value_name = "KEEP=ABSORB", value_parser = merge_arg)]
    pub merges: Vec<(String, String)>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum FilterKind {
    Root,
    Threshold,
    Allomorph,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum NormalizeKind {
    Feature,
    Segment,
    FeatureAndSegment,
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("--threshold only applies to the threshold filter, not {0:?}")]
    ThresholdConflict(FilterKind),
}

impl AlignArgs {
    pub fn segment_filter(&self) -> Result<SegmentFilter, ConfigError> {
        match (self.filter, self.threshold) {
            (None | Some(FilterKind::Root), None) => Ok(SegmentFilter::RootRemoval),
            (None | Some(FilterKind::Threshold), Some(n)) => {
                Ok(SegmentFilter::FrequencyThreshold(n))
            }
            (Some(FilterKind::Threshold), None) => Ok(SegmentFilter::FrequencyThreshold(
                DEFAULT_FREQUENCY_THRESHOLD,
            )),
            (Some(FilterKind::Allomorph), None) => Ok(SegmentFilter::AllomorphReport),
            (Some(kind), Some(_)) => Err(ConfigError::ThresholdConflict(kind)),
        }
    }

    pub fn normalization(&self) -> Normalization {
        if self.by_feature {
            return Normalization::ByFeature;
        }
        match self.normalize {
            Some(NormalizeKind::Feature) => Normalization::ByFeature,
            Some(NormalizeKind::Segment) | None => Normalization::BySegment,
            Some(NormalizeKind::FeatureAndSegment) => Normalization::ByFeatureAndSegment,
        }
    }

    pub fn pipeline(&self) -> Result<Pipeline, ConfigError> {
        let pipeline = Pipeline::new(self.segment_filter()?, self.normalization());
        Ok(self
            .merges
            .iter()
            .fold(pipeline, |p, (keep, absorb)| p.with_merge(keep, absorb)))
    }
}

/// CLI flag, then environment, then mmap.
pub fn resolve_load_mode(cli: Option<LoadMode>) -> LoadMode {
    cli.or_else(|| env::var(LOAD_MODE_ENV).ok().as_deref().and_then(parse_load_mode))
        .unwrap_or(LoadMode::Mmap)
}

pub fn parse_load_mode(raw: &str) -> Option<LoadMode> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Some(LoadMode::Mmap),
        "owned" => Some(LoadMode::Owned),
        _ => None,
    }
}

fn load_mode_arg(raw: &str) -> Result<LoadMode, String> {
    parse_load_mode(raw).ok_or_else(|| format!("expected `mmap` or `owned`, got `{raw}`"))
}

fn merge_arg(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((keep, absorb)) if !keep.is_empty() && !absorb.is_empty() => {
            Ok((keep.to_string(), absorb.to_string()))
        }
        _ => Err(format!("expected KEEP=ABSORB, got `{raw}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn align(extra: &[&str]) -> Result<AlignArgs, clap::Error> {
        let mut argv = vec![
            "morphalign",
            "align",
            "--features",
            "f.csv",
            "--segments",
            "s.tsv",
            "--output",
            "out.csv",
        ];
        argv.extend_from_slice(extra);
        let cli = Cli::try_parse_from(argv)?;
        match cli.command {
            Commands::Align(args) => Ok(args),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn defaults_to_root_removal_and_segment_rows() {
        let args = align(&[]).unwrap();
        assert_eq!(args.segment_filter(), Ok(SegmentFilter::RootRemoval));
        assert_eq!(args.normalization(), Normalization::BySegment);
        assert!(!args.count_column);
    }

    #[test]
    fn threshold_selects_frequency_filter() {
        let args = align(&["--threshold", "5"]).unwrap();
        assert_eq!(args.segment_filter(), Ok(SegmentFilter::FrequencyThreshold(5)));

        let args = align(&["--filter", "threshold"]).unwrap();
        assert_eq!(
            args.segment_filter(),
            Ok(SegmentFilter::FrequencyThreshold(DEFAULT_FREQUENCY_THRESHOLD))
        );

        let args = align(&["--filter", "allomorph", "--threshold", "5"]).unwrap();
        assert_eq!(
            args.segment_filter(),
            Err(ConfigError::ThresholdConflict(FilterKind::Allomorph))
        );
    }

    #[test]
    fn by_feature_flag_and_normalize_option() {
        let args = align(&["--by-feature"]).unwrap();
        assert_eq!(args.normalization(), Normalization::ByFeature);

        let args = align(&["--normalize", "feature-and-segment"]).unwrap();
        assert_eq!(args.normalization(), Normalization::ByFeatureAndSegment);

        assert!(align(&["--by-feature", "--normalize", "segment"]).is_err());
    }

    #[test]
    fn merges_are_parsed_in_order() {
        let args = align(&["--merge", "ed=t", "--merge", "s=es"]).unwrap();
        let pipeline = args.pipeline().unwrap();
        assert_eq!(
            pipeline.merges(),
            &[
                ("ed".to_string(), "t".to_string()),
                ("s".to_string(), "es".to_string())
            ]
        );
        assert!(align(&["--merge", "ed"]).is_err());
        assert!(align(&["--merge", "=t"]).is_err());
    }

    #[test]
    fn load_mode_flag() {
        let cli = Cli::try_parse_from([
            "morphalign",
            "features",
            "--features",
            "f.csv",
            "--load-mode",
            "owned",
        ])
        .unwrap();
        assert_eq!(cli.load_mode, Some(LoadMode::Owned));
        assert_eq!(resolve_load_mode(cli.load_mode), LoadMode::Owned);
        assert_eq!(parse_load_mode("MMAP"), Some(LoadMode::Mmap));
        assert_eq!(parse_load_mode("paged"), None);
    }
}
