use std::io::Write;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use morphalign_core::{AllomorphCandidate, Alignment, allomorph_candidates, global_segment_counts};
use morphalign_lexicon::{LoadMode, load_features, load_segments, write_report_file};
use serde::Serialize;
use tracing::info;

use crate::cli::{AlignArgs, Cli, Commands, resolve_load_mode};

/// Execute one parsed command; JSON output goes to `out`.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let mode = resolve_load_mode(cli.load_mode);
    match cli.command {
        Commands::Align(args) => {
            align(&args, mode)?;
        }
        Commands::Features { features } => dump_features(&features, mode, out)?,
        Commands::Allomorphs { segments, limit } => dump_allomorphs(&segments, limit, mode, out)?,
    }
    Ok(())
}

/// Run the full pipeline and write the report named by `args.output`.
pub fn align(args: &AlignArgs, mode: LoadMode) -> Result<Alignment> {
    let pipeline = args.pipeline()?;
    info!(
        "filter {:?}, normalization {:?}, {} merges",
        pipeline.filter,
        pipeline.normalization,
        pipeline.merges().len()
    );

    let start = Instant::now();
    let features = load_features(&args.features, mode)
        .with_context(|| format!("loading features from {}", args.features.display()))?;
    let segments = load_segments(&args.segments, mode)
        .with_context(|| format!("loading segments from {}", args.segments.display()))?;
    info!("inputs loaded in {} ms", start.elapsed().as_millis());

    let alignment = pipeline.run(&features, &segments);
    let counts = args.count_column.then_some(&alignment.segment_counts);
    write_report_file(&args.output, &alignment.table, counts)
        .with_context(|| format!("writing report to {}", args.output.display()))?;
    info!(
        "{} segments x {} feature instances written",
        alignment.table.len(),
        alignment.table.feature_labels().len()
    );
    Ok(alignment)
}

fn dump_features<W: Write>(path: &Path, mode: LoadMode, out: &mut W) -> Result<()> {
    let features = load_features(path, mode)
        .with_context(|| format!("loading features from {}", path.display()))?;
    serde_json::to_writer_pretty(&mut *out, &features).context("serializing features")?;
    writeln!(out)?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct AllomorphReport<'a> {
    segments: String,
    total: usize,
    candidates: &'a [AllomorphCandidate],
}

fn dump_allomorphs<W: Write>(
    path: &Path,
    limit: Option<usize>,
    mode: LoadMode,
    out: &mut W,
) -> Result<()> {
    let segments = load_segments(path, mode)
        .with_context(|| format!("loading segments from {}", path.display()))?;
    let counts = global_segment_counts(&segments);
    let candidates = allomorph_candidates(&segments, &counts);
    let shown = limit.unwrap_or(candidates.len()).min(candidates.len());

    let report = AllomorphReport {
        segments: path.display().to_string(),
        total: candidates.len(),
        candidates: &candidates[..shown],
    };
    serde_json::to_writer_pretty(&mut *out, &report).context("serializing allomorph report")?;
    writeln!(out)?;
    Ok(())
}
