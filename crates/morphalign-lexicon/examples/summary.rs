use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use morphalign_lexicon::{LoadMode, load_features, load_segments};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let usage = "usage: cargo run -p morphalign-lexicon --example summary -- <features.csv> <segments.tsv>";
    let features_path = args.next().map(PathBuf::from).context(usage)?;
    let segments_path = args.next().map(PathBuf::from).context(usage)?;

    let features = load_features(&features_path, LoadMode::Mmap)
        .with_context(|| format!("loading features from {}", features_path.display()))?;
    let segments = load_segments(&segments_path, LoadMode::Mmap)
        .with_context(|| format!("loading segments from {}", segments_path.display()))?;

    let analyses: usize = features.values().map(Vec::len).sum();
    let labels: BTreeSet<String> = features
        .values()
        .flatten()
        .flat_map(|a| a.instances())
        .map(|i| i.to_string())
        .collect();
    let segment_tokens: usize = segments.values().map(Vec::len).sum();
    let segment_types: BTreeSet<&str> = segments.values().flatten().map(String::as_str).collect();
    let shared = features.keys().filter(|w| segments.contains_key(*w)).count();

    println!("Feature table : {}", features_path.display());
    println!("Analysed words: {}", features.len());
    println!("Analyses      : {}", analyses);
    println!("Feature labels: {}", labels.len());
    println!("Segmentation  : {}", segments_path.display());
    println!("Segmented words: {}", segments.len());
    println!("Segment tokens: {}", segment_tokens);
    println!("Segment types : {}", segment_types.len());
    println!("Words in both : {}", shared);

    Ok(())
}
