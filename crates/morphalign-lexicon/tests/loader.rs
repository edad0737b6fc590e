use std::path::PathBuf;

use morphalign_lexicon::{LoadError, LoadMode, load_features, load_segments, write_report_file};
use morphalign_types::{FeatureInstance, GlobalSegmentCounts, SegmentFeatureCounts};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn loads_feature_fixture() {
    let map = load_features(fixture("features.csv"), LoadMode::Mmap).expect("load features");
    assert_eq!(map.len(), 5);

    let walks = &map["walks"];
    assert_eq!(walks.len(), 2);
    assert_eq!(walks[0].get("tense"), Some("pres"));
    assert_eq!(walks[0].get("person"), Some("3"));
    assert_eq!(walks[0].get("number"), None);
    assert_eq!(walks[1].get("number"), Some("sg"));
}

#[test]
fn loads_segment_fixture_in_both_modes() {
    let mapped = load_segments(fixture("segments.tsv"), LoadMode::Mmap).expect("mmap");
    let owned = load_segments(fixture("segments.tsv"), LoadMode::Owned).expect("owned");
    assert_eq!(mapped, owned);
    assert_eq!(mapped.len(), 6);
    assert_eq!(mapped["walked"], vec!["walk", "ed"]);
}

#[test]
fn missing_input_file_is_reported() {
    let err = load_segments(fixture("absent.tsv"), LoadMode::Owned).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("absent.tsv"));
}

#[test]
fn report_file_round_trips_through_csv() -> anyhow::Result<()> {
    let mut table = SegmentFeatureCounts::new();
    table.add("s", &FeatureInstance::new("number", "pl"), 1.0);
    table.add("ed", &FeatureInstance::new("tense", "past"), 0.25);
    table.add("cat", &FeatureInstance::new("number", "sg"), 0.5);
    let counts = GlobalSegmentCounts::from([
        ("s".to_string(), 2),
        ("ed".to_string(), 2),
        ("cat".to_string(), 2),
    ]);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("alignment.csv");
    write_report_file(&path, &table, Some(&counts))?;

    let mut reader = csv::Reader::from_path(&path)?;
    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    assert_eq!(
        header,
        vec!["Segment", "number: pl", "number: sg", "tense: past", "Count"]
    );

    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.map(|rec| rec.iter().map(str::to_string).collect::<Vec<String>>()))
        .collect::<Result<_, _>>()?;
    let segments: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(segments, vec!["cat", "ed", "s"]);
    assert_eq!(rows[1], vec!["ed", "", "", "0.25", "2"]);
    Ok(())
}
