// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz
//
// Chart text scraping against plate-like text as produced by PDF text extractors.

use glidepath_core::{GlidePathPlanner, RawApproach, RawFix, RawValue};
use glidepath_scrape::{ChartScan, ScrapeError};
use std::io::Write;

const PLATE_PAGE_1: &str = "\
RNAV (GNSS) RWY 27          ELEV 1187
TDZE 1200   THR ELEV 1200
FAF KOBET 5000 ft  D12.0
GP 2.70° / VDA
";

const PLATE_PAGE_2: &str = "\
MINIMUMS
LNAV MDA 1800' (600')
CIRCLING MDA 2100
";

#[test]
fn test_scan_across_pages() {
    let text = format!("{}\x0c{}", PLATE_PAGE_1, PLATE_PAGE_2);
    let scan = ChartScan::scan_text(&text);

    assert_eq!(scan.threshold_elevation, Some(1200.0));
    assert_eq!(scan.faf_altitude, Some(5000.0));
    assert_eq!(scan.faf_distance, Some(12.0));
    assert_eq!(scan.glide_path_angle, Some(2.7));
    // The first MDA on the plate wins over circling minima
    assert_eq!(scan.minimum_descent_altitude, Some(1800.0));
    assert_eq!(scan.matched_count(), 5);
}

#[test]
fn test_partial_scan() {
    let scan = ChartScan::scan_text("Some unrelated page\nMDA: 960\n");
    assert_eq!(scan.minimum_descent_altitude, Some(960.0));
    assert_eq!(scan.faf_distance, None);
    assert_eq!(scan.matched_count(), 1);
}

#[test]
fn test_negative_threshold_elevation() {
    let scan = ChartScan::scan_text("TDZE -12");
    assert_eq!(scan.threshold_elevation, Some(-12.0));
}

#[test]
fn test_scan_file_nothing_matched() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Airport diagram only. No approach data here.").unwrap();
    let err = ChartScan::scan_file(file.path()).unwrap_err();
    assert!(matches!(err, ScrapeError::NothingMatched));
}

#[test]
fn test_scan_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = ChartScan::scan_file(&dir.path().join("missing.txt")).unwrap_err();
    assert!(matches!(err, ScrapeError::Io(_)));
}

#[test]
fn test_scan_file_with_binary_noise() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"\xff\xfe garbage \x00 MDA 1800\n").unwrap();
    let scan = ChartScan::scan_file(file.path()).unwrap();
    assert_eq!(scan.minimum_descent_altitude, Some(1800.0));
}

#[test]
fn test_prefill_only_fills_empty_fields() {
    let scan = ChartScan::scan_text(&format!("{}\x0c{}", PLATE_PAGE_1, PLATE_PAGE_2));
    let mut raw = RawApproach {
        threshold_elevation: Some("1195".into()),
        minimum_descent_altitude: Some("".into()),
        fixes: vec![RawFix::new("4000", "8.3")],
        ..RawApproach::default()
    };

    scan.prefill(&mut raw);

    assert_eq!(raw.threshold_elevation, Some(RawValue::from("1195")));
    assert_eq!(raw.minimum_descent_altitude, Some(RawValue::Number(1800.0)));
    assert_eq!(raw.fixes.len(), 2);
    assert_eq!(raw.fixes[0], RawFix::new(5000.0, 12.0));

    // A second confirmation does not duplicate the FAF row
    scan.prefill(&mut raw);
    assert_eq!(raw.fixes.len(), 2);
}

#[test]
fn test_prefilled_form_runs_and_cross_checks() {
    let scan = ChartScan::scan_text(&format!("{}\x0c{}", PLATE_PAGE_1, PLATE_PAGE_2));
    let mut raw = RawApproach {
        runway: "RWY 27".to_string(),
        dme_at_threshold: Some("1.0".into()),
        faf_to_mapt_distance: Some("3.5".into()),
        fixes: vec![
            RawFix::new("4000", "8.3"),
            RawFix::new("3400", "6.1"),
            RawFix::new("2360", "2.8"),
        ],
        ..RawApproach::default()
    };
    scan.prefill(&mut raw);

    let (_, result) = GlidePathPlanner::default().calculate(&raw).unwrap();
    assert_eq!(result.faf.slant_distance, 12.0);

    let discrepancy = scan.angle_discrepancy(&result.fit).unwrap();
    assert!(discrepancy.abs() < 0.05, "discrepancy {}", discrepancy);
}

#[test]
fn test_scan_serializes_missing_fields_as_null() {
    let scan = ChartScan::scan_text("MDA 1800");
    let json = serde_json::to_value(&scan).unwrap();
    assert_eq!(json["minimum_descent_altitude"], 1800.0);
    assert!(json["faf_distance"].is_null());
}
