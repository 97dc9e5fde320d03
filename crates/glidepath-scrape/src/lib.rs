// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Best-effort extraction of approach numbers from chart text.
//!
//! Works on text already pulled out of an approach plate (one string per page,
//! or a single string with form feeds between pages). Every field is optional
//! and unverified: results go through [`ChartScan::prefill`] only after the
//! user has confirmed them.

use glidepath_core::{FittedGlidePath, RawApproach, RawFix, RawValue};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Could not read chart text: {0}")]
    Io(#[from] std::io::Error),
    #[error("No approach data recognised in chart text; please enter values manually")]
    NothingMatched,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartScan {
    pub minimum_descent_altitude: Option<f64>,
    pub glide_path_angle: Option<f64>,
    pub faf_altitude: Option<f64>,
    pub faf_distance: Option<f64>,
    pub threshold_elevation: Option<f64>,
}

const ALTITUDE_RANGE: (f64, f64) = (0.0, 20000.0);
const ANGLE_RANGE: (f64, f64) = (1.0, 6.0);
const DISTANCE_RANGE: (f64, f64) = (0.0, 40.0);
const THRESHOLD_RANGE: (f64, f64) = (-1500.0, 15000.0);

fn mda_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bMDA(?:\s*\(H\))?\s*[:=\-]?\s*(\d{3,5})\b").expect("valid MDA pattern")
    })
}

fn gpa_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:GPA|VDA|GP|glide\s*path(?:\s*angle)?|descent\s*angle)\s*[:=\-]?\s*(\d\.\d{1,2})\s*°?",
        )
        .expect("valid glide path pattern")
    })
}

fn faf_distance_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bFAF\b[^\n]*?(?:\bD\s?(\d{1,2}(?:\.\d{1,2})?)\b|\b(\d{1,2}\.\d{1,2})\s*(?:NM|DME)\b)")
            .expect("valid FAF distance pattern")
    })
}

fn faf_altitude_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bFAF\b[^\n]*?\b(\d{3,5})\s*(?:ft\b|FT\b|')")
            .expect("valid FAF altitude pattern")
    })
}

fn threshold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:TDZE|THR\s*ELEV(?:ATION)?|threshold\s*elev(?:ation)?)\s*[:=]?\s*(-?\d{1,5})\b",
        )
        .expect("valid threshold pattern")
    })
}

fn within(value: f64, (lo, hi): (f64, f64)) -> Option<f64> {
    (value.is_finite() && value >= lo && value <= hi).then_some(value)
}

/// First capture group that parsed and fell inside `range`.
fn first_match(re: &Regex, text: &str, range: (f64, f64)) -> Option<f64> {
    re.captures_iter(text).find_map(|caps| {
        caps.iter()
            .skip(1)
            .flatten()
            .find_map(|m| m.as_str().parse::<f64>().ok())
            .and_then(|v| within(v, range))
    })
}

impl ChartScan {
    /// Scans pages in order; for each field the first plausible match wins.
    pub fn scan_pages<S: AsRef<str>>(pages: &[S]) -> Self {
        let mut scan = ChartScan::default();
        for (page_no, page) in pages.iter().enumerate() {
            let text = page.as_ref();
            scan.minimum_descent_altitude = scan
                .minimum_descent_altitude
                .or_else(|| first_match(mda_re(), text, ALTITUDE_RANGE));
            scan.glide_path_angle = scan
                .glide_path_angle
                .or_else(|| first_match(gpa_re(), text, ANGLE_RANGE));
            scan.faf_distance = scan
                .faf_distance
                .or_else(|| first_match(faf_distance_re(), text, DISTANCE_RANGE));
            scan.faf_altitude = scan
                .faf_altitude
                .or_else(|| first_match(faf_altitude_re(), text, ALTITUDE_RANGE));
            scan.threshold_elevation = scan
                .threshold_elevation
                .or_else(|| first_match(threshold_re(), text, THRESHOLD_RANGE));
            log::debug!(
                "Scanned chart page {} — fields found so far={}",
                page_no + 1,
                scan.matched_count()
            );
        }
        scan
    }

    /// Splits on form feeds, the page separator text extractors emit.
    pub fn scan_text(text: &str) -> Self {
        let pages: Vec<&str> = text.split('\x0c').collect();
        Self::scan_pages(&pages)
    }

    pub fn scan_file(path: &Path) -> Result<Self, ScrapeError> {
        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        let scan = Self::scan_text(&text);
        if scan.is_empty() {
            log::info!("No approach fields matched in {:?}", path);
            return Err(ScrapeError::NothingMatched);
        }
        log::info!(
            "Chart scan of {:?} matched {} field(s)",
            path,
            scan.matched_count()
        );
        Ok(scan)
    }

    pub fn matched_count(&self) -> usize {
        [
            self.minimum_descent_altitude,
            self.glide_path_angle,
            self.faf_altitude,
            self.faf_distance,
            self.threshold_elevation,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.matched_count() == 0
    }

    /// Copies confirmed values into empty form fields. Fields the user already
    /// filled are left alone. The FAF becomes a fix row when both its altitude
    /// and distance were found and no fix already sits at that distance.
    pub fn prefill(&self, raw: &mut RawApproach) {
        fn fill(slot: &mut Option<RawValue>, value: Option<f64>) {
            let empty = slot.as_ref().and_then(RawValue::as_finite).is_none();
            if empty {
                if let Some(v) = value {
                    *slot = Some(RawValue::Number(v));
                }
            }
        }

        fill(&mut raw.minimum_descent_altitude, self.minimum_descent_altitude);
        fill(&mut raw.threshold_elevation, self.threshold_elevation);

        if let (Some(altitude), Some(distance)) = (self.faf_altitude, self.faf_distance) {
            let present = raw.fixes.iter().any(|f| {
                f.distance.as_ref().and_then(RawValue::as_finite) == Some(distance)
            });
            if !present {
                raw.fixes.insert(0, RawFix::new(altitude, distance));
            }
        }
    }

    /// Published angle minus fitted angle, in degrees, when the chart gave one.
    pub fn angle_discrepancy(&self, fit: &FittedGlidePath) -> Option<f64> {
        self.glide_path_angle.map(|gpa| gpa - fit.angle_degrees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_range() {
        assert_eq!(within(3.0, ANGLE_RANGE), Some(3.0));
        assert_eq!(within(12.0, ANGLE_RANGE), None);
        assert_eq!(within(f64::NAN, ALTITUDE_RANGE), None);
    }

    #[test]
    fn test_first_match_skips_implausible() {
        let text = "GP 9.99 ... GP 3.00°";
        assert_eq!(first_match(gpa_re(), text, ANGLE_RANGE), Some(3.0));
    }

    #[test]
    fn test_faf_distance_forms() {
        assert_eq!(
            first_match(faf_distance_re(), "FAF KOBET D7.5", DISTANCE_RANGE),
            Some(7.5)
        );
        assert_eq!(
            first_match(faf_distance_re(), "FAF 6.2 NM from THR", DISTANCE_RANGE),
            Some(6.2)
        );
    }
}
