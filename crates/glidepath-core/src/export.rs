// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::GlidePathResult;
use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn angle_text(result: &GlidePathResult) -> String {
    format!("{:.2}°", result.fit.angle_degrees)
}

/// Writes the summary, DME table and rate table as one CSV document.
pub fn write_csv<W: Write>(writer: W, result: &GlidePathResult) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    wtr.write_record(["Runway", result.runway.as_str()])?;
    wtr.write_record(["Glide Path Angle", angle_text(result).as_str()])?;
    wtr.write_record([
        "Percent Grade",
        format!("{:.2}%", result.fit.percent_grade).as_str(),
    ])?;
    wtr.write_record(["Feet per NM", result.feet_per_nm.to_string().as_str()])?;

    wtr.write_record(["DIST (NM)", "ALT (ft)"])?;
    for checkpoint in &result.checkpoints {
        wtr.write_record([
            format!("{:.1}", checkpoint.distance),
            checkpoint.altitude.to_string(),
        ])?;
    }

    let mut header = vec!["GS (kts)".to_string()];
    let mut rates = vec!["ROD (ft/min)".to_string()];
    let mut times = vec!["TIME (MM:SS)".to_string()];
    for row in &result.derived_rows {
        header.push(row.groundspeed.to_string());
        rates.push(row.descent_rate.to_string());
        times.push(row.time_to_fly.to_string());
    }
    wtr.write_record(&header)?;
    wtr.write_record(&rates)?;
    wtr.write_record(&times)?;

    wtr.flush()?;
    Ok(())
}

pub fn export_csv(path: &Path, result: &GlidePathResult) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(file, result)?;
    log::info!("Exported CSV — path={}", path.display());
    Ok(())
}

/// Printable fixed-width report of the same tables.
pub fn render_report(result: &GlidePathResult) -> String {
    let mut out = String::new();
    write_report(&mut out, result).expect("formatting into a String cannot fail");
    out
}

fn write_report(out: &mut String, result: &GlidePathResult) -> fmt::Result {
    if result.runway.is_empty() {
        writeln!(out, "DESCENT PROFILE")?;
    } else {
        writeln!(out, "DESCENT PROFILE — {}", result.runway)?;
    }
    writeln!(
        out,
        "Glide path {}  ({:.2}%, {} ft/NM)",
        angle_text(result),
        result.fit.percent_grade,
        result.feet_per_nm
    )?;
    if let Some(start) = result.start_altitude {
        writeln!(out, "Start altitude {:.0} ft", start)?;
    }
    writeln!(out)?;

    writeln!(out, "{:>10}  {:>9}", "DIST (NM)", "ALT (ft)")?;
    for (i, checkpoint) in result.checkpoints.iter().enumerate() {
        let marker = if i == 0 { "  FAF" } else { "" };
        writeln!(
            out,
            "{:>10.1}  {:>9}{}",
            checkpoint.distance, checkpoint.altitude, marker
        )?;
    }
    writeln!(out)?;

    write!(out, "{:<14}", "GS (kts)")?;
    for row in &result.derived_rows {
        write!(out, "{:>7}", row.groundspeed)?;
    }
    writeln!(out)?;
    write!(out, "{:<14}", "ROD (ft/min)")?;
    for row in &result.derived_rows {
        write!(out, "{:>7}", row.descent_rate)?;
    }
    writeln!(out)?;
    write!(out, "{:<14}", "TIME (MM:SS)")?;
    for row in &result.derived_rows {
        write!(out, "{:>7}", row.time_to_fly.to_string())?;
    }
    writeln!(out, "\n\nFAF to MAPt {:.2} NM", result.distance_to_fly_nm)
}
