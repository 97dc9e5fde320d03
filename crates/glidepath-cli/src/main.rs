// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use glidepath_core::chart::ProfileChart;
use glidepath_core::export::{render_report, write_csv};
use glidepath_core::{
    DistanceMode, GlidePathPlanner, PlannerConfig, RawApproach, RawFix, RawValue, StopReason,
};
use glidepath_scrape::{ChartScan, ScrapeError};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Published and fitted angles further apart than this get a warning.
const ANGLE_WARN_DEG: f64 = 0.1;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Planner config file (defaults to the user config directory)
    #[arg(short, long, env = "GLIDEPATH_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a glide path and print the DME and rate-of-descent tables
    Compute(ComputeArgs),
    /// Pull candidate approach values out of extracted chart text
    Scan {
        /// Text extracted from the approach chart (pages split by form feeds)
        file: PathBuf,
        /// Write a prefilled approach file after confirmation
        #[arg(long)]
        emit: Option<PathBuf>,
        /// Approach file to prefill instead of an empty form
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Accept the scanned values without prompting
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the effective planner config
    Config {
        /// Overwrite the config file with defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Args)]
struct ComputeArgs {
    /// Approach file (JSON); flags override its values
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Step-down fix as ALT@DIST, e.g. 5000@12.0 (repeatable)
    #[arg(long = "fix", value_name = "ALT@DIST", value_parser = parse_fix, allow_hyphen_values = true)]
    fixes: Vec<RawFix>,

    #[arg(long)]
    runway: Option<String>,

    /// Threshold elevation (ft MSL)
    #[arg(long = "thr-elev", allow_hyphen_values = true)]
    threshold_elevation: Option<String>,

    /// DME reading at the threshold (NM)
    #[arg(long = "dme-at-thr", allow_hyphen_values = true)]
    dme_at_threshold: Option<String>,

    /// Minimum descent altitude (ft MSL)
    #[arg(long)]
    mda: Option<String>,

    #[arg(long = "start-alt")]
    start_altitude: Option<String>,

    /// FAF to MAPt ground distance (NM)
    #[arg(long = "faf-mapt-dist", conflicts_with = "mapt_alt")]
    faf_mapt_dist: Option<String>,

    /// Derive the FAF to MAPt distance from this MAPt altitude instead
    #[arg(long = "mapt-alt")]
    mapt_alt: Option<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write the output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write chart series (JSON) for a plotting front end
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Chart text to cross-check the fitted angle against
    #[arg(long)]
    check_against: Option<PathBuf>,
}

fn parse_fix(s: &str) -> Result<RawFix, String> {
    let (alt, dist) = s
        .split_once('@')
        .ok_or_else(|| format!("expected ALT@DIST, got '{}'", s))?;
    Ok(RawFix::new(alt, dist))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn load_config(explicit: Option<&Path>) -> Result<(PathBuf, PlannerConfig)> {
    match explicit {
        Some(path) => {
            let config = PlannerConfig::load(path)
                .with_context(|| format!("Failed to load planner config {:?}", path))?;
            Ok((path.to_path_buf(), config))
        }
        None => {
            let path = PlannerConfig::default_path();
            let config = PlannerConfig::load_or_default(&path);
            Ok((path, config))
        }
    }
}

fn read_approach(path: &Path) -> Result<RawApproach> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read approach file {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse approach file {:?}", path))
}

fn build_raw(args: &ComputeArgs) -> Result<RawApproach> {
    let mut raw = match &args.input {
        Some(path) => read_approach(path)?,
        None => RawApproach::default(),
    };

    let text = |v: &Option<String>| v.as_deref().map(RawValue::from);
    if let Some(runway) = &args.runway {
        raw.runway = runway.clone();
    }
    if args.threshold_elevation.is_some() {
        raw.threshold_elevation = text(&args.threshold_elevation);
    }
    if args.dme_at_threshold.is_some() {
        raw.dme_at_threshold = text(&args.dme_at_threshold);
    }
    if args.mda.is_some() {
        raw.minimum_descent_altitude = text(&args.mda);
    }
    if args.start_altitude.is_some() {
        raw.start_altitude = text(&args.start_altitude);
    }
    if args.faf_mapt_dist.is_some() {
        raw.distance_mode = DistanceMode::FafToMapt;
        raw.faf_to_mapt_distance = text(&args.faf_mapt_dist);
    }
    if args.mapt_alt.is_some() {
        raw.distance_mode = DistanceMode::MaptAltitude;
        raw.mapt_altitude = text(&args.mapt_alt);
    }
    if !args.fixes.is_empty() {
        raw.fixes = args.fixes.clone();
    }
    Ok(raw)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(
            File::create(p).with_context(|| format!("Failed to create output file {:?}", p))?,
        ),
        None => Box::new(io::stdout().lock()),
    })
}

fn run_compute(args: &ComputeArgs, config: PlannerConfig) -> Result<()> {
    let raw = build_raw(args)?;
    let planner = GlidePathPlanner::new(config);
    let (approach, result) = planner.calculate(&raw)?;

    let mut out = open_output(args.output.as_deref())?;
    match args.format {
        OutputFormat::Table => {
            write!(out, "{}", render_report(&result))?;
            let note = match result.stop_reason {
                StopReason::TableFull => None,
                StopReason::PastThreshold => Some("table ends at the threshold"),
                StopReason::BelowMda => Some("table ends at the MDA"),
            };
            if let Some(note) = note {
                writeln!(out, "({})", note)?;
            }
        }
        OutputFormat::Json => {
            let doc = serde_json::json!({
                "parameters": approach.parameters,
                "fixes": approach.fixes,
                "result": result,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
        }
        OutputFormat::Csv => write_csv(&mut out, &result)?,
    }
    out.flush()?;

    if let Some(chart_path) = &args.chart {
        let mut chart = ProfileChart::new();
        chart.update(&approach.parameters, &approach.fixes, &result, planner.config());
        fs::write(chart_path, chart.to_json()?)
            .with_context(|| format!("Failed to write chart series {:?}", chart_path))?;
        log::info!("Wrote chart series — path={}", chart_path.display());
    }

    if let Some(chart_text) = &args.check_against {
        match ChartScan::scan_file(chart_text) {
            Ok(scan) => match scan.angle_discrepancy(&result.fit) {
                Some(diff) if diff.abs() > ANGLE_WARN_DEG => log::warn!(
                    "Fitted angle {:.2}° differs from the published {:.2}° by {:.2}°",
                    result.fit.angle_degrees,
                    result.fit.angle_degrees + diff,
                    diff.abs()
                ),
                Some(_) => log::info!("Fitted angle agrees with the published angle"),
                None => log::info!("No published angle found in {:?}", chart_text),
            },
            Err(e) => log::warn!("Chart cross-check skipped: {}", e),
        }
    }

    Ok(())
}

fn print_scan(scan: &ChartScan) {
    let show = |label: &str, value: Option<f64>| match value {
        Some(v) => println!("  {:<26} {}", label, v),
        None => println!("  {:<26} -", label),
    };
    println!("Candidate values (unverified):");
    show("Minimum descent altitude", scan.minimum_descent_altitude);
    show("Threshold elevation", scan.threshold_elevation);
    show("FAF altitude", scan.faf_altitude);
    show("FAF distance", scan.faf_distance);
    show("Glide path angle", scan.glide_path_angle);
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn run_scan(file: &Path, emit: Option<&Path>, input: Option<&Path>, yes: bool) -> Result<()> {
    let scan = match ChartScan::scan_file(file) {
        Ok(scan) => scan,
        Err(ScrapeError::NothingMatched) => {
            println!("{}", ScrapeError::NothingMatched);
            return Ok(());
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to scan {:?}", file)),
    };
    print_scan(&scan);

    let Some(emit) = emit else {
        return Ok(());
    };
    if !yes && !confirm("Use these values to prefill the approach?")? {
        println!("Nothing written.");
        return Ok(());
    }

    let mut raw = match input {
        Some(path) => read_approach(path)?,
        None => RawApproach::default(),
    };
    scan.prefill(&mut raw);
    fs::write(emit, serde_json::to_string_pretty(&raw)?)
        .with_context(|| format!("Failed to write approach file {:?}", emit))?;
    println!("Prefilled approach written to {}", emit.display());
    Ok(())
}

fn run_config(path: &Path, config: &PlannerConfig, reset: bool) -> Result<()> {
    let config = if reset {
        let defaults = PlannerConfig::default();
        defaults
            .save(path)
            .with_context(|| format!("Failed to write planner config {:?}", path))?;
        println!("Reset planner config to defaults.");
        defaults
    } else {
        config.clone()
    };
    println!("Config file: {}", path.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Compute(args) => {
            let (_, config) = load_config(cli.config.as_deref())?;
            run_compute(args, config)
        }
        Commands::Scan {
            file,
            emit,
            input,
            yes,
        } => run_scan(file, emit.as_deref(), input.as_deref(), *yes),
        Commands::Config { reset } => {
            let explicit = cli.config.as_deref();
            let (path, config) = if *reset {
                (
                    explicit
                        .map(Path::to_path_buf)
                        .unwrap_or_else(PlannerConfig::default_path),
                    PlannerConfig::default(),
                )
            } else {
                load_config(explicit)?
            };
            run_config(&path, &config, *reset)
        }
    }
}
