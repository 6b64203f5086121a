//! `specgate classify` command - join measurements to specs and classify

use chrono::Utc;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::helpers::{build_header_map, format_spec_range, get_field};
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::engine::{self, SpecIndex};
use crate::records::{MeasurementRecord, RunMeta, SpecRecord, Verdict};

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// Measurement data CSV path
    #[arg(long, short = 'm')]
    pub measurements: PathBuf,

    /// Specification data CSV path
    #[arg(long, short = 's')]
    pub specifications: PathBuf,

    /// Output JSON path
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Borderline threshold percentage (overrides configuration)
    #[arg(long, short = 't')]
    pub threshold: Option<f64>,

    /// Extra configuration file merged over the defaults
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

pub fn run(args: ClassifyArgs, global: &GlobalOpts) -> Result<()> {
    let mut config = Config::load();
    if let Some(ref path) = args.config {
        let contents = fs::read_to_string(path)
            .map_err(|e| miette::miette!("Cannot read config file {}: {}", path.display(), e))?;
        let overlay: Config = serde_yml::from_str(&contents)
            .map_err(|e| miette::miette!("Malformed config file {}: {}", path.display(), e))?;
        config.merge(overlay);
    }

    let threshold = args
        .threshold
        .unwrap_or_else(|| config.borderline_threshold());
    if threshold < 0.0 {
        return Err(miette::miette!(
            "Borderline threshold must be non-negative, got {}",
            threshold
        ));
    }

    for path in [&args.measurements, &args.specifications] {
        if !path.exists() {
            return Err(miette::miette!("File not found: {}", path.display()));
        }
    }

    let measurements = read_measurements(&args.measurements)?;
    let spec_records = read_specifications(&args.specifications)?;

    if !global.quiet {
        println!(
            "{} {} measurements, {} specifications, borderline threshold {}%",
            style("→").blue(),
            measurements.len(),
            spec_records.len(),
            threshold
        );
    }

    let index = SpecIndex::build(&spec_records, config.duplicate_policy())
        .map_err(|e| miette::miette!("{}", e))?;

    let meta = RunMeta {
        measurements_file: args.measurements.display().to_string(),
        specifications_file: args.specifications.display().to_string(),
        extraction_timestamp: Utc::now(),
    };
    let outcome = engine::join::run(&measurements, &index, threshold, meta);

    for skip in &outcome.skipped {
        eprintln!(
            "{} row {}: invalid value {:?} for {}/{}, skipped",
            style("warning:").yellow().bold(),
            skip.row,
            skip.record.measured_value,
            skip.record.part_id.trim(),
            skip.record.measurement_type.trim()
        );
    }

    if !global.quiet {
        for item in &outcome.result.items {
            let marker = match item.verdict {
                Verdict::Pass => style("✓").green(),
                Verdict::Borderline => style("⚠").yellow(),
                Verdict::Fail => style("✗").red(),
            };
            println!(
                "  {} {}/{}: {}{} (spec: {}, margin: {}%) → {}{}",
                marker,
                item.part_id,
                item.measurement_type,
                item.measured_value,
                item.unit,
                format_spec_range(item.spec_min, item.spec_max, &item.unit),
                item.margin_pct,
                item.verdict,
                if item.critical { " [CRITICAL]" } else { "" }
            );
        }
    }

    let result = &outcome.result;
    if !global.quiet {
        println!(
            "\n  {} {} classified, {} skipped",
            style("Summary:").bold(),
            result.items.len(),
            outcome.skipped.len()
        );
        println!(
            "    PASS: {} | BORDERLINE: {} | FAIL: {}",
            result.count(Verdict::Pass),
            result.count(Verdict::Borderline),
            result.count(Verdict::Fail)
        );
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).into_diagnostic()?;
        }
    }
    let json = serde_json::to_string_pretty(result).into_diagnostic()?;
    fs::write(&args.output, json).into_diagnostic()?;

    if !global.quiet {
        println!("\n{} Saved: {}", style("✓").green(), args.output.display());
    }

    Ok(())
}

/// Required measurement columns, checked before any row is read
const MEASUREMENT_COLUMNS: &[&str] = &["part_id", "measurement_type", "measured_value"];

/// Required specification columns
const SPEC_COLUMNS: &[&str] = &["part_id", "measurement_type"];

fn read_measurements(path: &Path) -> Result<Vec<MeasurementRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| miette::miette!("Cannot read {}: {}", path.display(), e))?;
    let header_map = build_header_map(reader.headers().into_diagnostic()?);
    require_columns(&header_map, MEASUREMENT_COLUMNS, path)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.into_diagnostic()?;
        records.push(MeasurementRecord {
            part_id: get_field(&row, &header_map, "part_id").unwrap_or_default(),
            measurement_type: get_field(&row, &header_map, "measurement_type")
                .unwrap_or_default(),
            measured_value: get_field(&row, &header_map, "measured_value").unwrap_or_default(),
            unit: get_field(&row, &header_map, "unit"),
            inspector: get_field(&row, &header_map, "inspector").unwrap_or_default(),
            date: get_field(&row, &header_map, "date").unwrap_or_default(),
        });
    }
    Ok(records)
}

fn read_specifications(path: &Path) -> Result<Vec<SpecRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| miette::miette!("Cannot read {}: {}", path.display(), e))?;
    let header_map = build_header_map(reader.headers().into_diagnostic()?);
    require_columns(&header_map, SPEC_COLUMNS, path)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.into_diagnostic()?;
        records.push(SpecRecord {
            part_id: get_field(&row, &header_map, "part_id").unwrap_or_default(),
            measurement_type: get_field(&row, &header_map, "measurement_type")
                .unwrap_or_default(),
            part_name: get_field(&row, &header_map, "part_name").unwrap_or_default(),
            category: get_field(&row, &header_map, "category").unwrap_or_default(),
            spec_min: get_field(&row, &header_map, "spec_min").unwrap_or_default(),
            spec_max: get_field(&row, &header_map, "spec_max").unwrap_or_default(),
            unit: get_field(&row, &header_map, "unit").unwrap_or_default(),
            critical: get_field(&row, &header_map, "critical").unwrap_or_default(),
        });
    }
    Ok(records)
}

fn require_columns(
    header_map: &std::collections::HashMap<String, usize>,
    required: &[&str],
    path: &Path,
) -> Result<()> {
    for column in required {
        if !header_map.contains_key(*column) {
            return Err(miette::miette!(
                "Missing required column '{}' in {}",
                column,
                path.display()
            ));
        }
    }
    Ok(())
}
