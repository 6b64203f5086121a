//! `specgate report` command - Markdown report from a classification run

use miette::{IntoDiagnostic, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{format_spec_range, truncate_str};
use crate::cli::GlobalOpts;
use crate::records::{RunResult, Verdict};

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Classification run JSON (output of `specgate classify`)
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Only list parts that have borderline or failing items
    #[arg(long)]
    pub issues_only: bool,
}

pub fn run(args: ReportArgs, _global: &GlobalOpts) -> Result<()> {
    if !args.input.exists() {
        return Err(miette::miette!("File not found: {}", args.input.display()));
    }
    let contents = fs::read_to_string(&args.input).into_diagnostic()?;
    let result: RunResult = serde_json::from_str(&contents)
        .map_err(|e| miette::miette!("Malformed run result {}: {}", args.input.display(), e))?;

    let mut output = String::new();
    output.push_str("# Inspection Classification Report\n\n");
    output.push_str(&format!(
        "**Measurements:** {}\n\n",
        result.meta.measurements_file
    ));
    output.push_str(&format!(
        "**Specifications:** {}\n\n",
        result.meta.specifications_file
    ));
    output.push_str(&format!(
        "**Extracted:** {}\n\n",
        result.meta.extraction_timestamp.format("%Y-%m-%d %H:%M")
    ));
    output.push_str("---\n\n");

    // Verdict summary
    output.push_str("## Summary\n\n");
    let total = result.items.len();
    let mut summary_builder = Builder::default();
    summary_builder.push_record(["Verdict", "Count", "Percentage"]);
    for verdict in [Verdict::Pass, Verdict::Borderline, Verdict::Fail] {
        let count = result.count(verdict);
        let pct = if total > 0 {
            (count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        summary_builder.push_record([
            verdict.to_string(),
            count.to_string(),
            format!("{:.1}%", pct),
        ]);
    }
    output.push_str(&summary_builder.build().with(Style::markdown()).to_string());
    output.push('\n');

    let critical_fails = result
        .items
        .iter()
        .filter(|i| i.critical && i.verdict == Verdict::Fail)
        .count();
    if critical_fails > 0 {
        output.push_str(&format!(
            "\n**Critical failures:** {}\n",
            critical_fails
        ));
    }
    output.push_str("\n---\n\n");

    // Per-part sections
    output.push_str("## Parts\n\n");
    for (part_id, summary) in &result.parts_summary {
        let has_issues = summary
            .item_indices
            .iter()
            .filter_map(|&idx| result.items.get(idx))
            .any(|item| item.verdict != Verdict::Pass);
        if args.issues_only && !has_issues {
            continue;
        }

        let name = if summary.part_name.is_empty() {
            "-"
        } else {
            &summary.part_name
        };
        let category = if summary.category.is_empty() {
            "-"
        } else {
            &summary.category
        };
        output.push_str(&format!(
            "### {}: {} ({}, {} measurements)\n\n",
            part_id, name, category, summary.measurement_count
        ));

        let mut builder = Builder::default();
        builder.push_record([
            "Type", "Value", "Spec", "Margin", "Verdict", "Critical", "Inspector", "Date",
        ]);
        for &idx in &summary.item_indices {
            let item = match result.items.get(idx) {
                Some(item) => item,
                None => continue,
            };
            let marker = match item.verdict {
                Verdict::Pass => "✓ PASS",
                Verdict::Borderline => "⚠ BORDERLINE",
                Verdict::Fail => "✗ FAIL",
            };
            builder.push_record([
                truncate_str(&item.measurement_type, 20),
                format!("{}{}", item.measured_value, item.unit),
                format_spec_range(item.spec_min, item.spec_max, &item.unit),
                format!("{}%", item.margin_pct),
                marker.to_string(),
                (if item.critical { "yes" } else { "-" }).to_string(),
                truncate_str(&item.inspector, 15),
                item.date.clone(),
            ]);
        }
        output.push_str(&builder.build().with(Style::markdown()).to_string());
        output.push_str("\n\n");
    }
    output.push_str("---\n\n");

    // Worst margins across the whole run
    let mut ranked: Vec<_> = result.items.iter().collect();
    ranked.sort_by(|a, b| {
        a.margin_pct
            .partial_cmp(&b.margin_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let closest: Vec<_> = ranked.into_iter().take(5).collect();
    if !closest.is_empty() {
        output.push_str("## Closest to Limits\n\n");
        let mut builder = Builder::default();
        builder.push_record(["Part", "Type", "Value", "Spec", "Margin", "Verdict"]);
        for item in closest {
            builder.push_record([
                item.part_id.clone(),
                truncate_str(&item.measurement_type, 20),
                format!("{}{}", item.measured_value, item.unit),
                format_spec_range(item.spec_min, item.spec_max, &item.unit),
                format!("{}%", item.margin_pct),
                item.verdict.to_string(),
            ]);
        }
        output.push_str(&builder.build().with(Style::markdown()).to_string());
        output.push('\n');
    }

    output.push_str(&format!(
        "\n---\n\n*Generated: {}*\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    ));

    write_output(&output, args.output)
}

fn write_output(content: &str, output_path: Option<PathBuf>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(&path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
