//! CSV template generation for input files

use clap::ValueEnum;
use console::style;
use miette::Result;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TemplateKind {
    /// Measurement data file
    Measurements,
    /// Specification data file
    Specifications,
}

#[derive(clap::Args, Debug)]
pub struct TemplateArgs {
    /// Which input file to generate a template for
    #[arg(value_enum)]
    pub kind: TemplateKind,
}

pub fn run(args: TemplateArgs) -> Result<()> {
    let (headers, example, name) = match args.kind {
        TemplateKind::Measurements => (
            csv_headers_measurements(),
            csv_example_measurements(),
            "measurements",
        ),
        TemplateKind::Specifications => (
            csv_headers_specifications(),
            csv_example_specifications(),
            "specifications",
        ),
    };

    // Output to stdout (can be redirected to file)
    println!("{}", headers.join(","));
    println!("{}", example.join(","));

    // Print usage hint to stderr so it doesn't interfere with redirected output
    eprintln!();
    eprintln!(
        "{} Template generated. Redirect to file: specgate template {} > {}.csv",
        style("→").blue(),
        name,
        name
    );

    Ok(())
}

fn csv_headers_measurements() -> Vec<&'static str> {
    vec![
        "part_id",
        "measurement_type",
        "measured_value",
        "unit",
        "inspector",
        "date",
    ]
}

fn csv_example_measurements() -> Vec<&'static str> {
    vec![
        "\"P-001\"",
        "\"bore_diameter\"",
        "25.01",
        "mm",
        "\"J. Park\"",
        "2024-03-02",
    ]
}

fn csv_headers_specifications() -> Vec<&'static str> {
    vec![
        "part_id",
        "measurement_type",
        "part_name",
        "category",
        "spec_min",
        "spec_max",
        "unit",
        "critical",
    ]
}

fn csv_example_specifications() -> Vec<&'static str> {
    vec![
        "\"P-001\"",
        "\"bore_diameter\"",
        "\"Bearing Housing\"",
        "machined",
        "24.98",
        "25.02",
        "mm",
        "true",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_and_examples_align() {
        assert_eq!(
            csv_headers_measurements().len(),
            csv_example_measurements().len()
        );
        assert_eq!(
            csv_headers_specifications().len(),
            csv_example_specifications().len()
        );
    }
}
