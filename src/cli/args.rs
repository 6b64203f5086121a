//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand};

use crate::cli::commands::{
    classify::ClassifyArgs, completions::CompletionsArgs, report::ReportArgs,
    template::TemplateArgs,
};

#[derive(Parser)]
#[command(name = "specgate")]
#[command(author, version, about = "Specgate inspection classification toolkit")]
#[command(
    long_about = "Joins inspection measurements to tolerance specifications, computes signed margin percentages, and classifies each measurement as PASS, BORDERLINE, or FAIL."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify measurements against specifications
    Classify(ClassifyArgs),

    /// Render a Markdown report from a classification run
    Report(ReportArgs),

    /// Print a CSV template for an input file
    Template(TemplateArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}
