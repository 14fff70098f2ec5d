pub mod analyzer;
pub mod git;
pub mod report;
pub mod utils;
pub mod visitor;

use crate::analyzer::{AnalyzerConfig, DocGen};
use anyhow::Result;
use clap::Parser;
use colored::*;
use std::path::PathBuf;

/// Command line interface configuration using `clap`.
/// This struct defines the arguments and flags accepted by the program.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the Python project to analyze.
    /// This is the root directory where the scan will begin.
    path: PathBuf,

    /// Output raw JSON.
    /// If true, the full report is printed as JSON for machine parsing,
    /// e.g. to feed an external documentation renderer.
    #[arg(long)]
    json: bool,

    /// Skip the git history lookup.
    /// Useful when git is known to be absent or the repository is large.
    #[arg(long)]
    no_history: bool,
}

/// Main entry point of the application.
///
/// Parses arguments, runs the analysis and prints either a JSON dump of
/// the report or a human-readable summary.
fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.json {
        println!("Analyzing project: {:?}", cli.path);
    }

    let config = AnalyzerConfig {
        fetch_history: !cli.no_history,
        ..AnalyzerConfig::default()
    };
    let docgen = DocGen::new(config);

    // The only hard failure is an unreadable root path; everything else
    // degrades into diagnostics inside the report.
    let report = docgen.analyze(&cli.path)?;

    if cli.json {
        // Serialize the full report; this is the renderer-facing output.
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\n{}", "Python Project Documentation Summary".bold());
        println!("=====================================\n");

        println!("Project: {}", report.project_info.name);
        println!("Analyzed at: {}", report.project_info.analysis_date);
        println!("Files analyzed: {}", report.project_info.total_files);

        let total_lines: usize = report.modules.iter().map(|m| m.lines_of_code).sum();
        println!("Total lines: {}", total_lines);
        println!("Functions: {}", report.functions.len());
        println!("Classes: {}", report.classes.len());

        if !report.dependencies.is_empty() {
            println!("\n - External Dependencies");
            println!("=======================");
            for (i, dep) in report.dependencies.iter().enumerate() {
                println!(" {}. {}", i + 1, dep);
            }
        }

        if !report.git_history.is_empty() {
            println!("\n - Recent History");
            println!("================");
            for line in &report.git_history {
                println!(" {}", line);
            }
        }

        if !report.modules.is_empty() {
            println!("\n - Modules");
            println!("==========");
            for (i, module) in report.modules.iter().enumerate() {
                println!(
                    " {}. {} ({} lines, {} functions, {} classes)",
                    i + 1,
                    module.file_path,
                    module.lines_of_code,
                    module.functions.len(),
                    module.classes.len()
                );
            }
        }

        // Skipped files are reported last so they stand out.
        if !report.diagnostics.is_empty() {
            println!("\n{}", " - Skipped Files".yellow().bold());
            println!("================");
            for (i, diag) in report.diagnostics.iter().enumerate() {
                println!(
                    " {}. {} {}",
                    i + 1,
                    diag.file.display(),
                    diag.message.yellow()
                );
            }
        }
    }

    Ok(())
}
