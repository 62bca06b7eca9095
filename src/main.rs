use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use modscope::analysis::{analyze, discover_modules, DEFAULT_MODULE_SUFFIX};
use modscope::export::{render, ReportFormat};
use modscope::logger::init_logger;

#[derive(Parser)]
#[command(name = "modscope")]
#[command(version)]
#[command(about = "Module dependency-graph analyzer with cycle detection", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze module dependencies in a project
    Analyze {
        /// Path to analyze (defaults to current directory)
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Output format: text, json, mermaid or dot
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// File name suffix that marks module documents
        #[arg(long, default_value = DEFAULT_MODULE_SUFFIX)]
        suffix: String,

        /// Exit with status 1 when an error-severity cycle is found
        #[arg(long)]
        fail_on_cycles: bool,
    },
    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Some(Commands::Analyze {
            path,
            format,
            output,
            suffix,
            fail_on_cycles,
        }) => {
            // Validate the format before doing any work.
            let format: ReportFormat = format.parse()?;

            let sources = discover_modules(&path, &suffix)
                .with_context(|| format!("failed to scan {}", path.display()))?;
            info!(documents = sources.len(), path = %path.display(), "scanned project");

            let report = analyze(&sources);

            match output {
                Some(file) => write_report_file(&file, format, &report)?,
                None => {
                    let stdout = io::stdout();
                    let mut handle = stdout.lock();
                    render(format, &report, &mut handle).context("failed to write report")?;
                    handle.flush()?;
                }
            }

            if fail_on_cycles && report.has_error_cycles() {
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Version) => {
            println!("modscope v{}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("modscope - module dependency-graph analyzer");
            println!("Run 'modscope analyze' to analyze a project");
            println!("Run 'modscope --help' for more information");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn write_report_file(
    file: &Path,
    format: ReportFormat,
    report: &modscope::analysis::AnalysisReport,
) -> Result<()> {
    let mut buffer = Vec::new();
    render(format, report, &mut buffer)?;
    fs::write(file, buffer).with_context(|| format!("failed to write {}", file.display()))?;
    info!(path = %file.display(), %format, "report written");
    Ok(())
}
