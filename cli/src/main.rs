//! unoutline CLI - PDF heading outline extraction tool

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unoutline::pipeline::list_inputs;
use unoutline::render::{to_json, JsonFormat};
use unoutline::{
    DocumentOutcome, DocumentPipeline, FileReport, FileStatus, LineOrder, ModelClassifier,
    OutlineOrder, PipelineOptions,
};

#[derive(Parser)]
#[command(name = "unoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract a title and H1-H3 outline from PDF files", long_about = None)]
struct Cli {
    /// Directory containing input PDF files
    #[arg(long, value_name = "DIR", env = "UNOUTLINE_INPUT", default_value = "/app/input")]
    input: PathBuf,

    /// Directory for the JSON results
    #[arg(long, value_name = "DIR", env = "UNOUTLINE_OUTPUT", default_value = "/app/output")]
    output: PathBuf,

    /// Process documents in parallel
    #[arg(long)]
    parallel: bool,

    /// Stop at the first failed file and exit with an error
    #[arg(long)]
    strict: bool,

    /// Only print the summary
    #[arg(short, long)]
    quiet: bool,

    #[command(flatten)]
    model: ModelArgs,

    #[command(flatten)]
    order: OrderArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ModelArgs {
    /// Decision forest model (JSON)
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "UNOUTLINE_MODEL",
        default_value = "/app/models/headings_model.json"
    )]
    model: PathBuf,

    /// Label encoder (JSON)
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "UNOUTLINE_LABELS",
        default_value = "/app/models/label_encoder.json"
    )]
    labels: PathBuf,
}

#[derive(Args)]
struct OrderArgs {
    /// Order of lines within a page
    #[arg(long, global = true, value_enum, default_value = "top-to-bottom")]
    line_order: LineOrderArg,

    /// Order of outline entries
    #[arg(long, global = true, value_enum, default_value = "level-major")]
    outline_order: OutlineOrderArg,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the reconstructed lines of a PDF with their features
    Lines {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the outline of a single PDF
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LineOrderArg {
    /// Order in which each line position first appears in the page
    FirstSeen,
    /// Top of the page first (default)
    TopToBottom,
}

impl From<LineOrderArg> for LineOrder {
    fn from(arg: LineOrderArg) -> Self {
        match arg {
            LineOrderArg::FirstSeen => LineOrder::FirstSeen,
            LineOrderArg::TopToBottom => LineOrder::TopToBottom,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutlineOrderArg {
    /// All H1, then all H2, then all H3 (default)
    LevelMajor,
    /// Document order with levels interleaved
    ReadingOrder,
}

impl From<OutlineOrderArg> for OutlineOrder {
    fn from(arg: OutlineOrderArg) -> Self {
        match arg {
            OutlineOrderArg::LevelMajor => OutlineOrder::LevelMajor,
            OutlineOrderArg::ReadingOrder => OutlineOrder::ReadingOrder,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let options = PipelineOptions::new()
        .with_line_order(cli.order.line_order.into())
        .with_outline_order(cli.order.outline_order.into())
        .with_parallel(cli.parallel);
    let options = if cli.strict {
        options.strict()
    } else {
        options.lenient()
    };

    let result = match &cli.command {
        Some(Commands::Lines { input }) => cmd_lines(input, options),
        Some(Commands::Outline { input }) => cmd_outline(input, &cli.model, options),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_batch(&cli, &cli.model, options),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_pipeline(
    model: &ModelArgs,
    options: PipelineOptions,
) -> Result<DocumentPipeline<ModelClassifier>, Box<dyn std::error::Error>> {
    let classifier = ModelClassifier::load(&model.model, &model.labels)?;
    Ok(DocumentPipeline::with_options(classifier, options))
}

fn cmd_batch(
    cli: &Cli,
    model: &ModelArgs,
    options: PipelineOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    // The model must load before any input is touched.
    let pipeline = load_pipeline(model, options)?;

    let total = list_inputs(&cli.input)
        .map_err(|e| format!("cannot read input directory {}: {}", cli.input.display(), e))?
        .len();

    let pb = if cli.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message("Processing...");

    let quiet = cli.quiet;
    let report = pipeline.run_batch(&cli.input, &cli.output, |file: &FileReport| {
        if !quiet {
            pb.println(status_line(file));
        }
        pb.inc(1);
    });
    pb.finish_and_clear();
    let report = report?;

    println!(
        "{} {} processed, {} skipped, {} failed",
        "Done!".green().bold(),
        report.processed(),
        report.skipped(),
        report.failed()
    );

    Ok(())
}

fn status_line(file: &FileReport) -> String {
    match &file.status {
        FileStatus::Processed { output } => format!(
            "  {} {} {} {}",
            "ok".green(),
            file.name(),
            "->".dimmed(),
            output.display()
        ),
        FileStatus::Skipped { reason } => {
            format!("  {} {} ({})", "skip".yellow(), file.name(), reason)
        }
        FileStatus::Failed { error } => {
            format!("  {} {}: {}", "fail".red().bold(), file.name(), error)
        }
    }
}

fn cmd_lines(input: &Path, options: PipelineOptions) -> Result<(), Box<dyn std::error::Error>> {
    let lines = unoutline::extract_lines_with_options(input, options)?;
    println!("{}", to_json(&lines, JsonFormat::Pretty)?);
    Ok(())
}

fn cmd_outline(
    input: &Path,
    model: &ModelArgs,
    options: PipelineOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = load_pipeline(model, options)?;

    match pipeline.process_file(input)? {
        DocumentOutcome::Processed(result) => {
            println!("{}", to_json(&result, JsonFormat::Pretty)?);
        }
        DocumentOutcome::Skipped(reason) => {
            eprintln!("{} {} ({})", "Skipped".yellow(), input.display(), reason);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "unoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF heading outline extraction tool");
    println!();
    println!("License: MIT");
}
