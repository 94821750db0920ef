use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use ocr_table_rows::{
    BatchReport, DEFAULT_ROW_THRESHOLD_PX, LayoutOptions, OutputFormat, PaddleJsonEngine,
    PipelineOptions, extract_dir, parse_detections, parse_extensions, reconstruct_table,
    tokens_from_detections, write_csv_to_string,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "ocr2csv",
    version,
    about = "Rebuild table rows from OCR text boxes and export them as CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert every image in a directory into one table file per image.
    Extract(ExtractArgs),
    /// Convert a single detection JSON file and print the CSV to stdout.
    Page(PageArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Directory containing the page images.
    #[arg(short, long)]
    input_dir: PathBuf,

    /// Directory receiving one output file per image.
    #[arg(short, long, default_value = "extracted")]
    output_dir: PathBuf,

    /// Directory holding `<image stem>.json` detections. Defaults to the image directory.
    #[arg(long)]
    detections_dir: Option<PathBuf>,

    /// Maximum vertical distance in pixels from a row's first token.
    #[arg(long, default_value_t = DEFAULT_ROW_THRESHOLD_PX)]
    row_threshold: f64,

    /// Output format: csv or json.
    #[arg(long, default_value = "csv")]
    format: String,

    /// Output delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Pad short CSV rows with empty cells up to the widest row.
    #[arg(long)]
    pad: bool,

    /// Image extensions to pick up, comma separated.
    #[arg(long = "ext", default_value = "png,jpg,jpeg,bmp,gif")]
    extensions: String,

    /// Print every failure and warning.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct PageArgs {
    /// PaddleOCR detection JSON for one image.
    #[arg(short, long)]
    detections: PathBuf,

    /// Maximum vertical distance in pixels from a row's first token.
    #[arg(long, default_value_t = DEFAULT_ROW_THRESHOLD_PX)]
    row_threshold: f64,

    /// Output delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Pad short rows with empty cells up to the widest row.
    #[arg(long)]
    pad: bool,
}

fn parse_delimiter(delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }
    Ok(delimiter as u8)
}

fn parse_options(args: &ExtractArgs) -> Result<PipelineOptions> {
    let format = OutputFormat::from_str(&args.format)
        .map_err(|error| anyhow!(error))
        .context("failed to parse --format")?;
    let extensions = parse_extensions(&args.extensions)
        .map_err(|error| anyhow!(error))
        .context("failed to parse --ext")?;

    Ok(PipelineOptions {
        layout: LayoutOptions {
            row_threshold_px: args.row_threshold,
        },
        output_dir: args.output_dir.clone(),
        format,
        delimiter: parse_delimiter(args.delimiter)?,
        pad_rows: args.pad,
        extensions,
    })
}

fn log_report(report: &BatchReport, verbose: bool) {
    let failures = report.failures().count();
    if failures > 0 {
        eprintln!(
            "warning: {failures} of {} image(s) could not be converted",
            report.pages.len()
        );
        if verbose {
            for (page, error) in report.failures() {
                eprintln!("  - {}: {error}", page.image_path.display());
            }
        }
    }

    let warnings = report.all_warnings().collect::<Vec<_>>();
    if !warnings.is_empty() {
        eprintln!("warning: {} issue(s) detected", warnings.len());
        if verbose {
            for warning in warnings {
                eprintln!(
                    "  - {:?} image={:?} token={:?}: {}",
                    warning.code, warning.image, warning.token_index, warning.message
                );
            }
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<BatchReport> {
    let options = parse_options(args)?;
    let engine = PaddleJsonEngine::new(args.detections_dir.clone());
    extract_dir(&args.input_dir, &engine, &options)
        .with_context(|| format!("failed to convert images in '{}'", args.input_dir.display()))
}

fn run_page(args: &PageArgs) -> Result<String> {
    let json = fs::read_to_string(&args.detections)
        .with_context(|| format!("failed to read '{}'", args.detections.display()))?;
    let detections = parse_detections(&json)
        .with_context(|| format!("invalid detections in '{}'", args.detections.display()))?;
    let tokens = tokens_from_detections(detections)?;
    let options = LayoutOptions {
        row_threshold_px: args.row_threshold,
    };
    let table = reconstruct_table(tokens, &options)?;
    Ok(write_csv_to_string(
        &table,
        parse_delimiter(args.delimiter)?,
        args.pad,
    )?)
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ocr_table_rows=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(report) => {
                log_report(&report, args.verbose);
                if report.tables_written() > 0 {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(2)
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
        Commands::Page(args) => match run_page(&args) {
            Ok(csv) => {
                print!("{csv}");
                ExitCode::SUCCESS
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
