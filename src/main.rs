// src/main.rs
mod utils;
mod loaders;
mod extractors;
mod storage;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use extractors::{AttributeExtractor, ModelLocation};
use loaders::DocumentFormat;
use storage::{StorageManager, SummaryMetadata};
use utils::AppError;

/// Command Line Interface for the product attribute extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Document to scan (.txt, .pdf or .docx)
    input: PathBuf,

    /// Treat the input as this format instead of going by its extension (txt, pdf, docx)
    #[arg(short, long)]
    format: Option<String>,

    /// Output directory for the spreadsheet summary
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Number of characters of extracted text to preview
    #[arg(long, default_value = "1000")]
    preview_chars: usize,

    /// Do not print the extracted text preview
    #[arg(long)]
    no_preview: bool,

    /// Only render the table; skip writing the spreadsheet and metadata
    #[arg(long)]
    no_export: bool,

    /// nlprule English tokenizer binary for brand tagging
    /// (default: $ATTR_EXTRACTOR_TAGGER_MODEL, then <data dir>/attr_extractor/en_tokenizer.bin)
    #[arg(long)]
    tagger_model: Option<PathBuf>,

    /// Debug logging (when RUST_LOG is not set)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging(args.verbose);
    tracing::info!("Starting processing for args: {:?}", args);

    // Every error is terminal for the run and goes straight to the user
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    if !args.input.is_file() {
        return Err(AppError::Config(format!("Input file not found: {}", args.input.display())));
    }

    // 3. Resolve the document format once, at the boundary
    let format = match &args.format {
        Some(ext) => DocumentFormat::from_extension(ext.trim_start_matches('.'))?,
        None => DocumentFormat::from_path(&args.input)?,
    };
    tracing::debug!("Resolved input format: {} (.{})", format, format.extension());
    let file_name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.input.display().to_string());

    // 4. Load the document text; any failure here halts before extraction
    let bytes = std::fs::read(&args.input)?;
    let text = loaders::load(bytes, format)?;
    println!("Uploaded: {}", file_name);
    tracing::info!("Loaded {} ({}), {} characters", file_name, format, text.chars().count());

    if !args.no_preview {
        println!("\nExtracted Text");
        println!("{}\n", utils::table::preview(&text, args.preview_chars));
    }

    // 5. Extract attributes line by line; the tagger is built once, before any extraction
    let model = ModelLocation::from_environment(args.tagger_model.as_deref());
    tracing::debug!("Tagger model: {:?}", model);
    let extractor = AttributeExtractor::new(extractors::build_tagger(&model)?);
    let records = extractor.extract(&text);
    let lines_scanned = extractors::attributes::split_lines(&text).count();
    tracing::info!("Extracted {} records from {} lines", records.len(), lines_scanned);

    if records.is_empty() {
        tracing::warn!("No product attributes detected in {}", file_name);
        println!("No product attributes detected.");
        return Ok(());
    }

    // 6. Render the summary table
    println!("Extracted Product Attributes");
    print!("{}", utils::table::render_table(&records));

    // 7. Export the spreadsheet and run metadata
    if args.no_export {
        tracing::debug!("Export disabled, not writing summary files");
        return Ok(());
    }

    let storage = StorageManager::new(&args.output_dir)?;
    let summary_path = storage.save_summary(&records)?;
    println!("\nSaved summary to {}", summary_path.display());

    let meta = SummaryMetadata {
        source_file: &file_name,
        format: format.label(),
        lines_scanned,
        tagger: extractor.tagger_name(),
    };
    match storage.save_summary_metadata(&records, &meta) {
        Ok(path) => tracing::info!("Saved summary metadata to: {}", path.display()),
        Err(e) => tracing::error!("Failed to save summary metadata: {}", e),
    }

    Ok(())
}
