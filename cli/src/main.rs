//! docprep CLI - OCR layout reconstruction, chunking and truncation

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docprep::{
    ChunkerOptions, ConversionOutput, Document, JsonAnalyzer, JsonFormat, MetaInput, OcrConverter,
    OcrOptions, RecursiveChunker, Source, TruncaterOptions, TruncationStrategy,
};

#[derive(Parser)]
#[command(name = "docprep")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Turn OCR analysis results into chunked, token-bounded documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert saved analysis responses into documents
    Convert {
        /// Analysis response files (JSON)
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Options file (JSON); flags below override it
        #[arg(short, long, value_name = "FILE", env = "DOCPREP_CONFIG")]
        config: Option<PathBuf>,

        /// Reading order strategy
        #[arg(long, value_enum)]
        page_layout: Option<Layout>,

        /// Row grouping threshold (fraction of page height, or inches for PDFs)
        #[arg(long)]
        threshold_y: Option<f64>,

        /// Keep tables inline in the page text instead of separate documents
        #[arg(long)]
        inline_tables: bool,

        /// Keep full source paths in document metadata
        #[arg(long)]
        full_path: bool,

        /// Also write the raw analysis results to this file
        #[arg(long, value_name = "FILE")]
        raw: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Print the reconstructed text of an analysis response
    Text {
        /// Analysis response file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Reading order strategy
        #[arg(long, value_enum, default_value = "natural")]
        page_layout: Layout,

        /// Row grouping threshold
        #[arg(long, default_value = "0.05")]
        threshold_y: f64,
    },

    /// Split documents or a plain text file into chunks
    Chunk {
        /// Documents file (.json, .jsonl) or plain text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Maximum chunk length in characters
        #[arg(long, default_value = "500")]
        size: usize,

        /// Characters shared between neighbouring chunks
        #[arg(long, default_value = "0")]
        overlap: usize,

        /// Separator, in priority order (repeatable; "sentence" splits sentences)
        #[arg(long = "separator", value_name = "SEP")]
        separators: Vec<String>,

        /// Treat separators as regular expressions
        #[arg(long)]
        regex: bool,

        /// Drop separators from chunk text
        #[arg(long)]
        drop_separator: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Truncate documents to a token budget
    Truncate {
        /// Documents file (JSON array or JSON lines)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Token budget across all documents
        #[arg(long, default_value = "512")]
        max_tokens: usize,

        /// Tokens held back for prompts
        #[arg(long, default_value = "0")]
        reserve: usize,

        /// Truncation strategy
        #[arg(long, value_enum, default_value = "end")]
        strategy: Strategy,

        /// Count tokens with a model's tokenizer.json instead of words
        #[arg(long, value_name = "FILE", env = "DOCPREP_TOKENIZER")]
        tokenizer: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Show analysis information
    Info {
        /// Analysis response file (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Layout {
    /// Reading order reported by the analysis service
    Natural,
    /// Rows of lines grouped by vertical position
    #[value(alias = "single-column")]
    SingleColumnByLine,
    /// Rows of paragraphs grouped by vertical position
    SingleColumnByParagraph,
}

impl From<Layout> for docprep::PageLayout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Natural => docprep::PageLayout::Natural,
            Layout::SingleColumnByLine => docprep::PageLayout::SingleColumnByLine,
            Layout::SingleColumnByParagraph => docprep::PageLayout::SingleColumnByParagraph,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Keep the tail of the last document
    Beginning,
    /// Keep the head of the last document
    End,
    /// Share the budget evenly
    Equal,
}

impl From<Strategy> for TruncationStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Beginning => TruncationStrategy::Beginning,
            Strategy::End => TruncationStrategy::End,
            Strategy::Equal => TruncationStrategy::Equal,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Indented JSON array
    Pretty,
    /// Compact JSON array
    Compact,
    /// One document per line
    Lines,
}

impl From<OutputFormat> for JsonFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Pretty => JsonFormat::Pretty,
            OutputFormat::Compact => JsonFormat::Compact,
            OutputFormat::Lines => JsonFormat::Lines,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            inputs,
            output,
            config,
            page_layout,
            threshold_y,
            inline_tables,
            full_path,
            raw,
            format,
        } => {
            let flags = ConvertFlags {
                page_layout,
                threshold_y,
                inline_tables,
                full_path,
            };
            cmd_convert(
                &inputs,
                output.as_deref(),
                config.as_deref(),
                flags,
                raw.as_deref(),
                format,
            )
        }
        Commands::Text {
            input,
            output,
            page_layout,
            threshold_y,
        } => cmd_text(&input, output.as_deref(), page_layout, threshold_y),
        Commands::Chunk {
            input,
            output,
            size,
            overlap,
            separators,
            regex,
            drop_separator,
            format,
        } => {
            let mut options = ChunkerOptions::new(size, overlap)
                .with_separator_regex(regex)
                .with_keep_separator(!drop_separator);
            if !separators.is_empty() {
                options = options.with_separators(separators);
            }
            cmd_chunk(&input, output.as_deref(), options, format)
        }
        Commands::Truncate {
            input,
            output,
            max_tokens,
            reserve,
            strategy,
            tokenizer,
            format,
        } => {
            let options = TruncaterOptions::new(max_tokens)
                .with_reserve(reserve)
                .with_strategy(strategy.into());
            cmd_truncate(
                &input,
                output.as_deref(),
                options,
                tokenizer.as_deref(),
                format,
            )
        }
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

struct ConvertFlags {
    page_layout: Option<Layout>,
    threshold_y: Option<f64>,
    inline_tables: bool,
    full_path: bool,
}

fn cmd_convert(
    inputs: &[PathBuf],
    output: Option<&Path>,
    config: Option<&Path>,
    flags: ConvertFlags,
    raw: Option<&Path>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = match config {
        Some(path) => OcrOptions::from_json(&fs::read_to_string(path)?)?,
        None => OcrOptions::new(),
    };
    if let Some(layout) = flags.page_layout {
        options = options.with_page_layout(layout.into());
    }
    if let Some(threshold_y) = flags.threshold_y {
        options = options.with_threshold_y(threshold_y);
    }
    if flags.inline_tables {
        options = options.with_tables_separately(false);
    }
    if flags.full_path {
        options = options.with_full_path(true);
    }

    let converter = OcrConverter::new(Arc::new(JsonAnalyzer::new()), options)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut converted = ConversionOutput::new();
    for input in inputs {
        pb.set_message(input.display().to_string());
        let source = Source::from(input.as_path());
        converted.extend(converter.run(&[source], MetaInput::None)?);
        pb.inc(1);
    }
    pb.finish_and_clear();

    if let Some(path) = raw {
        fs::write(path, serde_json::to_string_pretty(&converted.raw_analysis)?)?;
    }

    write_documents(&converted.documents, output, format)?;

    if output.is_some() {
        let skipped = inputs.len() - converted.raw_analysis.len();
        println!(
            "{} {} documents from {} files",
            "Converted".green().bold(),
            converted.documents.len(),
            converted.raw_analysis.len()
        );
        if skipped > 0 {
            println!("{} {} unreadable files", "Skipped".yellow(), skipped);
        }
    }

    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    page_layout: Layout,
    threshold_y: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = docprep::LayoutOptions::new()
        .with_page_layout(page_layout.into())
        .with_threshold_y(threshold_y);
    let text = docprep::extract_text(input, &options)?;

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", text);
    }

    Ok(())
}

fn cmd_chunk(
    input: &Path,
    output: Option<&Path>,
    options: ChunkerOptions,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let documents = if is_json(input) {
        read_documents(input)?
    } else {
        let mut meta = docprep::Meta::new();
        meta.insert("file_path".into(), input.display().to_string().into());
        vec![Document::with_content_and_meta(fs::read_to_string(input)?, meta)]
    };
    let chunker = RecursiveChunker::new(options)?;
    let chunks = chunker.run(&documents);

    write_documents(&chunks, output, format)?;
    if output.is_some() {
        println!(
            "{} {} documents into {} chunks",
            "Split".green().bold(),
            documents.len(),
            chunks.len()
        );
    }

    Ok(())
}

fn cmd_truncate(
    input: &Path,
    output: Option<&Path>,
    options: TruncaterOptions,
    tokenizer: Option<&Path>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let documents = read_documents(input)?;
    let truncated = match tokenizer {
        Some(path) => {
            log::info!("Counting tokens with {}", path.display());
            docprep::truncate_documents_with_tokenizer(&documents, path, options)?
        }
        None => docprep::truncate_documents(&documents, options)?,
    };

    write_documents(&truncated, output, format)?;
    if output.is_some() {
        println!(
            "{} {} of {} documents",
            "Kept".green().bold(),
            truncated.len(),
            documents.len()
        );
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let result = docprep::load_analysis(input)?;

    println!("{}", "Analysis Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref model_id) = result.model_id {
        println!("{}: {}", "Model".bold(), model_id);
    }
    println!("{}: {}", "Pages".bold(), result.pages.len());

    for page in &result.pages {
        let unit = page.unit.as_deref().unwrap_or("-");
        println!(
            "  {} page {}: {} lines ({})",
            "├─".dimmed(),
            page.page_number,
            page.lines.len(),
            unit
        );
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let words = result.content.split_whitespace().count();
    let chars = result.content.chars().count();

    println!("{}: {}", "Words".bold(), words);
    println!("{}: {}", "Characters".bold(), chars);
    println!("{}: {}", "Paragraphs".bold(), result.paragraphs.len());
    println!("{}: {}", "Tables".bold(), result.tables.len());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docprep".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("OCR layout reconstruction, chunking and truncation");
    println!();
    println!("License: MIT");
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("jsonl"))
}

fn read_documents(path: &Path) -> Result<Vec<Document>, Box<dyn std::error::Error>> {
    let input = fs::read_to_string(path)?;
    let documents = docprep::render::from_json(&input)?;
    log::debug!("Read {} documents from {}", documents.len(), path.display());
    Ok(documents)
}

fn write_documents(
    documents: &[Document],
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = docprep::to_json(documents, format.into())?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}
