//! unscan CLI - page dump conversion tool

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unscan::parser::PageInfo;
use unscan::{
    load_dump, Conversion, ConvertOptions, DirectoryStore, DumpDocument, JsonFormat, MemoryStore,
    PageSelection, PdfSource, Unscan,
};

#[derive(Parser)]
#[command(name = "unscan")]
#[command(version)]
#[command(about = "Convert PDF page dumps to text and JSON with adaptive OCR", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a dump to all formats (text, JSON, images)
    Convert {
        /// Input dump file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Public base URL for uploaded images
        #[arg(long, env = "UNSCAN_PUBLIC_BASE")]
        public_base: Option<String>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Convert a dump to text
    Text {
        /// Input dump file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "0-9", "0,2,4")
        #[arg(long)]
        pages: Option<String>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Convert a dump to JSON
    Json {
        /// Input dump file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Show document information
    Info {
        /// Input dump file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Options shared by the converting subcommands.
#[derive(Args, Debug, Clone)]
struct PipelineArgs {
    /// Recognition language
    #[arg(long, env = "UNSCAN_OCR_LANG", default_value = "eng")]
    lang: String,

    /// Spelling dictionary language (requires --dict-dir)
    #[arg(long, env = "UNSCAN_SPELL_LANG", requires = "dict_dir")]
    spell_lang: Option<String>,

    /// Directory of `{lang}.txt` word lists
    #[arg(long, env = "UNSCAN_DICT_DIR", value_name = "DIR")]
    dict_dir: Option<PathBuf>,

    /// Convert at most this many pages
    #[arg(long, env = "UNSCAN_MAX_PAGES")]
    max_pages: Option<usize>,

    /// Page workers (1 = sequential)
    #[arg(short = 'j', long, env = "UNSCAN_PARALLEL", default_value_t = 2)]
    parallel: usize,

    /// Never recognize pages at or below this index
    #[arg(long, env = "UNSCAN_MIN_OCR_PAGE", default_value_t = 2)]
    min_ocr_page: usize,

    /// Recognize every page
    #[arg(long, env = "UNSCAN_OCR_ALL_PAGES")]
    ocr_all_pages: bool,

    /// Keep native text on every page
    #[arg(long, env = "UNSCAN_DISABLE_OCR", conflicts_with = "ocr_all_pages")]
    disable_ocr: bool,
}

impl PipelineArgs {
    fn options(&self) -> ConvertOptions {
        let mut options = ConvertOptions::new()
            .with_ocr_language(self.lang.clone())
            .with_parallel(self.parallel)
            .with_min_ocr_page(self.min_ocr_page)
            .with_ocr_all_pages(self.ocr_all_pages);
        if let Some(max_pages) = self.max_pages {
            options = options.with_max_pages(max_pages);
        }
        if self.disable_ocr {
            options = options.without_ocr();
        }
        options
    }

    fn builder(&self) -> Unscan {
        let mut unscan = Unscan::new().with_options(self.options());
        if let (Some(dir), Some(lang)) = (&self.dict_dir, &self.spell_lang) {
            unscan = unscan.with_word_lists(dir.clone(), lang.clone());
        }
        unscan
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            public_base,
            pipeline,
        } => cmd_convert(&input, output.as_deref(), public_base, &pipeline),
        Commands::Text {
            input,
            output,
            pages,
            pipeline,
        } => cmd_text(&input, output.as_deref(), pages.as_deref(), &pipeline),
        Commands::Json {
            input,
            output,
            compact,
            pipeline,
        } => cmd_json(&input, output.as_deref(), compact, &pipeline),
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

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_stats(conversion: &Conversion) {
    let stats = conversion.ocr_stats;
    let images: usize = conversion.pages.iter().map(|p| p.image_count()).sum();
    eprintln!(
        "{} {} pages ({} images), OCR attempted {} ({} succeeded, {} failed)",
        "Converted".green(),
        conversion.page_count(),
        images,
        stats.pages_ocr_attempted,
        stats.ocr_success,
        stats.ocr_failed
    );
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    public_base: Option<String>,
    pipeline: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });
    fs::create_dir_all(&output_dir)?;

    let mut store = DirectoryStore::new(output_dir.join("images"));
    if let Some(base) = public_base {
        store = store.with_public_base(base);
    }

    let pb = spinner("Converting pages...");
    let result = pipeline.builder().convert_dump(input, Arc::new(store))?;
    pb.finish_and_clear();

    fs::write(output_dir.join("extract.txt"), result.to_text()?)?;
    fs::write(
        output_dir.join("content.json"),
        result.to_json(JsonFormat::Pretty)?,
    )?;
    print_stats(result.conversion());

    println!("\n{}", "Output files:".green().bold());
    println!("  {} extract.txt", "├─".dimmed());
    println!("  {} content.json", "├─".dimmed());
    println!("  {} images/", "└─".dimmed());

    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    pages: Option<&str>,
    pipeline: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let page_selection = if let Some(p) = pages {
        PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?
    } else {
        PageSelection::All
    };

    let result = pipeline
        .builder()
        .with_pages(page_selection)
        .convert_dump(input, Arc::new(MemoryStore::new()))?;
    print_stats(result.conversion());

    write_or_print(output, &result.to_text()?)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    pipeline: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = pipeline
        .builder()
        .convert_dump(input, Arc::new(MemoryStore::new()))?;
    print_stats(result.conversion());

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    write_or_print(output, &result.to_json(format)?)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let dump: DumpDocument = load_dump(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Name".bold(), dump.name());
    println!("{}: {}", "Pages".bold(), dump.page_count());

    let rotated = dump
        .pages
        .iter()
        .filter(|p| p.info().rotation.is_rotated())
        .count();
    println!("{}: {}", "Rotated pages".bold(), rotated);

    let recorded = dump.pages.iter().filter(|p| p.ocr.is_some()).count();
    println!("{}: {}", "Recorded OCR pages".bold(), recorded);

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = dump.naive_text()?;
    let words = text.split_whitespace().count();
    let images: usize = dump
        .pages
        .iter()
        .map(|p| p.blocks.iter().filter(|b| b.is_image()).count())
        .sum();
    let links: usize = dump.pages.iter().map(|p| p.links.len()).sum();
    let empty_pages = dump
        .pages
        .iter()
        .filter(|p| p.blocks.iter().all(|b| b.plain_text().trim().is_empty()))
        .count();

    println!("{}: {}", "Words".bold(), words);
    println!("{}: {}", "Characters".bold(), text.len());
    println!("{}: {}", "Images".bold(), images);
    println!("{}: {}", "Links".bold(), links);
    println!("{}: {}", "Pages without text".bold(), empty_pages);
    println!("{}: {}", "Bookmarks".bold(), dump.outline.total_items());

    if let Some(largest) = largest_page(&dump) {
        println!(
            "{}: {:.0} x {:.0} pt",
            "Largest page".bold(),
            largest.width,
            largest.height
        );
    }

    Ok(())
}

fn largest_page(dump: &DumpDocument) -> Option<PageInfo> {
    dump.pages
        .iter()
        .map(|p| p.info())
        .max_by(|a, b| (a.width * a.height).total_cmp(&(b.width * b.height)))
}

fn cmd_version() {
    println!("{} {}", "unscan".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF page conversion with adaptive OCR");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use unscan::parser::{DumpPage, RawBlock, RawLine, RawSpan};
    use unscan::BBox;

    #[test]
    fn test_pipeline_args_defaults() {
        let cli = Cli::try_parse_from(["unscan", "json", "doc.json"]).unwrap();
        let Commands::Json { pipeline, .. } = cli.command else {
            panic!("expected json command");
        };
        let options = pipeline.options();
        assert_eq!(options.ocr_language, "eng");
        assert_eq!(options.parallel, 2);
        assert_eq!(options.min_ocr_page, 2);
        assert!(!options.disable_ocr);
    }

    #[test]
    fn test_pipeline_args_flags() {
        let cli = Cli::try_parse_from([
            "unscan",
            "text",
            "doc.json",
            "-j",
            "8",
            "--max-pages",
            "5",
            "--disable-ocr",
        ])
        .unwrap();
        let Commands::Text { pipeline, .. } = cli.command else {
            panic!("expected text command");
        };
        let options = pipeline.options();
        assert_eq!(options.parallel, 8);
        assert_eq!(options.max_pages, Some(5));
        assert!(options.disable_ocr);
    }

    #[test]
    fn test_conflicting_ocr_flags() {
        let parsed = Cli::try_parse_from([
            "unscan",
            "json",
            "doc.json",
            "--ocr-all-pages",
            "--disable-ocr",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_text_command_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let mut dump = DumpDocument::new("doc.pdf");
        let bbox = BBox::new(10.0, 10.0, 100.0, 20.0);
        dump.add_page(DumpPage::new(PageInfo::default()).with_blocks(vec![RawBlock::Text {
            bbox,
            lines: vec![RawLine {
                bbox,
                spans: vec![RawSpan {
                    text: "Hello".to_string(),
                    bbox,
                    font: "Helvetica".to_string(),
                    flags: 0,
                    color: 0,
                    ascender: 0.0,
                    descender: 0.0,
                }],
            }],
        }]));
        dump.save(&path).unwrap();

        let out = dir.path().join("out.txt");
        let args = ["unscan", "text", path.to_str().unwrap(), "-j", "1"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Commands::Text { pipeline, .. } = cli.command else {
            panic!("expected text command");
        };
        cmd_text(&path, Some(&out), None, &pipeline).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "Hello");
    }
}
