//! pdfscope CLI - page inspection and table extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use pdfscope::render::to_json;
use pdfscope::{BoundingBox, Inspector, JsonFormat, OverlapPolicy, TableSelection};

#[derive(Parser)]
#[command(name = "pdfscope")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Inspect PDF pages and extract tables as Markdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the text, images and tables on a page as JSON
    Analyze {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1, env = "PDFSCOPE_PAGE", value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Leave out text that lies inside detected tables
        #[arg(long)]
        exclude_table_text: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Extract the table inside a region as Markdown
    Table {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Region as x0,y0,x1,y1 in points from the top-left corner
        #[arg(long, value_name = "X0,Y0,X1,Y1", allow_hyphen_values = true)]
        bbox: BoundingBox,

        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1, env = "PDFSCOPE_PAGE", value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Which table to keep when the region holds several: first, largest or single
        #[arg(long, value_name = "MODE", default_value = "first")]
        select: TableSelection,

        /// Escape '|' inside cells
        #[arg(long)]
        escape_pipes: bool,

        /// Print the full result as JSON instead of Markdown
        #[arg(long)]
        json: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            input,
            page,
            compact,
            exclude_table_text,
            output,
        } => cmd_analyze(&input, page, compact, exclude_table_text, output.as_deref()),
        Commands::Table {
            input,
            bbox,
            page,
            select,
            escape_pipes,
            json,
            output,
        } => cmd_table(
            &input,
            bbox,
            page,
            select,
            escape_pipes,
            json,
            output.as_deref(),
        ),
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

/// Convert a 1-based page number from the command line to a page index.
fn page_index(page: u32) -> usize {
    page.saturating_sub(1) as usize
}

fn cmd_analyze(
    input: &Path,
    page: u32,
    compact: bool,
    exclude_table_text: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let policy = if exclude_table_text {
        OverlapPolicy::ExcludeTableText
    } else {
        OverlapPolicy::KeepAll
    };

    let inspection = Inspector::new()
        .with_overlap_policy(policy)
        .open_file(input)?;
    let result = inspection.analyze_page(page_index(page))?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    write_output(&to_json(&result, format)?, output)
}

fn cmd_table(
    input: &Path,
    bbox: BoundingBox,
    page: u32,
    select: TableSelection,
    escape_pipes: bool,
    json: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let inspection = Inspector::new()
        .with_table_selection(select)
        .with_escape_pipes(escape_pipes)
        .open_file(input)?;
    let result = inspection.extract_table(page_index(page), &bbox)?;

    if result.candidate_count > 1 {
        log::info!(
            "{} tables found in region, kept one ({:?})",
            result.candidate_count,
            select
        );
    }

    if json {
        write_output(&to_json(&result, JsonFormat::Pretty)?, output)
    } else {
        write_output(&result.markdown, output)
    }
}

fn write_output(content: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", content);
        if !content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let info = Inspector::new().open_file(input)?.info()?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), info.version);
    println!("{}: {}", "Pages".bold(), info.page_count);

    println!();
    println!("{}", "Page Sizes".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for page in &info.pages {
        println!(
            "{} {}: {:.1} x {:.1} pt",
            "Page".bold(),
            page.index + 1,
            page.width,
            page.height
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfscope".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF page inspection and table extraction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/pdfscope".dimmed());
    println!("License: MIT");
}
