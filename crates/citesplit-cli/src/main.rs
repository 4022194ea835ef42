use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use citesplit_parsing::{FootnoteSegmenter, SegmentedFootnote};
use citesplit_reporting::{CitationStats, ExportFormat};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config_file;
mod input;
mod output;

use config_file::ConfigFile;
use output::ColorMode;

/// Citation Splitter - Segment legal footnotes into typed citations
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Segment every footnote in a file (or stdin)
    Split {
        /// Footnotes separated by blank lines; reads stdin when omitted or `-`
        file_path: Option<PathBuf>,

        /// Output format: text, json, csv, or markdown
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Write results to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Path to a TOML config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Show whether each footnote was read as traditional or narrative
        #[arg(long)]
        show_mode: bool,
    },

    /// Segment a single footnote given on the command line
    Classify {
        /// Footnote text
        text: String,

        /// Footnote number to report
        #[arg(long, default_value_t = 1)]
        footnote_num: usize,

        /// Output format: text, json, csv, or markdown
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Path to a TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the effective signal and abbreviation tables
    Signals {
        /// Path to a TOML config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Split {
            file_path,
            format,
            output,
            no_color,
            config,
            show_mode,
        } => split(file_path, format, output, no_color, config, show_mode),
        Command::Classify {
            text,
            footnote_num,
            format,
            no_color,
            config,
        } => classify(&text, footnote_num, format, no_color, config),
        Command::Signals { config, no_color } => signals(config, no_color),
    }
}

/// Resolve configuration: `--config` > `./.citesplit.toml` > platform config.
fn load_settings(config: Option<&Path>) -> anyhow::Result<ConfigFile> {
    let cascaded = config_file::load_config();
    match config {
        Some(path) => {
            let explicit = config_file::read_from_path(path).map_err(anyhow::Error::msg)?;
            Ok(config_file::merge(cascaded, explicit))
        }
        None => Ok(cascaded),
    }
}

fn build_segmenter(settings: &ConfigFile) -> anyhow::Result<FootnoteSegmenter> {
    let config = settings
        .to_segmenter_config()
        .context("Invalid segmentation config")?;
    Ok(FootnoteSegmenter::with_config(config))
}

/// CLI flag > output file extension > config file > text.
fn resolve_format(
    format: Option<ExportFormat>,
    output: Option<&Path>,
    settings: &ConfigFile,
) -> anyhow::Result<ExportFormat> {
    if let Some(f) = format {
        return Ok(f);
    }
    let from_output = output
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .and_then(ExportFormat::from_extension);
    match (from_output, settings.output_format()) {
        (Some(f), _) => Ok(f),
        (None, Some(name)) => name.parse::<ExportFormat>().map_err(anyhow::Error::msg),
        (None, None) => Ok(ExportFormat::Text),
    }
}

fn read_input(file_path: Option<&Path>) -> anyhow::Result<String> {
    match file_path {
        Some(path) if path != Path::new("-") => {
            if !path.exists() {
                anyhow::bail!("File not found: {}", path.display());
            }
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn split(
    file_path: Option<PathBuf>,
    format: Option<ExportFormat>,
    output: Option<PathBuf>,
    no_color: bool,
    config: Option<PathBuf>,
    show_mode: bool,
) -> anyhow::Result<()> {
    let settings = load_settings(config.as_deref())?;
    let segmenter = build_segmenter(&settings)?;
    let format = resolve_format(format, output.as_deref(), &settings)?;

    let text = read_input(file_path.as_deref())?;
    let raw = input::parse_footnotes(&text);
    tracing::debug!(footnotes = raw.len(), "parsed input");

    let footnotes: Vec<SegmentedFootnote> = raw
        .iter()
        .map(|f| segmenter.segment(f.number, Some(&f.text)))
        .collect();

    let use_color = !no_color && output.is_none() && settings.color().unwrap_or(true);
    write_results(&footnotes, format, output.as_deref(), show_mode, use_color)
}

fn classify(
    text: &str,
    footnote_num: usize,
    format: Option<ExportFormat>,
    no_color: bool,
    config: Option<PathBuf>,
) -> anyhow::Result<()> {
    let settings = load_settings(config.as_deref())?;
    let segmenter = build_segmenter(&settings)?;
    let format = resolve_format(format, None, &settings)?;

    let footnote = segmenter.segment(footnote_num, Some(text));
    let use_color = !no_color && settings.color().unwrap_or(true);
    write_results(&[footnote], format, None, true, use_color)
}

fn signals(config: Option<PathBuf>, no_color: bool) -> anyhow::Result<()> {
    let settings = load_settings(config.as_deref())?;
    let segmenter = build_segmenter(&settings)?;
    let use_color = !no_color && settings.color().unwrap_or(true);

    let mut writer = std::io::stdout();
    output::print_tables(&mut writer, &segmenter, ColorMode(use_color))?;
    Ok(())
}

fn write_results(
    footnotes: &[SegmentedFootnote],
    format: ExportFormat,
    output: Option<&Path>,
    show_mode: bool,
    use_color: bool,
) -> anyhow::Result<()> {
    if let Some(path) = output {
        citesplit_reporting::export_results(footnotes, format, path)
            .map_err(anyhow::Error::msg)?;
        eprintln!("Wrote {} results to {}", format.label(), path.display());
        return Ok(());
    }

    let mut writer: Box<dyn Write> = Box::new(std::io::stdout());
    match format {
        ExportFormat::Text => {
            let color = ColorMode(use_color);
            for footnote in footnotes {
                output::print_footnote(&mut writer, footnote, show_mode, color)?;
            }
            let stats = CitationStats::from_footnotes(footnotes);
            output::print_summary(&mut writer, footnotes.len(), &stats, color)?;
        }
        other => {
            let rendered =
                citesplit_reporting::render(footnotes, other).map_err(anyhow::Error::msg)?;
            writer.write_all(rendered.as_bytes())?;
        }
    }
    writer.flush()?;
    Ok(())
}
