use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tokio::{fs, io::AsyncWriteExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

use reportview_core::{
    DateStyle, RenderConfig, SummaryOptions, SummarySlots, build_host_page, format_report_markdown,
    format_report_pdf, format_summary_markdown, format_summary_pdf, get_output_path, load_config,
    locate_report_container, parse_report, parse_summary, render_page, render_report,
    render_summary, validate,
};

/// CLI wrapper for DateStyle (needed for clap ValueEnum)
#[derive(Clone, ValueEnum)]
enum CliDateStyle {
    Us,
    Uk,
    De,
    Iso,
}

impl From<CliDateStyle> for DateStyle {
    fn from(cli: CliDateStyle) -> Self {
        match cli {
            CliDateStyle::Us => DateStyle::Us,
            CliDateStyle::Uk => DateStyle::Uk,
            CliDateStyle::De => DateStyle::De,
            CliDateStyle::Iso => DateStyle::Iso,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Html,
    Markdown,
    Pdf,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "md",
            OutputFormat::Pdf => "pdf",
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Render a consultation report JSON file
    Report {
        /// Report JSON (bare or wrapped in "consultation_report")
        file: PathBuf,
    },
    /// Render a video summary JSON file
    Summary {
        /// Summary payload JSON
        file: PathBuf,
    },
}

#[derive(Parser)]
#[command(name = "reportview")]
#[command(about = "Render consultation reports and video summaries into HTML pages")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(short, long, global = true, default_value = "html")]
    format: OutputFormat,

    /// Output file. Use "-" for stdout. Defaults to the input path with a new extension.
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Config file (defaults to <config dir>/reportview/config.json when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Video host used for embed URLs
    #[arg(long, global = true)]
    embed_host: Option<String>,

    /// Calendar date style for the publication date
    #[arg(long, global = true)]
    date_style: Option<CliDateStyle>,
}

fn init_tracing(config: &RenderConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn render_report_file(json: &str, format: OutputFormat, config: &RenderConfig) -> Result<Vec<u8>> {
    let report = parse_report(json)?;
    let output = match format {
        OutputFormat::Html => {
            let mut doc = build_host_page(&config.slots);
            let container = locate_report_container(&doc, &config.slots)?;
            render_report(&mut doc, container, &report);
            render_page(&doc, &report.title).into_bytes()
        }
        OutputFormat::Markdown => format_report_markdown(&report).into_bytes(),
        OutputFormat::Pdf => format_report_pdf(&report)?,
    };
    Ok(output)
}

fn render_summary_file(json: &str, format: OutputFormat, config: &RenderConfig) -> Result<Vec<u8>> {
    let payload = parse_summary(json)?;
    let output = match format {
        OutputFormat::Html => {
            let mut doc = build_host_page(&config.slots);
            let slots = SummarySlots::locate(&doc, &config.slots);
            let outcome = render_summary(&mut doc, &slots, &payload, &SummaryOptions::from(config))?;
            if !outcome.skipped.is_empty() {
                info!(skipped = ?outcome.skipped, "summary rendered with missing slots");
            }
            render_page(&doc, &payload.summary.title).into_bytes()
        }
        OutputFormat::Markdown => format_summary_markdown(&payload, config.date_style)?.into_bytes(),
        OutputFormat::Pdf => format_summary_pdf(&payload)?,
    };
    Ok(output)
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref()).await?;
    if let Some(host) = cli.embed_host {
        config.embed_host = host;
    }
    if let Some(date_style) = cli.date_style {
        config.date_style = date_style.into();
    }
    validate(&config)?;

    init_tracing(&config);

    let (kind, input) = match &cli.command {
        Command::Report { file } => ("report", file.as_path()),
        Command::Summary { file } => ("summary", file.as_path()),
    };

    eprintln!(
        "\n{}  {}\n",
        style("reportview").cyan().bold(),
        style("Report Renderer").dim()
    );

    let json_content = fs::read_to_string(input).await?;
    let rendered = match cli.command {
        Command::Report { .. } => render_report_file(&json_content, cli.format, &config)?,
        Command::Summary { .. } => render_summary_file(&json_content, cli.format, &config)?,
    };
    eprintln!(
        "{} Rendered {} {}",
        style("✓").green().bold(),
        kind,
        style(format!("({})", cli.format.extension())).dim()
    );

    let output_path = cli
        .output
        .unwrap_or_else(|| get_output_path(input, cli.format.extension()));
    if output_path == Path::new("-") {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(&rendered).await?;
        stdout.flush().await?;
        return Ok(());
    }

    fs::write(&output_path, &rendered).await?;
    eprintln!(
        "\n{} {}\n",
        style("Saved:").dim(),
        style(output_path.display()).cyan()
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
