//! Command line interface.

use crate::api::{handle_render, IndexView, SelectionRequest};
use crate::charts::{DocumentExporter, ExportFormat, MapPlotter};
use crate::data::MarketContext;
use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pazar-map",
    version,
    about = "Istanbul street market map, filtered by day and market type"
)]
pub struct Cli {
    /// Path to the TOML config (default: ./pazar_map.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Market data CSV, overriding the config
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive map viewer (default)
    View,
    /// Print the distinct days and market types as JSON
    Options,
    /// Render one selection
    Render(RenderArgs),
}

#[derive(Args)]
pub struct RenderArgs {
    /// JSON request file with `days` and `types` arrays
    #[arg(long, conflicts_with_all = ["day", "market_type"])]
    pub request: Option<PathBuf>,

    /// Day to include (repeatable)
    #[arg(long)]
    pub day: Vec<String>,

    /// Market type to include (repeatable)
    #[arg(long = "type", id = "market_type")]
    pub market_type: Vec<String>,

    /// Output format; `html` prints the `{"map_html": ...}` response
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Json,
    Png,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Html => ExportFormat::Html,
            OutputFormat::Json => ExportFormat::Json,
            OutputFormat::Png => ExportFormat::Png,
        }
    }
}

impl RenderArgs {
    fn request(&self) -> anyhow::Result<SelectionRequest> {
        match &self.request {
            Some(path) => {
                let body = std::fs::read_to_string(path)
                    .with_context(|| format!("reading request {}", path.display()))?;
                serde_json::from_str(&body)
                    .with_context(|| format!("parsing request {}", path.display()))
            }
            None => Ok(SelectionRequest {
                days: self.day.clone(),
                types: self.market_type.clone(),
            }),
        }
    }
}

/// Print the index view lists.
pub fn run_options(ctx: &MarketContext) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&IndexView::from_context(ctx))?;
    println!("{json}");
    Ok(())
}

/// Handle one render request from the command line.
pub fn run_render(ctx: &MarketContext, plotter: &MapPlotter, args: &RenderArgs) -> anyhow::Result<()> {
    let request = args.request()?;

    let bytes = match args.format {
        OutputFormat::Html if args.output.is_none() => {
            let response = handle_render(ctx, plotter, &request);
            serde_json::to_vec(&response)?
        }
        format => {
            let doc = plotter.render(ctx, &request.selection());
            if let Some(path) = &args.output {
                return DocumentExporter::write(&doc, format.into(), path)
                    .with_context(|| format!("writing {}", path.display()));
            }
            DocumentExporter::encode(&doc, format.into())?
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.write_all(b"\n")?;
    Ok(())
}
