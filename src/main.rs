//! Pazar Map - Istanbul Street Market Map
//!
//! Loads the market table once, then renders marker layers filtered by day
//! and market type, either in the desktop viewer or from the command line.

mod api;
mod charts;
mod cli;
mod config;
mod data;
mod gui;

use anyhow::Context;
use charts::MapPlotter;
use clap::Parser;
use cli::{Cli, Commands};
use config::AppConfig;
use data::MarketLoader;
use eframe::egui;
use gui::PazarMapApp;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.data {
        config.data.path = path;
    }
    init_tracing(&config.log_level);

    // No request is served unless the table loads
    let loader = MarketLoader::new(config.data.columns.clone());
    let context = match loader.load(&config.data.path) {
        Ok(context) => Arc::new(context),
        Err(e) => {
            tracing::error!(path = %config.data.path.display(), error = %e, "market data load failed");
            return Err(e)
                .with_context(|| format!("loading {}", config.data.path.display()));
        }
    };
    let plotter = MapPlotter::new(config.map.clone());

    match cli.command.unwrap_or(Commands::View) {
        Commands::View => {
            let options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default()
                    .with_inner_size([1400.0, 850.0])
                    .with_min_inner_size([1000.0, 650.0])
                    .with_title("Istanbul Pazar Map"),
                ..Default::default()
            };

            let data_path = config.data.path.clone();
            eframe::run_native(
                "Istanbul Pazar Map",
                options,
                Box::new(move |cc| {
                    Ok(Box::new(PazarMapApp::new(cc, context, plotter, &data_path)))
                }),
            )
            .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
        }
        Commands::Options => cli::run_options(&context),
        Commands::Render(args) => cli::run_render(&context, &plotter, &args),
    }
}
