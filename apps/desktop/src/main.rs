use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    ControllerError, HttpDownloadSink, HttpProcessingBackend, ParameterKind, SelectedFile,
    UploadController,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod view;

use config::{load_settings, DEFAULT_CONFIG_FILE};
use view::TerminalView;

/// Sends an image to the cartoonizer server and saves the result.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    image: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long)]
    intensity: Option<i64>,
    #[arg(long)]
    edge_thickness: Option<i64>,
    #[arg(long)]
    color_levels: Option<i64>,
    #[arg(long)]
    output_dir: Option<PathBuf>,
    #[arg(long)]
    no_download: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    if let Some(server_url) = args.server_url.clone() {
        settings.server_url = server_url;
    }
    if let Some(output_dir) = args.output_dir.clone() {
        settings.output_dir = output_dir;
    }
    info!(server_url = %settings.server_url, "cartoonize: starting session");

    let backend = HttpProcessingBackend::new(&settings.server_url, settings.request_timeout())
        .with_context(|| format!("invalid server url {}", settings.server_url))?;
    let view = Arc::new(TerminalView::default());
    let mut controller = UploadController::new(
        settings.controller_config(),
        Arc::new(backend),
        Arc::new(HttpDownloadSink::new(&settings.output_dir)),
        view.clone(),
    );

    for (kind, value) in [
        (ParameterKind::Intensity, args.intensity),
        (ParameterKind::EdgeThickness, args.edge_thickness),
        (ParameterKind::ColorLevels, args.color_levels),
    ] {
        if let Some(value) = value {
            let applied = controller.set_parameter(kind, value);
            if applied != value {
                println!("{} clamped to {applied}", kind.label());
            }
        }
    }

    let file = SelectedFile::from_path(&args.image)
        .await
        .with_context(|| format!("failed to open {}", args.image.display()))?;

    let outcome = run_session(&mut controller, &file, !args.no_download).await;
    if let Some(status) = view.visible_status() {
        info!(level = status.level.style(), message = %status.message, "cartoonize: final status");
    }
    outcome.context("cartoonize session failed")
}

async fn run_session(
    controller: &mut UploadController,
    file: &SelectedFile,
    download: bool,
) -> Result<(), ControllerError> {
    controller.load_image(file).await?;
    let result_id = controller.submit_for_processing().await?;
    println!("result id: {result_id}");
    if download {
        controller.download_result().await?;
    }
    Ok(())
}
