//! Studio - command line front end for the media studio
//!
//! Uploads a file to the storage service, renders it under one or more
//! presets and saves each render into the export directory. Also lists
//! presets and the video catalog.
//!
//! Environment variables: see `StudioConfig` (`STUDIO_*`).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use media_studio::{
    derive_filename, presets, CatalogClient, DirectorySink, Event, ExportState, Exporter,
    HttpAssetStore, MediaFile, PreviewState, RenderFetcher, Studio, StudioConfig, StudioDriver,
    UploadRequest, UploadState,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "studio", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the available presets.
    Presets,
    /// Upload a file and export it under the given presets.
    Export(ExportArgs),
    /// List the video catalog, newest first.
    Videos,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// File to upload.
    #[arg(long)]
    file: PathBuf,

    /// Upload as a video (sends title and description).
    #[arg(long, default_value_t = false)]
    video: bool,

    /// Video title.
    #[arg(long, default_value = "")]
    title: String,

    /// Video description.
    #[arg(long, default_value = "")]
    description: String,

    /// Preset name; repeat for several. Defaults to the first preset.
    #[arg(long = "preset")]
    presets: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studio=info,media_studio=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Presets => cmd_presets(),
        Command::Export(args) => cmd_export(args).await,
        Command::Videos => cmd_videos().await,
    }
}

fn cmd_presets() -> anyhow::Result<()> {
    for preset in presets::all() {
        println!(
            "{:<28} {:>5}x{:<5} {}",
            preset.name, preset.width, preset.height, preset.aspect_ratio
        );
    }
    Ok(())
}

async fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let config = StudioConfig::from_env()?;
    let names = if args.presets.is_empty() {
        vec![presets::default_preset().name.to_string()]
    } else {
        args.presets
    };
    for name in &names {
        presets::get(name)?;
    }

    let file = MediaFile::from_path(&args.file)
        .await
        .with_context(|| format!("read '{}'", args.file.display()))?;
    let request = if args.video {
        UploadRequest::video(file, args.title, args.description)
    } else {
        UploadRequest::image(file)
    };

    let store = Arc::new(HttpAssetStore::new(
        config.http_client()?,
        config.api_base_url.clone(),
    ));
    let fetcher: Arc<dyn RenderFetcher> = store.clone();
    let exporter = Exporter::new(
        Arc::clone(&fetcher),
        Arc::new(DirectorySink::new(config.export_dir.clone())),
    );
    let mut driver = StudioDriver::new(Studio::from_config(&config), store, fetcher, exporter);

    export_all(&mut driver, request, &names).await?;
    Ok(())
}

/// Upload `request`, then export it under each of `names` in order.
///
/// The first name is selected before the upload so the initial render is
/// one that was asked for. Saved paths are printed as they land and returned.
async fn export_all(
    driver: &mut StudioDriver,
    request: UploadRequest,
    names: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    if let Some(first) = names.first() {
        driver.dispatch(Event::PresetSelected(first.clone()));
    }
    driver.dispatch(Event::UploadRequested(Some(request)));
    driver.settle().await;
    match driver.studio().upload().state() {
        UploadState::Uploaded(asset_id) => info!(asset_id = %asset_id, "Upload complete"),
        UploadState::Failed(err) => bail!("upload failed: {err}"),
        other => bail!("upload ended in state {}", other.as_str()),
    }
    // A failed first render is retried when its preset is selected below
    for notice in driver.drain_notices() {
        warn!("preview: {notice}");
    }

    let mut saved_paths = Vec::new();
    let mut failures = 0;
    for name in names {
        driver.dispatch(Event::PresetSelected(name.clone()));
        driver.settle().await;
        if let PreviewState::Rendered(request) = driver.studio().preview().state() {
            eprintln!("preview {}", request.url);
        }

        driver.dispatch(Event::ExportRequested);
        driver.settle().await;
        for notice in driver.drain_notices() {
            eprintln!("{name}: {notice}");
            failures += 1;
        }
        match driver.studio().export_state() {
            ExportState::Saved(saved) if saved.filename == derive_filename(name) => {
                println!("{}", saved.path.display());
                saved_paths.push(saved.path.clone());
            }
            _ => {}
        }
    }

    if failures > 0 {
        bail!("{failures} export(s) failed");
    }
    Ok(saved_paths)
}

async fn cmd_videos() -> anyhow::Result<()> {
    let config = StudioConfig::from_env()?;
    let catalog = CatalogClient::new(config.http_client()?, config.api_base_url.clone());
    let videos = catalog.list_videos().await?;
    println!("{}", serde_json::to_string_pretty(&videos)?);
    Ok(())
}
