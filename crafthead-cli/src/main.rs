use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crafthead_common::models::StructuredSkin;
use crafthead_common::traits::BlobStore;
use crafthead_core::cosmetics::{dependencies, CosmeticCatalog, CosmeticResolver};
use crafthead_core::profile::PlayerDbProvider;
use crafthead_core::render::orchestrator::Collaborators;
use crafthead_core::render::FlatSkinRenderer;
use crafthead_core::route::parse_request_path;
use crafthead_core::storage::{FsBlobStore, MemoryBlobStore};
use crafthead_core::tasks::BackgroundTasks;
use crafthead_core::{CraftheadConfig, DefaultHttpClient, RenderOrchestrator};

#[derive(Parser, Debug, Clone)]
#[command(name = "crafthead")]
#[command(author, version, about = "Crafthead - avatar and profile renderer for Minecraft and Hytale players")]
struct Args {
    /// Directory holding `Cosmetics/CharacterCreator/*.json` (overrides CRAFTHEAD_CATALOG_DIR)
    #[arg(long, global = true)]
    catalog_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Run one request path, e.g. `/hytale/avatar/Someone/64` or `/armor/body/Notch.png`
    Render {
        path: String,

        /// `slim` or `default`
        #[arg(long)]
        model: Option<String>,

        /// Output file; stdout when omitted
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Blob store root for assets and cached renders; in-memory when omitted
        #[arg(long)]
        blob_dir: Option<PathBuf>,
    },
    /// Print the resolved cosmetics and asset list for a structured skin document
    Resolve {
        skin_file: PathBuf,
    },
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("crafthead=info".parse()?);
    let sub = fmt().with_env_filter(filter).with_writer(std::io::stderr).finish();
    tracing::subscriber::set_global_default(sub).context("Failed to set global subscriber")?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let args = Args::parse();

    let mut config = CraftheadConfig::from_env();
    if let Some(dir) = args.catalog_dir.clone() {
        config.catalog_dir = Some(dir);
    }

    match args.command {
        Command::Render { path, model, out, blob_dir } => {
            run_render(config, &path, model.as_deref(), out, blob_dir).await
        }
        Command::Resolve { skin_file } => run_resolve(&config, &skin_file).await,
    }
}

fn load_catalog(config: &CraftheadConfig) -> anyhow::Result<Arc<CosmeticCatalog>> {
    let catalog = match &config.catalog_dir {
        Some(dir) => CosmeticCatalog::load_from_dir(dir)
            .with_context(|| format!("loading catalog from {}", dir.display()))?,
        None => {
            warn!("No catalog directory configured; structured skins will resolve to nothing");
            CosmeticCatalog::empty()
        }
    };
    Ok(Arc::new(catalog))
}

async fn run_render(
    config: CraftheadConfig,
    path: &str,
    model: Option<&str>,
    out: Option<PathBuf>,
    blob_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let descriptor = parse_request_path(path, model)?;
    let catalog = load_catalog(&config)?;

    let http = Arc::new(DefaultHttpClient::new(&config.user_agent, config.http_timeout)?);
    let provider = Arc::new(PlayerDbProvider::new(config.profile_api_base.clone(), http.clone()));

    let blobs: Arc<dyn BlobStore> = match blob_dir {
        Some(dir) => Arc::new(FsBlobStore::new(dir)),
        None => Arc::new(MemoryBlobStore::new()),
    };

    warn!("No 3D model renderer linked; structured skins render as text avatars");
    let tasks = BackgroundTasks::new();
    let orchestrator = RenderOrchestrator::new(
        &config,
        catalog,
        Collaborators {
            profile_provider: provider,
            http,
            assets: blobs.clone(),
            render_store: blobs,
            skin_renderer: Arc::new(FlatSkinRenderer::new()),
            model_renderer: None,
        },
        tasks.clone(),
    );

    let resp = orchestrator.respond(&descriptor).await;
    let status = resp.status;
    info!(
        "status={} type={} fallback={} cache_hit={} provenance={:?}",
        status,
        resp.content_type(),
        resp.fallback,
        resp.cache_hit,
        resp.provenance
    );

    let bytes = resp.into_bytes()?;
    match out {
        Some(file) => tokio::fs::write(&file, &bytes)
            .await
            .with_context(|| format!("writing {}", file.display()))?,
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&bytes).await?;
            stdout.flush().await?;
        }
    }

    // Let detached cache stores finish before the runtime goes away.
    tasks.drain().await;

    if status >= 400 {
        anyhow::bail!("request failed with status {status}");
    }
    Ok(())
}

async fn run_resolve(config: &CraftheadConfig, skin_file: &PathBuf) -> anyhow::Result<()> {
    let catalog = load_catalog(config)?;
    let raw = tokio::fs::read(skin_file)
        .await
        .with_context(|| format!("reading {}", skin_file.display()))?;
    let skin: StructuredSkin = serde_json::from_slice(&raw)?;

    let resolved = CosmeticResolver::new(catalog).resolve(&skin);
    let doc = serde_json::json!({
        "resolved": resolved,
        "dependencies": dependencies(&resolved),
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
