use clap::Parser;
use plated::{build_generator, build_router, build_store, config::Config, state::AppState};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "plated", about = "Recipe PDF template service")]
struct Args {
    /// Config file (overrides PLATED_CONFIG and config/default.toml)
    #[arg(short, long, env = "PLATED_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let mut config = Config::load_from(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    tracing::info!("Configuration loaded");

    let store = build_store(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize template store: {}", e))?;
    tracing::info!("Template store: {:?} at {}", config.storage.backend, config.storage.path.display());

    let generator = build_generator(&config);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState::new(store, generator, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("plated listening on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET  /templates/:recipe_id");
    tracing::info!("  - POST /templates/:recipe_id");
    tracing::info!("  - POST /templates/default/save");
    tracing::info!("  - POST /templates/preview");
    tracing::info!("  - POST /recipes/:recipe_id/document");
    tracing::info!("  - GET  /health");

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,plated=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
