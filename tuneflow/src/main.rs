mod api;

use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tunecatalog::CatalogClient;
use tuneliked::LikedClient;
use tuneoffline::OfflineCache;
use tunequeue::PlayerStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== PHASE 1 : Infrastructure ==========

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let config = tuneconfig::get_config();
    info!("🎵 TuneFlow v{}", env!("CARGO_PKG_VERSION"));

    // ========== PHASE 2 : Caches et état du lecteur ==========

    info!("💾 Opening offline audio cache...");
    let offline_dir = config.get_offline_cache_dir()?;
    let offline = Arc::new(OfflineCache::new(&offline_dir)?);
    info!(
        "✅ Offline cache ready: {} track(s), {} MB",
        offline.count().await?,
        offline.size_in_mb().await?
    );

    let snapshot_path = config.get_player_snapshot_path();
    let store = Arc::new(PlayerStore::restore(&snapshot_path, config.get_default_volume()).await);
    info!(
        "▶️  Player state restored: {} track(s) in queue",
        store.state().await.len()
    );

    // ========== PHASE 3 : Clients distants ==========

    let catalog = Arc::new(CatalogClient::with_cache_ttl(
        config.get_catalog_base_url(),
        std::time::Duration::from_secs(config.get_catalog_cache_ttl_secs()),
    )?);
    info!("📡 Catalog client ready: {}", catalog.base_url());

    let liked = match config.get_liked_base_url() {
        Some(url) => match LikedClient::new(url) {
            Ok(client) => {
                info!("❤️  Liked-songs client ready: {}", client.base_url());
                Some(Arc::new(client))
            }
            Err(e) => {
                warn!("⚠️ Failed to create liked-songs client: {}", e);
                None
            }
        },
        None => {
            info!("❤️  Liked-songs API not configured, likes disabled");
            None
        }
    };

    // ========== PHASE 4 : Serveur HTTP ==========

    let state = api::AppState {
        offline,
        store: Arc::clone(&store),
        catalog,
        liked,
        http: reqwest::Client::new(),
    };
    let router = api::create_router(state);

    let port = config.get_http_port();
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("✅ HTTP server listening on port {}", port);

    let shutdown_store = Arc::clone(&store);
    let shutdown_path = snapshot_path.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("⚠️ Failed to listen for shutdown signal: {}", e);
                return;
            }
            info!("🛑 Shutdown requested, saving player snapshot...");
            if let Err(e) = shutdown_store.save_snapshot(&shutdown_path).await {
                warn!("⚠️ Failed to save player snapshot: {}", e);
            }
        })
        .await?;

    info!("👋 TuneFlow stopped");
    Ok(())
}
