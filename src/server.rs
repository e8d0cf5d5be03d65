//! Relay assembly and runtime setup.
//!
//! Builds the pipeline from configuration, then runs the Telegram polling
//! loop and the Axum HTTP server side by side until a shutdown signal.

use crate::application::services::{
    DomainPolicy, LinkRewriter, MediaFetcher, MessageService, OrchestratorSettings,
    RequestOrchestrator,
};
use crate::config::Config;
use crate::domain::gateways::{ContentStore, MediaExtractor};
use crate::infrastructure::extractor::YtDlpExtractor;
use crate::infrastructure::http::HttpRedirectResolver;
use crate::infrastructure::store::FsContentStore;
use crate::infrastructure::telegram::{TelegramClient, run_polling};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;

/// The pipeline and the collaborators behind it, built once per process.
pub struct Relay {
    pub orchestrator: Arc<RequestOrchestrator>,
    pub extractor: Arc<dyn MediaExtractor>,
    pub store: Arc<dyn ContentStore>,
}

/// Builds the relay pipeline from configuration.
///
/// # Errors
///
/// Returns an error if the cache directory cannot be created or the HTTP
/// client cannot be initialised.
pub async fn build_relay(config: &Config) -> Result<Relay> {
    let store: Arc<dyn ContentStore> = Arc::new(
        FsContentStore::open(&config.cache_dir)
            .await
            .context("Failed to open cache directory")?,
    );

    let extractor: Arc<dyn MediaExtractor> = Arc::new(YtDlpExtractor::new(
        &config.yt_dlp_path,
        &config.yt_dlp_format,
    ));

    let resolver =
        Arc::new(HttpRedirectResolver::new().context("Failed to build HTTP client")?);

    let policy = DomainPolicy::new(&config.download_allowed_domains);
    if policy.is_empty() {
        tracing::warn!("DOWNLOAD_ALLOWED_DOMAINS is empty, media downloads are disabled");
    }

    let orchestrator = RequestOrchestrator::new(
        resolver,
        policy,
        LinkRewriter::new(),
        MediaFetcher::new(extractor.clone(), store.clone()),
        OrchestratorSettings {
            base_url: config.base_url.clone(),
            redirect_timeout: config.redirect_timeout(),
            download_timeout: config.download_timeout(),
        },
    );

    Ok(Relay {
        orchestrator: Arc::new(orchestrator),
        extractor,
        store,
    })
}

/// Runs the bot and the HTTP server with the given configuration.
///
/// Initializes:
/// - Content store, extractor and redirect resolver
/// - Telegram polling (after validating the bot token with `getMe`)
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - `BOT_TOKEN` is missing or rejected by Telegram
/// - The cache directory cannot be created
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let relay = build_relay(&config).await?;

    let token = config.bot_token.as_deref().context("BOT_TOKEN must be set")?;
    let telegram = TelegramClient::new(token);
    let me = telegram
        .get_me()
        .await
        .context("Failed to validate BOT_TOKEN with Telegram")?;
    tracing::info!(
        "Telegram bot @{} connected",
        me.username.as_deref().unwrap_or("unknown")
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let messages = Arc::new(MessageService::new(relay.orchestrator.clone(), Some(me.id)));
    let bot = tokio::spawn(run_polling(telegram, messages, shutdown_rx.clone()));

    let state = AppState::new(relay.orchestrator, relay.extractor, relay.store);
    let media_dir = config.serve_media.then(|| config.cache_dir.clone());
    let app = app_router(state, media_dir);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let mut server_shutdown = shutdown_rx;
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.changed().await;
        })
        .await?;

    if let Err(e) = bot.await {
        tracing::error!("Telegram polling task failed: {}", e);
    }

    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
