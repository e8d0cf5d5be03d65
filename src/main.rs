use anyhow::Result;
use tracing_subscriber::EnvFilter;
use url_fairy::config::{self, Config};
use url_fairy::server;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;
    init_tracing(&config);

    config.print_summary();
    tracing::info!("URL Fairy v{} starting", env!("CARGO_PKG_VERSION"));

    server::run(config).await
}

/// Installs the global subscriber from `LOG_LEVEL` and `LOG_FORMAT`.
///
/// `RUST_LOG`, when set, takes precedence over `LOG_LEVEL`.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
