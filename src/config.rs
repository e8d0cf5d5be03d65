//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the relay
//! starts. `.env` files are read by the binaries via `dotenvy` beforehand.
//!
//! ## Required Variables
//!
//! - `BOT_TOKEN` - Telegram bot credential (server only; `fairyctl` does not need it)
//!
//! ## Optional Variables
//!
//! - `BASE_URL` - Host used in hosted media links, without scheme (default: `localhost`)
//! - `CACHE_DIR` - Media cache directory (default: `/tmp/url-fairy-bot-cache/`)
//! - `FOLLOW_REDIRECT_TIMEOUT` - Redirect resolution timeout in seconds (default: 10)
//! - `DOWNLOAD_ALLOWED_DOMAINS` - Comma-separated download allow-list (default: empty, nothing allowed)
//! - `DOWNLOAD_TIMEOUT` - Upper bound for one media download in seconds (default: 300)
//! - `YT_DLP_PATH` - Extraction binary (default: `yt-dlp`)
//! - `YT_DLP_FORMAT` - Extraction format selector (default: `best`)
//! - `LISTEN` - HTTP bind address (default: `0.0.0.0:8000`)
//! - `SERVE_MEDIA` - Serve `CACHE_DIR` over HTTP as well (default: `false`)
//! - `LOG_LEVEL` - Log level, case-insensitive (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Relay configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Host (no scheme) that serves the cache directory.
    pub base_url: String,
    /// Telegram bot credential. Never logged.
    pub bot_token: Option<String>,
    pub cache_dir: PathBuf,
    pub follow_redirect_timeout: u64,
    pub download_allowed_domains: Vec<String>,
    pub download_timeout: u64,
    pub yt_dlp_path: String,
    pub yt_dlp_format: String,
    pub listen_addr: String,
    /// When true, the HTTP server also serves files from `cache_dir`.
    pub serve_media: bool,
    pub log_level: String,
    pub log_format: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("bot_token", &self.bot_token.as_deref().map(mask_token))
            .field("cache_dir", &self.cache_dir)
            .field("follow_redirect_timeout", &self.follow_redirect_timeout)
            .field("download_allowed_domains", &self.download_allowed_domains)
            .field("download_timeout", &self.download_timeout)
            .field("yt_dlp_path", &self.yt_dlp_path)
            .field("yt_dlp_format", &self.yt_dlp_format)
            .field("listen_addr", &self.listen_addr)
            .field("serve_media", &self.serve_media)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("BASE_URL").unwrap_or_else(|_| "localhost".to_string());
        let bot_token = env::var("BOT_TOKEN").ok();
        let cache_dir = env::var("CACHE_DIR")
            .unwrap_or_else(|_| "/tmp/url-fairy-bot-cache/".to_string())
            .into();

        let follow_redirect_timeout = parse_var("FOLLOW_REDIRECT_TIMEOUT", 10)?;
        let download_timeout = parse_var("DOWNLOAD_TIMEOUT", 300)?;

        let download_allowed_domains = env::var("DOWNLOAD_ALLOWED_DOMAINS")
            .map(|csv| split_csv(&csv))
            .unwrap_or_default();

        let yt_dlp_path = env::var("YT_DLP_PATH").unwrap_or_else(|_| "yt-dlp".to_string());
        let yt_dlp_format = env::var("YT_DLP_FORMAT").unwrap_or_else(|_| "best".to_string());

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let serve_media = env::var("SERVE_MEDIA")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let log_level = env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .to_ascii_lowercase();
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            base_url,
            bot_token,
            cache_dir,
            follow_redirect_timeout,
            download_allowed_domains,
            download_timeout,
            yt_dlp_path,
            yt_dlp_format,
            listen_addr,
            serve_media,
            log_level,
            log_format,
        })
    }

    /// Validates the full server configuration, including the bot credential.
    ///
    /// # Errors
    ///
    /// Returns an error if [`Config::validate_pipeline`] fails or `BOT_TOKEN`
    /// is missing or empty.
    pub fn validate(&self) -> Result<()> {
        self.validate_pipeline()?;

        match self.bot_token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(()),
            _ => anyhow::bail!("BOT_TOKEN must be set"),
        }
    }

    /// Validates everything the URL pipeline needs.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a timeout is zero
    /// - `BASE_URL` is empty or carries a scheme
    /// - `LOG_FORMAT` is not `text` or `json`
    /// - `LISTEN` is not `host:port`
    /// - `YT_DLP_PATH` or `YT_DLP_FORMAT` is empty
    pub fn validate_pipeline(&self) -> Result<()> {
        if self.follow_redirect_timeout == 0 {
            anyhow::bail!("FOLLOW_REDIRECT_TIMEOUT must be greater than 0");
        }

        if self.download_timeout == 0 {
            anyhow::bail!("DOWNLOAD_TIMEOUT must be greater than 0");
        }

        if self.base_url.trim().is_empty() {
            anyhow::bail!("BASE_URL must not be empty");
        }

        if self.base_url.contains("://") {
            anyhow::bail!(
                "BASE_URL must be a host without scheme, got '{}'",
                self.base_url
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.yt_dlp_path.trim().is_empty() {
            anyhow::bail!("YT_DLP_PATH must not be empty");
        }

        if self.yt_dlp_format.trim().is_empty() {
            anyhow::bail!("YT_DLP_FORMAT must not be empty");
        }

        Ok(())
    }

    pub fn redirect_timeout(&self) -> Duration {
        Duration::from_secs(self.follow_redirect_timeout)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout)
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Base URL: {}", self.base_url);
        tracing::info!("  Cache dir: {}", self.cache_dir.display());
        tracing::info!(
            "  Bot token: {}",
            self.bot_token.as_deref().map_or("<unset>".to_string(), mask_token)
        );

        if self.download_allowed_domains.is_empty() {
            tracing::info!("  Download allow-list: empty (downloads disabled)");
        } else {
            tracing::info!(
                "  Download allow-list: {}",
                self.download_allowed_domains.join(", ")
            );
        }

        tracing::info!(
            "  Timeouts: redirect {}s, download {}s",
            self.follow_redirect_timeout,
            self.download_timeout
        );
        tracing::info!("  yt-dlp: {} (-f {})", self.yt_dlp_path, self.yt_dlp_format);
        tracing::info!("  Serve media: {}", self.serve_media);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got '{value}'")),
        Err(_) => Ok(default),
    }
}

fn split_csv(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Masks a bot token for logging.
///
/// Keeps the numeric bot id before the `:` and hides the secret part:
/// `123456:ABC-DEF` → `123456:***`.
fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) => format!("{bot_id}:***"),
        None => "***".to_string(),
    }
}

/// Loads and validates the server configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
