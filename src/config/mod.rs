//! Configuration module for the fan hub backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key protecting the registration API (disabled when unset)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Organization name, part of the eSports keyword set
    pub org_name: String,
    /// Team statistics page that feeds the snapshot cache
    pub team_page_url: String,
    /// Prefix for relative match links
    pub site_base_url: String,
    /// Prefix for relative news links
    pub news_link_base: String,
    /// Lifetime of the cached team snapshot
    pub cache_ttl: Duration,
    /// Timeout for the team page refetch
    pub fetch_timeout: Duration,
    /// Timeout for user-triggered link validation and news queries
    pub link_timeout: Duration,
    /// NewsAPI-compatible `everything` endpoint
    pub news_api_url: String,
    /// News API key; the news endpoint is disabled without it
    pub news_api_key: Option<String>,
    /// Free-text news query
    pub news_query: String,
    pub news_primary_lang: String,
    pub news_secondary_lang: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("FANHUB_API_PSK").ok().filter(|s| !s.is_empty());

        let db_path = env::var("FANHUB_DB_PATH")
            .unwrap_or_else(|_| "./data/fanhub.sqlite".to_string())
            .into();

        let bind_addr = env::var("FANHUB_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid FANHUB_BIND_ADDR: {}", e)))?;

        let log_level = env_or("FANHUB_LOG_LEVEL", "info");
        let org_name = env_or("FANHUB_ORG_NAME", "furia");

        let team_page_url = env_or("FANHUB_TEAM_PAGE_URL", "https://www.hltv.org/team/8297/furia");
        let site_base_url = env_or("FANHUB_SITE_BASE_URL", "https://www.hltv.org");
        let news_link_base = env_or(
            "FANHUB_NEWS_LINK_BASE",
            "https://www.hltv.org/team/8297/furia#tab-newsBox",
        );

        let cache_ttl = Duration::from_secs(parse_or("FANHUB_CACHE_TTL_SECS", 600));
        let fetch_timeout = Duration::from_secs(parse_or("FANHUB_FETCH_TIMEOUT_SECS", 15));
        let link_timeout = Duration::from_secs(parse_or("FANHUB_LINK_TIMEOUT_SECS", 10));

        let news_api_url = env_or("FANHUB_NEWS_API_URL", "https://newsapi.org/v2/everything");
        let news_api_key = env::var("NEWS_API_KEY").ok().filter(|s| !s.is_empty());
        let news_query = env_or(
            "FANHUB_NEWS_QUERY",
            "FURIA esports OR FURIA Counter-Strike",
        );
        let news_primary_lang = env_or("FANHUB_NEWS_PRIMARY_LANG", "pt");
        let news_secondary_lang = env_or("FANHUB_NEWS_SECONDARY_LANG", "en");

        Ok(Self {
            api_psk,
            db_path,
            bind_addr,
            log_level,
            org_name,
            team_page_url,
            site_base_url,
            news_link_base,
            cache_ttl,
            fetch_timeout,
            link_timeout,
            news_api_url,
            news_api_key,
            news_query,
            news_primary_lang,
            news_secondary_lang,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
