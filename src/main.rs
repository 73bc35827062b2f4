//! Fan Hub Backend
//!
//! Verifies fan registrations and serves cached team data scraped from a
//! statistics site, plus team news with a second-language fallback.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod news;
mod scrape;
mod verify;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use errors::AppError;
use news::{NewsApiClient, NewsFetcher};
use scrape::{HttpPageSource, PageLinks, PageParser, SnapshotCache};
use verify::{KeywordSet, LinkValidator};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub snapshots: Arc<SnapshotCache>,
    /// Absent when no news API key is configured.
    pub news: Option<NewsFetcher>,
    pub links: LinkValidator,
    pub document_keywords: KeywordSet,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the outbound clients described by `config`.
    pub fn from_config(repo: Repository, config: Config) -> Result<Self, AppError> {
        let parser = PageParser::new(PageLinks {
            site_base: config.site_base_url.clone(),
            news_base: config.news_link_base.clone(),
        })?;
        let source = HttpPageSource::new(&config.team_page_url, config.fetch_timeout)?;
        let snapshots = SnapshotCache::new(Arc::new(source), parser, config.cache_ttl);

        let news = match &config.news_api_key {
            Some(key) => Some(NewsFetcher::new(Arc::new(NewsApiClient::new(
                &config.news_api_url,
                key,
                &config.news_query,
                config.link_timeout,
            )?))),
            None => None,
        };

        let links = LinkValidator::new(
            config.link_timeout,
            KeywordSet::esports(&config.org_name),
        )?;

        Ok(Self {
            repo: Arc::new(repo),
            snapshots: Arc::new(snapshots),
            news,
            links,
            document_keywords: KeywordSet::documents(),
            config: Arc::new(config),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Fan Hub Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Team page: {}", config.team_page_url);
    tracing::info!("Snapshot cache TTL: {}s", config.cache_ttl.as_secs());

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (FANHUB_API_PSK). Registration API is open!");
    }
    if config.news_api_key.is_none() {
        tracing::warn!("No NEWS_API_KEY configured. /news will answer 503");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let bind_addr = config.bind_addr;

    let state = AppState::from_config(Repository::new(pool), config)?;
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Registration API, behind the optional PSK
    let api_routes = Router::new()
        .route("/fans", post(api::create_fan))
        .route("/fans/{id}", get(api::get_fan))
        .route(
            "/fans/{id}/social-profiles",
            get(api::get_social_profiles).put(api::save_social_profiles),
        )
        .route(
            "/fans/{id}/documents",
            get(api::list_documents).post(api::submit_document),
        )
        .route(
            "/fans/{id}/links",
            get(api::list_links).post(api::submit_link),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    // Aggregation endpoints consumed by the bot
    let public_routes = Router::new()
        .route("/team-snapshot", get(api::get_team_snapshot))
        .route("/cache/invalidate", get(api::invalidate_cache))
        .route("/news", get(api::get_news))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(public_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
