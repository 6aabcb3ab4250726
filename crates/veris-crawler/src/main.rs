//! Veris crawler service entry point.
//!
//! Wires configuration, the content store, the source adapters, and the
//! extraction stage into a [`CrawlerService`], runs it until a termination
//! signal arrives, then releases the store.

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use veris_crawler::pipeline::CrawlerService;
use veris_db::{ContentStore, StoreConfig};
use veris_extract::{ExtractionStage, ExtractorConfig};
use veris_sources::{RedditAdapter, RssAdapter, SourceAdapter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = veris_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut store = ContentStore::new(StoreConfig::from_app_config(&config));
    store.initialize().await?;

    let mut adapters: Vec<Box<dyn SourceAdapter>> = Vec::new();
    if !config.rss_feeds.is_empty() {
        adapters.push(Box::new(RssAdapter::new(
            config.rss_feeds.clone(),
            config.source_timeout_secs,
            &config.user_agent,
        )?));
    }
    if !config.subreddits.is_empty() {
        adapters.push(Box::new(RedditAdapter::new(
            config.subreddits.clone(),
            config.source_timeout_secs,
            &config.user_agent,
        )?));
    }

    let extractor = ExtractionStage::new(ExtractorConfig::from_app_config(&config))?;

    let service = CrawlerService::new(
        adapters,
        extractor,
        &store,
        Duration::from_secs(config.crawl_interval_secs),
    );
    service.run(shutdown_signal()).await;
    drop(service);

    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
