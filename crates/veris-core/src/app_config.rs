/// Runtime configuration for the crawler process, built from the environment.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    /// RSS feed URLs to crawl each cycle.
    pub rss_feeds: Vec<String>,
    /// Subreddits to crawl each cycle (names only, no `r/` prefix).
    pub subreddits: Vec<String>,
    pub crawl_interval_secs: u64,
    /// Text-generation API key. `None` means extraction fails closed.
    pub ai_api_key: Option<String>,
    pub ai_model: String,
    pub ai_base_url: String,
    pub ai_timeout_secs: u64,
    pub ai_min_request_interval_ms: u64,
    pub source_timeout_secs: u64,
    pub user_agent: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("rss_feeds", &self.rss_feeds)
            .field("subreddits", &self.subreddits)
            .field("crawl_interval_secs", &self.crawl_interval_secs)
            .field("ai_api_key", &self.ai_api_key.as_ref().map(|_| "[redacted]"))
            .field("ai_model", &self.ai_model)
            .field("ai_base_url", &self.ai_base_url)
            .field("ai_timeout_secs", &self.ai_timeout_secs)
            .field(
                "ai_min_request_interval_ms",
                &self.ai_min_request_interval_ms,
            )
            .field("source_timeout_secs", &self.source_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
