//! RSS/Atom feed adapter.

use std::time::Duration;

use async_trait::async_trait;
use feed_rs::model::{Entry, Feed};
use veris_core::{ContentType, ItemMetadata, RawItem};

use crate::error::SourceError;
use crate::SourceAdapter;

/// Crawls a configured list of RSS/Atom feeds.
///
/// Each feed is fetched and parsed independently; one failing feed is logged
/// and skipped so the remaining feeds still contribute items.
pub struct RssAdapter {
    client: reqwest::Client,
    feeds: Vec<String>,
    user_agent: String,
}

impl RssAdapter {
    /// Create an adapter for the given feed URLs.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        feeds: Vec<String>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            feeds,
            user_agent: user_agent.to_owned(),
        })
    }

    async fn fetch_feed(&self, feed_url: &str) -> Result<Vec<RawItem>, SourceError> {
        let response = self
            .client
            .get(feed_url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        let feed = feed_rs::parser::parse(&bytes[..])?;
        Ok(feed_to_items(feed, feed_url))
    }
}

#[async_trait]
impl SourceAdapter for RssAdapter {
    fn name(&self) -> &str {
        "rss"
    }

    async fn fetch(&self) -> Result<Vec<RawItem>, SourceError> {
        let mut items = Vec::new();

        for feed_url in &self.feeds {
            match self.fetch_feed(feed_url).await {
                Ok(feed_items) => {
                    tracing::debug!(feed = feed_url, count = feed_items.len(), "feed crawled");
                    items.extend(feed_items);
                }
                Err(e) => {
                    tracing::warn!(feed = feed_url, error = %e, "feed crawl failed; skipping");
                }
            }
        }

        tracing::info!(feeds = self.feeds.len(), items = items.len(), "RSS crawl complete");
        Ok(items)
    }
}

/// Convert a parsed feed into raw items, labelled by the feed's title when it
/// has one, else its URL.
fn feed_to_items(feed: Feed, feed_url: &str) -> Vec<RawItem> {
    let label = feed
        .title
        .as_ref()
        .map_or_else(|| feed_url.to_string(), |t| t.content.clone());
    let source = format!("RSS - {label}");

    feed.entries
        .into_iter()
        .filter_map(|entry| entry_to_item(entry, &source))
        .collect()
}

/// Normalize one feed entry. Entries without a usable link are dropped: the
/// URL is the item's identity downstream.
fn entry_to_item(entry: Entry, source: &str) -> Option<RawItem> {
    let url = entry
        .links
        .first()
        .map(|l| l.href.clone())
        .or_else(|| entry.id.starts_with("http").then(|| entry.id.clone()))?;

    let title = entry.title.as_ref().map(|t| t.content.clone());
    let summary = entry.summary.as_ref().map(|s| s.content.clone());

    let raw_text = format!(
        "{}\n\n{}",
        title.as_deref().unwrap_or(""),
        summary.as_deref().unwrap_or("")
    );

    Some(RawItem {
        source: source.to_owned(),
        url,
        content_type: ContentType::Text,
        raw_text,
        images: None,
        videos: None,
        metadata: ItemMetadata {
            title,
            published_at: entry.published,
            external_id: Some(entry.id),
            ..ItemMetadata::default()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example News</title>
    <item>
      <title>Parliament passes budget</title>
      <link>https://example.com/news/1</link>
      <description>The annual budget passed with a narrow majority.</description>
      <guid>news-1</guid>
    </item>
    <item>
      <title>Storm hits coast</title>
      <link>https://example.com/news/2</link>
      <description>Heavy rain expected through the weekend.</description>
      <guid>news-2</guid>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn feed_to_items_maps_entries() {
        let feed = feed_rs::parser::parse(SAMPLE_RSS).expect("sample RSS should parse");
        let items = feed_to_items(feed, "https://example.com/rss");

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source, "RSS - Example News");
        assert_eq!(items[0].url, "https://example.com/news/1");
        assert_eq!(items[0].content_type, ContentType::Text);
        assert!(items[0].raw_text.contains("Parliament passes budget"));
        assert!(items[0]
            .raw_text
            .contains("The annual budget passed with a narrow majority."));
        assert_eq!(
            items[0].metadata.title.as_deref(),
            Some("Parliament passes budget")
        );
        assert!(items[0].images.is_none());
        assert!(items[0].videos.is_none());
    }

    #[test]
    fn entry_without_link_is_dropped() {
        let xml = br#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Linkless</title>
    <item><title>No link here</title><guid isPermaLink="false">x</guid></item>
  </channel>
</rss>"#;
        let feed = feed_rs::parser::parse(&xml[..]).expect("should parse");
        let items = feed_to_items(feed, "https://example.com/rss");
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn fetch_skips_failing_feed_and_keeps_good_one() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/good.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(SAMPLE_RSS))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bad.xml"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let adapter = RssAdapter::new(
            vec![
                format!("{}/bad.xml", server.uri()),
                format!("{}/good.xml", server.uri()),
            ],
            5,
            "veris-test/0.1",
        )
        .expect("adapter should build");

        let items = adapter.fetch().await.expect("fetch should not error");
        assert_eq!(items.len(), 2, "only the good feed contributes items");
    }
}
