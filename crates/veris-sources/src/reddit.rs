//! Reddit subreddit listing adapter.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use veris_core::{ContentType, ItemMetadata, RawItem};

use crate::error::SourceError;
use crate::SourceAdapter;

const DEFAULT_BASE_URL: &str = "https://www.reddit.com";
const LISTING_LIMIT: usize = 25;

/// URL suffixes treated as an image signal (matched case-insensitively).
const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Substrings marking known video hosts.
const VIDEO_HOSTS: [&str; 2] = ["v.redd.it", "youtube.com"];

/// Reddit listing envelope, as returned by `/r/{sub}/hot.json`.
#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    id: String,
    title: String,
    #[serde(default)]
    selftext: String,
    url: String,
    author: Option<String>,
    created_utc: Option<f64>,
    score: Option<i64>,
    permalink: Option<String>,
}

/// Crawls the hot listing of each configured subreddit.
///
/// Uses the public JSON listing endpoint; no OAuth. One failing subreddit is
/// logged and skipped so the others still contribute.
pub struct RedditAdapter {
    client: reqwest::Client,
    subreddits: Vec<String>,
    base_url: String,
    user_agent: String,
}

impl RedditAdapter {
    /// Create an adapter pointed at the public Reddit API.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        subreddits: Vec<String>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        Self::with_base_url(subreddits, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Create an adapter with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        subreddits: Vec<String>,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            subreddits,
            base_url: base_url.trim_end_matches('/').to_owned(),
            user_agent: user_agent.to_owned(),
        })
    }

    async fn fetch_subreddit(&self, subreddit: &str) -> Result<Vec<RawItem>, SourceError> {
        let url = format!(
            "{}/r/{subreddit}/hot.json?limit={LISTING_LIMIT}",
            self.base_url
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Reddit(format!(
                "r/{subreddit} listing failed with status {}",
                response.status()
            )));
        }

        let listing: Listing = response
            .json()
            .await
            .map_err(|e| SourceError::Reddit(format!("listing parse error: {e}")))?;

        Ok(listing
            .data
            .children
            .into_iter()
            .map(|post| post_to_item(post.data, subreddit, &self.base_url))
            .collect())
    }
}

#[async_trait]
impl SourceAdapter for RedditAdapter {
    fn name(&self) -> &str {
        "reddit"
    }

    async fn fetch(&self) -> Result<Vec<RawItem>, SourceError> {
        let mut items = Vec::new();

        for subreddit in &self.subreddits {
            match self.fetch_subreddit(subreddit).await {
                Ok(sub_items) => {
                    tracing::debug!(subreddit, count = sub_items.len(), "subreddit crawled");
                    items.extend(sub_items);
                }
                Err(e) => {
                    tracing::warn!(subreddit, error = %e, "subreddit crawl failed; skipping");
                }
            }
        }

        tracing::info!(
            subreddits = self.subreddits.len(),
            items = items.len(),
            "Reddit crawl complete"
        );
        Ok(items)
    }
}

/// Normalize one post into a [`RawItem`].
///
/// The item's canonical URL is the post's permalink on `base_url`; link posts
/// without a permalink fall back to the target URL itself.
fn post_to_item(post: PostData, subreddit: &str, base_url: &str) -> RawItem {
    let content_type = classify(&post);
    let images = extract_images(&post.url);
    let videos = extract_videos(&post.url);

    let url = post
        .permalink
        .as_deref()
        .map_or_else(|| post.url.clone(), |p| format!("{base_url}{p}"));

    #[allow(clippy::cast_possible_truncation)]
    let published_at = post
        .created_utc
        .and_then(|secs| DateTime::from_timestamp(secs as i64, 0));

    RawItem {
        source: format!("Reddit - r/{subreddit}"),
        url,
        content_type,
        raw_text: format!("{}\n\n{}", post.title, post.selftext),
        images,
        videos,
        metadata: ItemMetadata {
            title: Some(post.title),
            author: post.author,
            published_at,
            tags: vec![subreddit.to_owned()],
            score: post.score,
            external_id: Some(post.id),
            ..ItemMetadata::default()
        },
    }
}

/// Classify a post from its URL and selftext signals.
///
/// Video is checked before image to match the listing semantics: a URL can
/// in principle carry both signals (an image path on a video host), and the
/// host marker is the stronger one.
fn classify(post: &PostData) -> ContentType {
    let has_text = !post.selftext.is_empty();
    let has_image = is_image_url(&post.url);
    let has_video = is_video_url(&post.url);

    if has_video && has_text {
        ContentType::Mixed
    } else if has_image && has_text {
        ContentType::Mixed
    } else if has_video {
        ContentType::Video
    } else if has_image {
        ContentType::Image
    } else {
        ContentType::Text
    }
}

fn is_image_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn is_video_url(url: &str) -> bool {
    VIDEO_HOSTS.iter().any(|host| url.contains(host))
}

fn extract_images(url: &str) -> Option<Vec<String>> {
    is_image_url(url).then(|| vec![url.to_owned()])
}

fn extract_videos(url: &str) -> Option<Vec<String>> {
    is_video_url(url).then(|| vec![url.to_owned()])
}
