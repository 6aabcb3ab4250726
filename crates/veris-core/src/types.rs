//! Domain types shared across the crawl pipeline.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Broad classification of a fetched item's media makeup.
///
/// `Mixed` means the item carries text alongside at least one image or video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Image,
    Video,
    Mixed,
}

impl ContentType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::Video => "video",
            ContentType::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claim category assigned by the extraction stage.
///
/// The set is closed; anything the model returns outside it maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Politics,
    Health,
    Science,
    Economy,
    Social,
    Technology,
    Other,
}

impl Category {
    /// Parse a category label, defaulting to [`Category::Other`] for anything
    /// unrecognized.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "politics" => Category::Politics,
            "health" => Category::Health,
            "science" => Category::Science,
            "economy" => Category::Economy,
            "social" => Category::Social,
            "technology" => Category::Technology,
            _ => Category::Other,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Politics => "politics",
            Category::Health => "health",
            Category::Science => "science",
            Category::Economy => "economy",
            Category::Social => "social",
            Category::Technology => "technology",
            Category::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source-specific attributes of a fetched item.
///
/// Known attributes get typed fields; anything else a source wants to carry
/// goes into `extra`, which flattens into the same JSON object on
/// serialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One fetched, unprocessed piece of source content.
///
/// Created by a source adapter and immutable from then on. `url` is the
/// item's canonical identity: deduplication and storage both key on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawItem {
    /// Human-readable origin label, e.g. `"Reddit - r/news"`.
    pub source: String,
    pub url: String,
    pub content_type: ContentType,
    /// Concatenated title + body text; may be empty.
    pub raw_text: String,
    /// Image URLs found on the item; `None` (not empty) when there are none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    /// Video URLs found on the item; `None` (not empty) when there are none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<String>>,
    pub metadata: ItemMetadata,
}

/// Back-reference from a claim to the item it was extracted from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedFrom {
    pub content_type: ContentType,
    pub source_url: String,
}

/// One extracted factual assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// The claim statement. May be empty if the model omitted the text; an
    /// empty claim is kept, not dropped.
    pub claim: String,
    pub category: Category,
    /// Fixed stage-assigned confidence in [0, 1]; not sourced from the model.
    pub confidence: f32,
    pub extracted_from: ExtractedFrom,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_from_label_known_values() {
        assert_eq!(Category::from_label("politics"), Category::Politics);
        assert_eq!(Category::from_label("science"), Category::Science);
        assert_eq!(Category::from_label("technology"), Category::Technology);
    }

    #[test]
    fn category_from_label_unknown_defaults_to_other() {
        assert_eq!(Category::from_label("sports"), Category::Other);
        assert_eq!(Category::from_label(""), Category::Other);
        assert_eq!(Category::from_label("SCIENCE"), Category::Other);
    }

    #[test]
    fn content_type_round_trips_through_str() {
        for ct in [
            ContentType::Text,
            ContentType::Image,
            ContentType::Video,
            ContentType::Mixed,
        ] {
            let json = serde_json::to_string(&ct).unwrap();
            assert_eq!(json, format!("\"{}\"", ct.as_str()));
        }
    }

    #[test]
    fn metadata_extra_fields_flatten_into_object() {
        let mut metadata = ItemMetadata {
            title: Some("T".to_string()),
            ..ItemMetadata::default()
        };
        metadata
            .extra
            .insert("post_id".to_string(), serde_json::json!("abc123"));

        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value["title"], "T");
        assert_eq!(value["post_id"], "abc123");
        assert!(value.get("author").is_none(), "None fields are omitted");
    }
}
