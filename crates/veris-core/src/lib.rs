//! Shared domain types and configuration for the Veris content crawler.
//!
//! The crawler periodically ingests items from RSS feeds and Reddit, extracts
//! factual claims from them via a text-generation API, and upserts one row per
//! (item, claim) pair into Postgres. This crate holds the types every stage of
//! that pipeline speaks: [`RawItem`], [`Claim`], and the [`AppConfig`] built
//! from the environment.

pub mod app_config;
pub mod config;
pub mod types;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{Category, Claim, ContentType, ExtractedFrom, ItemMetadata, RawItem};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
