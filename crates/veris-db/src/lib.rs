//! Persistence layer for the Veris content crawler.
//!
//! One Postgres table, `crawled_content`, keyed by a deterministic id derived
//! from the item URL, with at-most-one-row-per-URL semantics enforced by a
//! unique constraint and an `ON CONFLICT (url)` upsert. The connection is
//! process-wide: opened once at startup via [`ContentStore::initialize`],
//! reused by every cycle, released at shutdown via [`ContentStore::close`].

mod error;
mod id;
mod store;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use veris_core::{Claim, RawItem};

pub use error::StoreError;
pub use id::content_id;
pub use store::{BatchOutcome, ContentStore, StoreConfig};

/// The persistence operations the crawl cycle consumes.
///
/// Implemented by [`ContentStore`] (Postgres) and by in-memory fakes in
/// orchestrator tests. Also implemented for `&T` and `Arc<T>` so a caller can
/// keep ownership of the store while the cycle borrows or shares it.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Exact-match existence check for a URL.
    async fn exists(&self, url: &str) -> Result<bool, StoreError>;

    /// Persist one row per (item, claim) pair. Items with no claims persist
    /// nothing. Individual write failures are logged and counted in the
    /// returned [`BatchOutcome`]; later writes still proceed.
    async fn save_batch(
        &self,
        items: &[RawItem],
        claims_by_url: &HashMap<String, Vec<Claim>>,
    ) -> Result<BatchOutcome, StoreError>;
}

#[async_trait]
impl<'a, T: ContentRepository> ContentRepository for &'a T {
    async fn exists(&self, url: &str) -> Result<bool, StoreError> {
        (**self).exists(url).await
    }

    async fn save_batch(
        &self,
        items: &[RawItem],
        claims_by_url: &HashMap<String, Vec<Claim>>,
    ) -> Result<BatchOutcome, StoreError> {
        (**self).save_batch(items, claims_by_url).await
    }
}

#[async_trait]
impl<T: ContentRepository + ?Sized> ContentRepository for Arc<T> {
    async fn exists(&self, url: &str) -> Result<bool, StoreError> {
        (**self).exists(url).await
    }

    async fn save_batch(
        &self,
        items: &[RawItem],
        claims_by_url: &HashMap<String, Vec<Claim>>,
    ) -> Result<BatchOutcome, StoreError> {
        (**self).save_batch(items, claims_by_url).await
    }
}
