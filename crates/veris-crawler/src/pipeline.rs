//! The crawl cycle orchestrator.
//!
//! One cycle runs fetch → dedup → extract → persist to completion before the
//! next may start. Source failures are absorbed per adapter, extraction
//! failures per item; only dedup/persist store errors abort a cycle, and a
//! failed cycle is logged and never halts the scheduler.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::MissedTickBehavior;
use veris_core::RawItem;
use veris_db::{ContentRepository, StoreError};
use veris_extract::ClaimExtractor;
use veris_sources::SourceAdapter;

/// A cycle-level failure, tagged with the stage that raised it.
///
/// Fetching never appears here: adapter failures are caught per adapter and
/// count as zero items from that source.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("deduplication query failed: {0}")]
    Dedup(#[source] StoreError),

    #[error("persistence failed: {0}")]
    Persist(#[source] StoreError),
}

/// Per-cycle counters, logged at info when the cycle completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub fetched: usize,
    pub new_items: usize,
    pub claims: usize,
    pub saved: usize,
    pub failed_writes: usize,
}

/// Drives periodic crawl cycles over a set of source adapters, an extraction
/// stage, and a content repository.
pub struct CrawlerService<E, R> {
    adapters: Vec<Box<dyn SourceAdapter>>,
    extractor: E,
    repository: R,
    interval: Duration,
}

impl<E, R> CrawlerService<E, R>
where
    E: ClaimExtractor,
    R: ContentRepository,
{
    #[must_use]
    pub fn new(
        adapters: Vec<Box<dyn SourceAdapter>>,
        extractor: E,
        repository: R,
        interval: Duration,
    ) -> Self {
        Self {
            adapters,
            extractor,
            repository,
            interval,
        }
    }

    /// Run one full fetch → dedup → extract → persist cycle.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError`] if the dedup lookup or the batch persist fails
    /// at the store level. Source and extraction failures never surface here.
    pub async fn run_cycle(&self) -> Result<CycleStats, CycleError> {
        // Fetch: every adapter contributes what it can.
        let mut fetched: Vec<RawItem> = Vec::new();
        for adapter in &self.adapters {
            match adapter.fetch().await {
                Ok(items) => {
                    tracing::debug!(source = adapter.name(), count = items.len(), "source fetched");
                    fetched.extend(items);
                }
                Err(e) => {
                    tracing::warn!(
                        source = adapter.name(),
                        error = %e,
                        "source fetch failed; treating as zero items"
                    );
                }
            }
        }

        // Dedup: drop items whose url is already stored. Point-in-time check;
        // races with concurrent writers are resolved by the upsert.
        let fetched_count = fetched.len();
        let mut new_items = Vec::new();
        for item in fetched {
            if self
                .repository
                .exists(&item.url)
                .await
                .map_err(CycleError::Dedup)?
            {
                tracing::debug!(url = %item.url, "already stored; skipping");
            } else {
                new_items.push(item);
            }
        }

        // Extract: strictly sequential, rate-limited inside the stage.
        let claims_by_url = self.extractor.extract_batch(&new_items).await;
        let claim_count: usize = claims_by_url.values().map(Vec::len).sum();

        // Persist.
        let outcome = self
            .repository
            .save_batch(&new_items, &claims_by_url)
            .await
            .map_err(CycleError::Persist)?;

        Ok(CycleStats {
            fetched: fetched_count,
            new_items: new_items.len(),
            claims: claim_count,
            saved: outcome.saved,
            failed_writes: outcome.failed,
        })
    }

    /// Run one cycle immediately, then one per interval until `shutdown`
    /// resolves.
    ///
    /// Cycles never overlap: the loop awaits each cycle to completion, and a
    /// tick that fires mid-cycle is absorbed by the interval's delayed
    /// missed-tick behavior. On shutdown the in-flight cycle's current stage
    /// is not interrupted; the loop simply stops scheduling.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tracing::info!(interval_secs = self.interval.as_secs(), "crawler started");
        self.run_and_log().await;

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the initial cycle already ran.
        ticker.tick().await;

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown requested; no further cycles will be scheduled");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_and_log().await;
                }
            }
        }
    }

    async fn run_and_log(&self) {
        match self.run_cycle().await {
            Ok(stats) => {
                tracing::info!(
                    fetched = stats.fetched,
                    new_items = stats.new_items,
                    claims = stats.claims,
                    saved = stats.saved,
                    failed_writes = stats.failed_writes,
                    "crawl cycle complete"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "crawl cycle failed; awaiting next trigger");
            }
        }
    }
}
