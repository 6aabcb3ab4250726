//! Claim extraction stage for the Veris content crawler.
//!
//! Turns one [`RawItem`](veris_core::RawItem) into zero or more
//! [`Claim`](veris_core::Claim)s by prompting a chat-completions style
//! text-generation API for a structured `{"claims": [...]}` response.
//! The stage fails closed: missing credentials, thin content, network
//! failures, and malformed model output all yield an empty claim list rather
//! than an error, so one bad item never aborts a batch.

pub mod error;
pub mod pacer;

mod stage;

pub use error::ExtractError;
pub use pacer::Pacer;
pub use stage::{ClaimExtractor, ExtractionStage, ExtractorConfig};
