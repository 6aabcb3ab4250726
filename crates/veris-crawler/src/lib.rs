//! Cycle orchestration for the Veris content crawler.
//!
//! The binary in `main.rs` wires real adapters, the extraction stage, and the
//! Postgres store into [`pipeline::CrawlerService`]; the pipeline itself is
//! generic over those seams so tests can drive it with in-memory fakes.

pub mod pipeline;
