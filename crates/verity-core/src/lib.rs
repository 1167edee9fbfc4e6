//! Core types and analysis for the Verity fact-check client.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! turns an upstream claim-search response into a normalized [`Verdict`],
//! generates simulated fallback verdicts, and defines the store traits that
//! persistence backends implement.
//!
//! [`Verdict`]: record::Verdict

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod classify;
pub mod confidence;
pub mod error;
pub mod fallback;
pub mod normalize;
pub mod query;
pub mod record;
pub mod sources;
pub mod store;
pub mod upstream;

pub use error::{Error, Result};
