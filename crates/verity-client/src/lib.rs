//! Fact-check client for Verity.
//!
//! [`FactChecker`] sends a query to the upstream claim-search service,
//! normalizes the response into a verdict, and records every outcome in a
//! [`verity_core::store::HistoryStore`]. Rendering the result is the
//! embedding application's concern.
//!
//! # Wiring
//!
//! ```rust,ignore
//! let config  = ClientConfig::load(Some(Path::new("verity.toml")))?;
//! let store   = Arc::new(SqliteStore::open(config.resolved_store_path()).await?);
//! let checker = FactChecker::from_config(&config, store).await?;
//! let outcome = checker.check_with_fallback("the earth is flat").await?;
//! ```

pub mod checker;
pub mod credentials;
pub mod error;
pub mod settings;
pub mod upstream;

pub use checker::{CheckOutcome, FactChecker};
pub use credentials::ApiKey;
pub use error::{Error, Result, UpstreamFailure};
pub use settings::ClientConfig;

#[cfg(test)]
mod tests;
