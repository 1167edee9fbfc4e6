//! [`FactChecker`] — drives one upstream query per check and records the
//! outcome.
//!
//! The caller's contract is "a check always yields a record": upstream
//! failures become a persisted `Error`-rated record rather than an `Err`.
//! Only a missing credential, an empty query, or a store failure surface as
//! errors.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use rand::Rng as _;
use tracing::{info, warn};
use uuid::Uuid;
use verity_core::{
  fallback::simulate,
  normalize::normalize,
  query::QueryKind,
  record::{FactCheckRecord, NewFactCheck, Verdict},
  store::{CredentialStore, HistoryStore},
};

use crate::{
  credentials::ApiKey,
  settings::ClientConfig,
  upstream::{ClaimSearch, GoogleFactCheck, SearchRequest},
  Error, Result,
};

const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_millis(1500);

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Result of [`FactChecker::check_with_fallback`].
#[derive(Debug, Clone)]
pub struct CheckOutcome {
  pub primary:  FactCheckRecord,
  /// Present when the primary check found nothing or failed.
  pub fallback: Option<FactCheckRecord>,
}

impl CheckOutcome {
  /// The record to show: the fallback if one was produced.
  pub fn effective(&self) -> &FactCheckRecord {
    self.fallback.as_ref().unwrap_or(&self.primary)
  }
}

// ─── Checker ─────────────────────────────────────────────────────────────────

/// Fact-check orchestrator over a history store `S` and an upstream `U`.
pub struct FactChecker<S, U = GoogleFactCheck> {
  store:          Arc<S>,
  upstream:       U,
  api_key:        Option<ApiKey>,
  fallback_delay: Duration,
}

impl<S> FactChecker<S, GoogleFactCheck>
where
  S: HistoryStore + CredentialStore,
{
  /// Build the HTTP-backed checker. The API key comes from `config` when
  /// set, otherwise from the key persisted in `store`.
  pub async fn from_config(config: &ClientConfig, store: Arc<S>) -> Result<Self> {
    let upstream = GoogleFactCheck::from_config(config)?;
    let mut checker =
      Self::new(store, upstream).with_fallback_delay(config.fallback_delay());

    match config.api_key.as_deref().and_then(ApiKey::parse) {
      Some(key) => checker.api_key = Some(key),
      None => {
        checker.reload_api_key().await?;
      }
    }

    info!(has_api_key = checker.has_api_key(), "fact checker ready");
    Ok(checker)
  }
}

impl<S, U> FactChecker<S, U>
where
  S: HistoryStore + CredentialStore,
  U: ClaimSearch,
{
  pub fn new(store: Arc<S>, upstream: U) -> Self {
    Self {
      store,
      upstream,
      api_key: None,
      fallback_delay: DEFAULT_FALLBACK_DELAY,
    }
  }

  pub fn with_api_key(mut self, key: ApiKey) -> Self {
    self.api_key = Some(key);
    self
  }

  pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
    self.fallback_delay = delay;
    self
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub fn upstream(&self) -> &U { &self.upstream }

  pub fn has_api_key(&self) -> bool { self.api_key.is_some() }

  pub fn api_key(&self) -> Option<&ApiKey> { self.api_key.as_ref() }

  // ── Credential ────────────────────────────────────────────────────────

  /// Replace the in-process key with the persisted one, if any. Returns
  /// whether a key was found.
  pub async fn reload_api_key(&mut self) -> Result<bool> {
    let stored = self.store.load_api_key().await.map_err(Error::store)?;
    if let Some(key) = stored.as_deref().and_then(ApiKey::parse) {
      self.api_key = Some(key);
      return Ok(true);
    }
    Ok(false)
  }

  /// Trim, use, and persist a new API key.
  pub async fn set_api_key(&mut self, raw: &str) -> Result<()> {
    let key = ApiKey::parse(raw).ok_or(Error::MissingApiKey)?;
    self
      .store
      .save_api_key(key.expose().to_owned())
      .await
      .map_err(Error::store)?;
    self.api_key = Some(key);
    Ok(())
  }

  // ── Checks ────────────────────────────────────────────────────────────

  /// Query the upstream service once and record the normalized verdict.
  ///
  /// Transport failures, non-2xx responses and malformed bodies are logged
  /// and recorded as an `Error` verdict with zero confidence.
  pub async fn check_fact(&self, query: &str) -> Result<FactCheckRecord> {
    let api_key = self.api_key.clone().ok_or(Error::MissingApiKey)?;
    let request = SearchRequest::new(api_key, query);
    let kind = request.kind();

    let verdict = match self.upstream.search(request).await {
      Ok(response) => normalize(&response),
      Err(e) => {
        warn!(error = %e, "fact check failed; recording error result");
        Verdict::error()
      }
    };

    info!(
      rating = %verdict.rating,
      confidence = verdict.confidence.value(),
      sources = verdict.sources.len(),
      url = kind.is_url(),
      "fact check complete"
    );

    self
      .store
      .save(NewFactCheck {
        query: query.to_owned(),
        is_url_query: kind.is_url(),
        verdict,
      })
      .await
      .map_err(Error::store)
  }

  /// Record a simulated, non-authoritative verdict for `query`.
  pub async fn fallback_check(&self, query: &str) -> Result<FactCheckRecord> {
    if !self.fallback_delay.is_zero() {
      tokio::time::sleep(self.fallback_delay).await;
    }

    let draw: f64 = rand::thread_rng().r#gen();
    let input = simulate(query, QueryKind::detect(query), draw, Utc::now());
    info!(rating = %input.verdict.rating, draw, "simulated fallback result");

    self.store.save(input).await.map_err(Error::store)
  }

  /// Trim and check `query`, falling back to a simulated result when the
  /// primary check has zero confidence (nothing found, or an error).
  pub async fn check_with_fallback(&self, query: &str) -> Result<CheckOutcome> {
    let query = query.trim();
    if query.is_empty() {
      return Err(Error::EmptyQuery);
    }

    let primary = self.check_fact(query).await?;
    let fallback = if primary.verdict.confidence.is_zero() {
      info!(rating = %primary.verdict.rating, "no usable result; trying fallback");
      Some(self.fallback_check(query).await?)
    } else {
      None
    };

    Ok(CheckOutcome { primary, fallback })
  }

  // ── History ───────────────────────────────────────────────────────────

  pub async fn history(&self) -> Result<Vec<FactCheckRecord>> {
    self.store.list().await.map_err(Error::store)
  }

  pub async fn delete(&self, id: Uuid) -> Result<()> {
    self.store.delete(id).await.map_err(Error::store)
  }

  pub async fn clear_history(&self) -> Result<()> {
    self.store.clear().await.map_err(Error::store)
  }
}
