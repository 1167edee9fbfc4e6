//! The upstream claim-search seam and its HTTP implementation.

use std::{future::Future, time::Duration};

use reqwest::Client;
use verity_core::{query::QueryKind, upstream::ClaimSearchResponse};

use crate::{credentials::ApiKey, settings::ClientConfig, Error, Result, UpstreamFailure};

pub const DEFAULT_ENDPOINT: &str =
  "https://factchecktools.googleapis.com/v1alpha1/claims:search";

// ─── Request ─────────────────────────────────────────────────────────────────

/// What a search asks the upstream service for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
  /// Free-text claim search (`query=`).
  Claim(String),
  /// Reviews published on a site (`reviewPublisherSiteFilter=`).
  Site(String),
}

/// A single claim-search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
  pub api_key: ApiKey,
  pub target:  SearchTarget,
}

impl SearchRequest {
  /// Build a request for `query`, choosing the target by [`QueryKind`].
  pub fn new(api_key: ApiKey, query: &str) -> Self {
    let target = match QueryKind::detect(query) {
      QueryKind::Url => SearchTarget::Site(query.to_owned()),
      QueryKind::Text => SearchTarget::Claim(query.to_owned()),
    };
    Self { api_key, target }
  }

  pub fn kind(&self) -> QueryKind {
    match self.target {
      SearchTarget::Claim(_) => QueryKind::Text,
      SearchTarget::Site(_) => QueryKind::Url,
    }
  }

  /// URL query parameters for this request.
  pub fn query_params(&self) -> [(&'static str, &str); 2] {
    let target = match &self.target {
      SearchTarget::Claim(q) => ("query", q.as_str()),
      SearchTarget::Site(s) => ("reviewPublisherSiteFilter", s.as_str()),
    };
    [("key", self.api_key.expose()), target]
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the upstream fact-check search service.
///
/// Implementations issue exactly one request per call and map non-2xx
/// responses to [`Error::UpstreamRequest`] and undecodable bodies to
/// [`Error::UpstreamParse`].
pub trait ClaimSearch: Send + Sync {
  fn search(
    &self,
    request: SearchRequest,
  ) -> impl Future<Output = Result<ClaimSearchResponse>> + Send + '_;
}

// ─── HTTP implementation ─────────────────────────────────────────────────────

/// Google Fact Check Tools `claims:search` over HTTPS.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GoogleFactCheck {
  client:   Client,
  endpoint: String,
}

impl GoogleFactCheck {
  pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, endpoint: endpoint.into() })
  }

  pub fn from_config(config: &ClientConfig) -> Result<Self> {
    Self::new(config.endpoint.clone(), config.request_timeout())
  }
}

impl ClaimSearch for GoogleFactCheck {
  async fn search(&self, request: SearchRequest) -> Result<ClaimSearchResponse> {
    tracing::debug!(kind = ?request.kind(), "GET claims:search");

    let resp = self
      .client
      .get(&self.endpoint)
      .query(&request.query_params())
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      return Err(Error::UpstreamRequest(UpstreamFailure::from_status(status.as_u16())));
    }

    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
  }
}
