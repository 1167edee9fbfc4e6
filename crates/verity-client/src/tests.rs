//! Orchestrator tests against a stub upstream and an in-memory store.

use std::{sync::{Arc, Mutex}, time::Duration};

use verity_core::{
  fallback::FALLBACK_SOURCE_NAME,
  record::{Rating, VerdictOrigin},
  store::CredentialStore,
  upstream::{Claim, ClaimReview, ClaimSearchResponse, Publisher},
};
use verity_store_sqlite::SqliteStore;

use tokio::{
  io::{AsyncReadExt, AsyncWriteExt},
  net::TcpListener,
  task::JoinHandle,
};

use crate::{
  upstream::{ClaimSearch, GoogleFactCheck, SearchRequest, SearchTarget},
  ApiKey, ClientConfig, Error, FactChecker, Result, UpstreamFailure,
};

// ─── Stub upstream ───────────────────────────────────────────────────────────

enum Reply {
  Body(ClaimSearchResponse),
  Status(u16),
  Malformed,
}

struct StubSearch {
  reply: Reply,
  seen:  Mutex<Vec<SearchRequest>>,
}

impl StubSearch {
  fn new(reply: Reply) -> Self { Self { reply, seen: Mutex::new(Vec::new()) } }

  fn requests(&self) -> Vec<SearchRequest> { self.seen.lock().unwrap().clone() }
}

impl ClaimSearch for StubSearch {
  async fn search(&self, request: SearchRequest) -> Result<ClaimSearchResponse> {
    self.seen.lock().unwrap().push(request);
    match &self.reply {
      Reply::Body(body) => Ok(body.clone()),
      Reply::Status(code) => Err(UpstreamFailure::from_status(*code).into()),
      Reply::Malformed => {
        let err = serde_json::from_str::<ClaimSearchResponse>("<html>").unwrap_err();
        Err(err.into())
      }
    }
  }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn reviewed(ratings: &[&str]) -> ClaimSearchResponse {
  ClaimSearchResponse {
    claims: vec![Claim {
      text: Some("5G towers spread viruses".into()),
      claimant: Some("Viral post".into()),
      claim_review: ratings
        .iter()
        .enumerate()
        .map(|(i, r)| ClaimReview {
          publisher: Some(Publisher { name: Some(format!("Publisher {i}")), site: None }),
          url: Some(format!("https://publisher{i}.example/review")),
          textual_rating: Some((*r).into()),
          ..ClaimReview::default()
        })
        .collect(),
      ..Claim::default()
    }],
    ..ClaimSearchResponse::default()
  }
}

async fn checker(reply: Reply) -> FactChecker<SqliteStore, StubSearch> {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  FactChecker::new(Arc::new(store), StubSearch::new(reply))
    .with_api_key(ApiKey::parse("test-key").unwrap())
    .with_fallback_delay(Duration::ZERO)
}

// ─── check_fact ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_key_fails_before_any_request() {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let c = FactChecker::new(store, StubSearch::new(Reply::Body(reviewed(&["False"]))));

  let err = c.check_fact("the earth is flat").await.unwrap_err();
  assert!(matches!(err, Error::MissingApiKey));
  assert!(c.upstream().requests().is_empty());
  assert!(c.history().await.unwrap().is_empty());
}

#[tokio::test]
async fn text_query_searches_claims() {
  let c = checker(Reply::Body(reviewed(&["False", "Misleading"]))).await;

  let rec = c.check_fact("the earth is flat").await.unwrap();
  assert!(!rec.is_url_query);
  assert_eq!(rec.verdict.rating, Rating::False);
  assert!((rec.verdict.confidence.value() - 0.7).abs() < 1e-9);
  assert_eq!(rec.verdict.sources.len(), 2);
  assert_eq!(rec.verdict.claim_text.as_deref(), Some("5G towers spread viruses"));
  assert_eq!(rec.verdict.primary_source_name.as_deref(), Some("Publisher 0"));

  let requests = c.upstream().requests();
  assert_eq!(requests.len(), 1);
  assert_eq!(requests[0].target, SearchTarget::Claim("the earth is flat".into()));
  assert_eq!(
    requests[0].query_params(),
    [("key", "test-key"), ("query", "the earth is flat")]
  );

  let history = c.history().await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].id, rec.id);
}

#[tokio::test]
async fn url_query_filters_by_site() {
  let c = checker(Reply::Body(ClaimSearchResponse::default())).await;

  let rec = c.check_fact("https://example.com/a").await.unwrap();
  assert!(rec.is_url_query);

  let requests = c.upstream().requests();
  assert_eq!(requests[0].target, SearchTarget::Site("https://example.com/a".into()));
  assert_eq!(requests[0].query_params()[1].0, "reviewPublisherSiteFilter");
}

#[tokio::test]
async fn empty_response_is_unknown_with_zero_confidence() {
  let c = checker(Reply::Body(ClaimSearchResponse::default())).await;

  let rec = c.check_fact("obscure claim").await.unwrap();
  assert_eq!(rec.verdict.rating, Rating::Unknown);
  assert!(rec.verdict.confidence.is_zero());
  assert!(rec.verdict.sources.is_empty());
}

#[tokio::test]
async fn upstream_status_failure_records_error() {
  for code in [400, 403, 500] {
    let c = checker(Reply::Status(code)).await;

    let rec = c.check_fact("anything").await.unwrap();
    assert_eq!(rec.verdict.rating, Rating::Error);
    assert!(rec.verdict.confidence.is_zero());
    assert!(rec.verdict.sources.is_empty());

    let history = c.history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].verdict.rating, Rating::Error);
  }
}

#[tokio::test]
async fn malformed_body_records_error() {
  let c = checker(Reply::Malformed).await;
  let rec = c.check_fact("anything").await.unwrap();
  assert_eq!(rec.verdict.rating, Rating::Error);
  assert_eq!(rec.verdict.origin, VerdictOrigin::Upstream);
}

// ─── Fallback ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fallback_check_is_tagged_and_persisted() {
  let c = checker(Reply::Status(500)).await;

  let rec = c.fallback_check("https://example.com/a").await.unwrap();
  assert!(rec.is_url_query);
  assert_eq!(rec.verdict.origin, VerdictOrigin::Fallback);
  assert_eq!(rec.verdict.primary_source_name.as_deref(), Some(FALLBACK_SOURCE_NAME));
  assert_eq!(rec.verdict.claim_text.as_deref(), Some("Content from this URL"));
  assert_eq!(rec.verdict.sources.len(), 3);
  assert!(rec.verdict.confidence.value() < 1.0);
  assert_ne!(rec.verdict.rating, Rating::Unknown);
  assert_ne!(rec.verdict.rating, Rating::Error);
  assert!(c.upstream().requests().is_empty());
  assert_eq!(c.history().await.unwrap()[0].id, rec.id);
}

#[tokio::test]
async fn zero_confidence_triggers_fallback() {
  let c = checker(Reply::Body(ClaimSearchResponse::default())).await;

  let outcome = c.check_with_fallback("  the earth is flat  ").await.unwrap();
  assert_eq!(outcome.primary.query, "the earth is flat");
  let fallback = outcome.fallback.as_ref().expect("fallback result");
  assert_eq!(fallback.verdict.claim_text.as_deref(), Some("the earth is flat"));
  assert_eq!(outcome.effective().id, fallback.id);
  assert!(!outcome.effective().verdict.is_authoritative());

  let history = c.history().await.unwrap();
  assert_eq!(history.len(), 2);
  assert_eq!(history[0].id, fallback.id);
  assert_eq!(history[1].id, outcome.primary.id);
}

#[tokio::test]
async fn upstream_error_triggers_fallback() {
  let c = checker(Reply::Status(403)).await;

  let outcome = c.check_with_fallback("claim").await.unwrap();
  assert_eq!(outcome.primary.verdict.rating, Rating::Error);
  assert!(outcome.fallback.is_some());
}

#[tokio::test]
async fn reviewed_claim_skips_fallback() {
  let c = checker(Reply::Body(reviewed(&["True"]))).await;

  let outcome = c.check_with_fallback("claim").await.unwrap();
  assert!(outcome.fallback.is_none());
  assert_eq!(outcome.effective().id, outcome.primary.id);
  assert_eq!(c.history().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unreviewed_claim_skips_fallback() {
  let c = checker(Reply::Body(reviewed(&[]))).await;

  let outcome = c.check_with_fallback("claim").await.unwrap();
  assert_eq!(outcome.primary.verdict.confidence.value(), 0.2);
  assert!(outcome.fallback.is_none());
}

#[tokio::test]
async fn blank_query_is_rejected() {
  let c = checker(Reply::Body(ClaimSearchResponse::default())).await;
  let err = c.check_with_fallback("   ").await.unwrap_err();
  assert!(matches!(err, Error::EmptyQuery));
  assert!(c.upstream().requests().is_empty());
}

// ─── History pass-through ────────────────────────────────────────────────────

#[tokio::test]
async fn delete_and_clear_history() {
  let c = checker(Reply::Body(reviewed(&["False"]))).await;
  let a = c.check_fact("a").await.unwrap();
  c.check_fact("b").await.unwrap();
  c.check_fact("c").await.unwrap();

  c.delete(a.id).await.unwrap();
  let queries: Vec<_> = c.history().await.unwrap().into_iter().map(|r| r.query).collect();
  assert_eq!(queries, ["c", "b"]);

  c.clear_history().await.unwrap();
  assert!(c.history().await.unwrap().is_empty());
}

// ─── Credentials ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn set_api_key_persists_trimmed_key() {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let mut c = FactChecker::new(store.clone(), StubSearch::new(Reply::Status(500)));
  assert!(!c.has_api_key());

  c.set_api_key("  fresh-key \n").await.unwrap();
  assert!(c.has_api_key());
  assert_eq!(store.load_api_key().await.unwrap().as_deref(), Some("fresh-key"));

  let mut other = FactChecker::new(store, StubSearch::new(Reply::Status(500)));
  assert!(other.reload_api_key().await.unwrap());
  other.check_fact("claim").await.unwrap();
  assert_eq!(other.upstream().requests()[0].api_key.expose(), "fresh-key");
}

#[tokio::test]
async fn blank_api_key_is_rejected() {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let mut c = FactChecker::new(store.clone(), StubSearch::new(Reply::Status(500)));

  assert!(matches!(c.set_api_key("   ").await, Err(Error::MissingApiKey)));
  assert_eq!(store.load_api_key().await.unwrap(), None);
}

#[tokio::test]
async fn from_config_prefers_configured_key() {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  store.save_api_key("persisted".into()).await.unwrap();

  let config = ClientConfig { api_key: Some("configured".into()), ..ClientConfig::default() };
  let c = FactChecker::from_config(&config, store.clone()).await.unwrap();
  assert_eq!(c.api_key().map(ApiKey::expose), Some("configured"));

  let config = ClientConfig::default();
  let c = FactChecker::from_config(&config, store.clone()).await.unwrap();
  assert_eq!(c.api_key().map(ApiKey::expose), Some("persisted"));

  store.clear_api_key().await.unwrap();
  let c = FactChecker::from_config(&config, store).await.unwrap();
  assert!(!c.has_api_key());
  assert!(c.api_key().is_none());
}

#[test]
fn status_classes() {
  assert_eq!(UpstreamFailure::from_status(400), UpstreamFailure::MalformedRequest);
  assert_eq!(UpstreamFailure::from_status(403), UpstreamFailure::Unauthorized);
  assert_eq!(UpstreamFailure::from_status(502), UpstreamFailure::Status(502));
}

// ─── HTTP transport ──────────────────────────────────────────────────────────

/// Serve a single canned HTTP response on a local port. The handle yields
/// the request line the client sent.
async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();

  let handle = tokio::spawn(async move {
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut head: Vec<u8> = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
      let n = socket.read(&mut buf).await.unwrap();
      if n == 0 {
        break;
      }
      head.extend_from_slice(&buf[..n]);
    }

    let reply = format!(
      "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: \
       {}\r\nConnection: close\r\n\r\n{body}",
      body.len(),
    );
    socket.write_all(reply.as_bytes()).await.unwrap();
    socket.shutdown().await.ok();

    let head = String::from_utf8_lossy(&head).into_owned();
    head.lines().next().unwrap_or_default().to_owned()
  });

  (format!("http://{addr}/v1alpha1/claims:search"), handle)
}

async fn search_once(
  status: u16,
  body: &'static str,
  query: &str,
) -> (Result<ClaimSearchResponse>, String) {
  let (endpoint, server) = serve_once(status, body).await;
  let client = GoogleFactCheck::new(endpoint, Duration::from_secs(5)).unwrap();
  let request = SearchRequest::new(ApiKey::parse("k").unwrap(), query);
  let result = client.search(request).await;
  (result, server.await.unwrap())
}

#[tokio::test]
async fn http_sends_text_query() {
  let (result, line) = search_once(200, r#"{"claims":[]}"#, "cats").await;
  assert!(result.unwrap().claims.is_empty());
  assert!(line.starts_with("GET /v1alpha1/claims:search?"), "{line}");
  assert!(line.contains("key=k&query=cats"), "{line}");
}

#[tokio::test]
async fn http_sends_site_filter_for_url() {
  let (_, line) = search_once(200, "{}", "https://x.com/a").await;
  assert!(line.contains("key=k&reviewPublisherSiteFilter=https%3A%2F%2Fx.com%2Fa"), "{line}");
  assert!(!line.contains("query="), "{line}");
}

#[tokio::test]
async fn http_parses_claims() {
  let body = r#"{"claims":[{"text":"Cats can fly","claimReview":[
    {"publisher":{"name":"Snopes"},"textualRating":"False"}]}]}"#;
  let (result, _) = search_once(200, body, "cats").await;
  let response = result.unwrap();
  assert_eq!(response.claims.len(), 1);
  assert_eq!(response.claims[0].text.as_deref(), Some("Cats can fly"));
  assert_eq!(response.claims[0].claim_review.len(), 1);
}

#[tokio::test]
async fn http_status_maps_to_failure() {
  for (status, expected) in [
    (400, UpstreamFailure::MalformedRequest),
    (403, UpstreamFailure::Unauthorized),
    (503, UpstreamFailure::Status(503)),
  ] {
    let (result, _) = search_once(status, r#"{"error":{}}"#, "cats").await;
    match result {
      Err(Error::UpstreamRequest(failure)) => assert_eq!(failure, expected),
      other => panic!("status {status}: unexpected {other:?}"),
    }
  }
}

#[tokio::test]
async fn http_non_json_body_is_parse_error() {
  let (result, _) = search_once(200, "<html>oops</html>", "cats").await;
  assert!(matches!(result, Err(Error::UpstreamParse(_))), "{result:?}");
}
