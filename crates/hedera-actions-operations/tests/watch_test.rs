mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::{Harness, MockLedger};
use hedera_actions_config::WatchSettings;
use hedera_actions_mirror::{MirrorClient, MirrorError};
use hedera_actions_operations::{
  ActionError, Context, OperationResult, Registry, StaticParameters,
};
use serde_json::json;

const LATEST: &str = "/api/v1/topics/0.0.5005/messages?limit=1&order=desc";

fn harness(max_wait_ms: u64) -> Harness {
  Harness::with_watch(WatchSettings {
    max_wait_ms,
    poll_interval_ms: 10,
  })
}

fn page(sequences: &[u64]) -> serde_json::Value {
  let messages: Vec<_> = sequences
    .iter()
    .map(|s| {
      json!({
        "sequence_number": s,
        "consensus_timestamp": format!("1700000000.{:09}", s),
        "message": "cGluZw=="
      })
    })
    .collect();
  json!({ "messages": messages })
}

/// Mirror that answers the latest-message lookup at once (unless told to
/// stall on it too) and hangs on every other request.
struct StallingMirror {
  stall_latest: bool,
}

#[async_trait]
impl MirrorClient for StallingMirror {
  fn base_url(&self) -> &str {
    "http://mirror.test"
  }

  async fn get_json(&self, path: &str) -> Result<serde_json::Value, MirrorError> {
    if path != LATEST || self.stall_latest {
      tokio::time::sleep(Duration::from_secs(30)).await;
    }
    Ok(page(&[4]))
  }
}

async fn run_stalled(stall_latest: bool) -> (OperationResult, Duration) {
  let ctx = Context::from_parts(
    Arc::new(MockLedger::new()),
    Arc::new(StallingMirror { stall_latest }),
  )
  .with_watch(WatchSettings {
    max_wait_ms: 200,
    poll_interval_ms: 10,
  });
  let registry = Registry::new();
  let service = registry.get_service("mirror").unwrap();
  let source = StaticParameters::new(json!({ "topicId": "0.0.5005" }));
  let params = service
    .extract_parameters("watchTopicMessages", &source, 0, ctx.payer())
    .unwrap();

  let started = Instant::now();
  let result = service
    .execute("watchTopicMessages", &params, &ctx)
    .await
    .unwrap();
  (result, started.elapsed())
}

#[tokio::test]
async fn test_watch_deadline_bounds_stalled_poll() {
  let (result, elapsed) = run_stalled(false).await;

  assert_eq!(result["stopReason"], "timeout");
  assert_eq!(result["messageCount"], 0);
  assert!(elapsed >= Duration::from_millis(200));
  assert!(elapsed < Duration::from_secs(5), "watch blocked for {:?}", elapsed);
}

#[tokio::test]
async fn test_watch_deadline_bounds_stalled_latest_lookup() {
  let (result, elapsed) = run_stalled(true).await;

  assert_eq!(result["stopReason"], "timeout");
  assert_eq!(result["messageCount"], 0);
  assert!(elapsed < Duration::from_secs(5), "watch blocked for {:?}", elapsed);
}

#[tokio::test]
async fn test_watch_stops_at_limit() {
  let h = harness(5_000);
  h.mirror.respond(LATEST, page(&[4]));
  h.mirror.respond(
    "/api/v1/topics/0.0.5005/messages?limit=2&sequenceNumber=gt:4",
    page(&[5]),
  );
  h.mirror.respond(
    "/api/v1/topics/0.0.5005/messages?limit=1&sequenceNumber=gt:5",
    page(&[6]),
  );
  let source = StaticParameters::new(json!({ "topicId": "0.0.5005", "messageLimit": 2 }));

  let result = h.run("mirror", "watchTopicMessages", &source).await.unwrap();
  assert_eq!(result["stopReason"], "limit");
  assert_eq!(result["messageCount"], 2);
  assert_eq!(result["messages"][0]["sequenceNumber"], 5);
  assert_eq!(result["messages"][1]["sequenceNumber"], 6);
  assert_eq!(result["messages"][1]["contents"], "ping");

  let calls = h.mirror.calls();
  assert_eq!(calls[0], LATEST);
  assert_eq!(
    calls.last().unwrap(),
    "/api/v1/topics/0.0.5005/messages?limit=1&sequenceNumber=gt:5"
  );
}

#[tokio::test]
async fn test_watch_times_out_with_partial_results() {
  let h = harness(100);
  h.mirror.respond(LATEST, page(&[]));
  h.mirror.respond(
    "/api/v1/topics/0.0.5005/messages?limit=10&sequenceNumber=gt:0",
    page(&[1]),
  );
  h.mirror.respond(
    "/api/v1/topics/0.0.5005/messages?limit=9&sequenceNumber=gt:1",
    page(&[]),
  );
  let source = StaticParameters::new(json!({ "topicId": "0.0.5005" }));

  let started = Instant::now();
  let result = h.run("mirror", "watchTopicMessages", &source).await.unwrap();

  assert_eq!(result["stopReason"], "timeout");
  assert_eq!(result["messageCount"], 1);
  assert!(result["waitedMs"].as_u64().unwrap() >= 100);
  assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_watch_wait_is_capped_by_settings() {
  let h = harness(50);
  h.mirror.respond(LATEST, page(&[]));
  h.mirror.respond(
    "/api/v1/topics/0.0.5005/messages?limit=10&sequenceNumber=gt:0",
    page(&[]),
  );
  let source = StaticParameters::new(json!({ "topicId": "0.0.5005", "maxWaitSeconds": 3600 }));

  let started = Instant::now();
  let result = h.run("mirror", "watchTopicMessages", &source).await.unwrap();
  assert_eq!(result["stopReason"], "timeout");
  assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_watch_from_sequence_skips_latest_lookup() {
  let h = harness(5_000);
  h.mirror.respond(
    "/api/v1/topics/0.0.5005/messages?limit=3&sequenceNumber=gt:2",
    page(&[3, 4, 5]),
  );
  let source = StaticParameters::new(json!({
    "topicId": "0.0.5005",
    "messageLimit": 3,
    "sequenceFrom": 3
  }));

  let result = h.run("mirror", "watchTopicMessages", &source).await.unwrap();
  assert_eq!(result["stopReason"], "limit");
  assert_eq!(result["messages"][0]["sequenceNumber"], 3);
  assert_eq!(h.mirror.calls().len(), 1);
}

#[tokio::test]
async fn test_watch_cancelled() {
  let h = harness(10_000);
  h.mirror.respond(LATEST, page(&[7]));
  h.mirror.respond(
    "/api/v1/topics/0.0.5005/messages?limit=10&sequenceNumber=gt:7",
    page(&[]),
  );
  let cancel = h.ctx.cancel().clone();
  tokio::spawn(async move {
    tokio::time::sleep(Duration::from_millis(30)).await;
    cancel.cancel();
  });
  let source = StaticParameters::new(json!({ "topicId": "0.0.5005" }));

  let started = Instant::now();
  let result = h.run("mirror", "watchTopicMessages", &source).await.unwrap();
  assert_eq!(result["stopReason"], "cancelled");
  assert_eq!(result["messageCount"], 0);
  assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_watch_poll_failure_is_error() {
  let h = harness(5_000);
  h.mirror.respond(LATEST, page(&[1]));
  let source = StaticParameters::new(json!({ "topicId": "0.0.5005" }));

  let err = h.run("mirror", "watchTopicMessages", &source).await.unwrap_err();
  assert!(matches!(err, ActionError::Upstream { status: Some(404), .. }));
}

#[tokio::test]
async fn test_watch_rejects_non_positive_wait() {
  let h = harness(5_000);
  let source = StaticParameters::new(json!({ "topicId": "0.0.5005", "maxWaitSeconds": 0 }));

  let err = h.run("mirror", "watchTopicMessages", &source).await.unwrap_err();
  assert!(matches!(err, ActionError::Validation { ref field, .. } if field == "maxWaitSeconds"));
  assert!(h.mirror.calls().is_empty());
}
