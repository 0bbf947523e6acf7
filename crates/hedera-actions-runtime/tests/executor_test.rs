use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hedera_actions_config::{ActionDef, Network};
use hedera_actions_ledger::{
  EntityId, LedgerClient, LedgerError, Operator, PrivateKey, Status, Transaction, TransactionBody,
  TransactionId, TransactionReceipt, TransactionRecord, TransactionResponse,
};
use hedera_actions_operations::{Context, Registry, StaticParameters};
use hedera_actions_runtime::{BatchError, ItemExecutor, OutputItem};
use serde_json::json;
use tokio_util::sync::CancellationToken;

/// Ledger double that accepts everything and numbers topic messages.
struct RecordingLedger {
  operator: Operator,
  submitted: Mutex<Vec<Transaction>>,
}

impl RecordingLedger {
  fn new() -> Self {
    Self {
      operator: Operator::new(EntityId::new(0, 0, 1001), PrivateKey::generate_ed25519()),
      submitted: Mutex::new(Vec::new()),
    }
  }

  fn topics(&self) -> Vec<String> {
    self
      .submitted
      .lock()
      .unwrap()
      .iter()
      .filter_map(|tx| match tx.body() {
        TransactionBody::TopicMessageSubmit { topic_id, .. } => Some(topic_id.to_string()),
        _ => None,
      })
      .collect()
  }
}

#[async_trait]
impl LedgerClient for RecordingLedger {
  fn network(&self) -> Network {
    Network::Testnet
  }

  fn operator(&self) -> &Operator {
    &self.operator
  }

  async fn execute(&self, transaction: Transaction) -> Result<TransactionResponse, LedgerError> {
    let mut submitted = self.submitted.lock().unwrap();
    submitted.push(transaction);
    Ok(TransactionResponse {
      transaction_id: TransactionId(format!("0.0.1001@1700000000.{:09}", submitted.len())),
    })
  }

  async fn get_receipt(
    &self,
    transaction_id: &TransactionId,
  ) -> Result<TransactionReceipt, LedgerError> {
    let sequence = transaction_id.0.rsplit('.').next().and_then(|n| n.parse().ok());
    Ok(TransactionReceipt {
      topic_sequence_number: sequence,
      ..TransactionReceipt::with_status(Status::success())
    })
  }

  async fn get_record(
    &self,
    _transaction_id: &TransactionId,
  ) -> Result<TransactionRecord, LedgerError> {
    Ok(TransactionRecord {
      consensus_timestamp: Some("1700000001.000000001".to_string()),
    })
  }
}

fn submit_action(topics: &[&str]) -> ActionDef {
  serde_json::from_value(json!({
    "parameters": {
      "resource": "consensus",
      "consensusOperation": "submitMessage",
      "topicId": "{{ topic }}",
      "message": "reading {{ value }}"
    },
    "items": topics
      .iter()
      .enumerate()
      .map(|(i, t)| json!({ "topic": t, "value": i }))
      .collect::<Vec<_>>()
  }))
  .unwrap()
}

fn executor(ledger: &Arc<RecordingLedger>) -> ItemExecutor {
  ItemExecutor::new(Arc::new(Registry::new()), Context::new(ledger.clone()))
}

#[tokio::test]
async fn test_continue_on_fail_keeps_item_positions() {
  let ledger = Arc::new(RecordingLedger::new());
  let executor = executor(&ledger).continue_on_fail(true);

  let result = executor
    .run_action(&submit_action(&["0.0.5", "not-a-topic", "0.0.6"]))
    .await
    .unwrap();

  assert_eq!(result.items.len(), 3);
  assert_eq!(result.failed_count(), 1);
  assert_eq!(result.items[0].json["message"], "reading 0");
  assert_eq!(result.items[0].json["topicId"], "0.0.5");
  assert!(result.items[1].is_failure());
  assert!(
    result.items[1].json["error"]
      .as_str()
      .unwrap()
      .contains("topicId")
  );
  assert_eq!(result.items[2].json["topicId"], "0.0.6");
  assert_eq!(result.items[2].json["message"], "reading 2");
  assert_eq!(ledger.topics(), vec!["0.0.5", "0.0.6"]);
}

#[tokio::test]
async fn test_failure_aborts_batch() {
  let ledger = Arc::new(RecordingLedger::new());
  let executor = executor(&ledger);

  let err = executor
    .run_action(&submit_action(&["0.0.5", "not-a-topic", "0.0.6"]))
    .await
    .unwrap_err();

  assert_eq!(err.item_index(), Some(1));
  assert!(matches!(err, BatchError::Item { index: 1, .. }));
  // The third item is never attempted.
  assert_eq!(ledger.topics(), vec!["0.0.5"]);
}

#[tokio::test]
async fn test_concurrent_batch_keeps_input_order() {
  let ledger = Arc::new(RecordingLedger::new());
  let executor = executor(&ledger).concurrency(4);
  let topics: Vec<String> = (1..=10).map(|n| format!("0.0.{}", n)).collect();
  let refs: Vec<&str> = topics.iter().map(String::as_str).collect();

  let result = executor.run_action(&submit_action(&refs)).await.unwrap();

  let seen: Vec<&str> = result
    .items
    .iter()
    .map(|i| i.json["topicId"].as_str().unwrap())
    .collect();
  assert_eq!(seen, refs);
  assert_eq!(result.failed_count(), 0);
}

#[tokio::test]
async fn test_unknown_resource_and_operation() {
  let ledger = Arc::new(RecordingLedger::new());
  let executor = executor(&ledger).continue_on_fail(true);
  let source = StaticParameters::with_items(
    json!({}),
    vec![
      json!({ "resource": "file" }),
      json!({ "resource": "token", "tokenOperation": "burn" }),
      json!({ "resource": "token" }),
    ],
  );

  let result = executor.run(&source, 3).await.unwrap();
  assert_eq!(
    result.items[0],
    OutputItem::failure("unsupported resource: file")
  );
  assert!(result.items[1].json["error"].as_str().unwrap().contains("burn"));
  assert!(
    result.items[2].json["error"]
      .as_str()
      .unwrap()
      .contains("tokenOperation")
  );
  assert!(ledger.topics().is_empty());
}

#[tokio::test]
async fn test_cancelled_batch() {
  let ledger = Arc::new(RecordingLedger::new());
  let cancel = CancellationToken::new();
  let ctx = Context::new(ledger.clone()).with_cancel(cancel.clone());
  let executor = ItemExecutor::new(Arc::new(Registry::new()), ctx);
  cancel.cancel();

  let err = executor
    .run_action(&submit_action(&["0.0.5"]))
    .await
    .unwrap_err();
  assert!(matches!(err, BatchError::Cancelled));
  assert!(ledger.topics().is_empty());
}

#[tokio::test]
async fn test_empty_items_run_once() {
  let ledger = Arc::new(RecordingLedger::new());
  let executor = executor(&ledger);
  let action: ActionDef = serde_json::from_value(json!({
    "parameters": {
      "resource": "consensus",
      "consensusOperation": "submitMessage",
      "topicId": "0.0.5",
      "message": "static"
    }
  }))
  .unwrap();

  let result = executor.run_action(&action).await.unwrap();
  assert_eq!(result.items.len(), 1);
  assert_eq!(result.items[0].json["sequenceNumber"], 1);
}
