#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hedera_actions_config::{Network, WatchSettings};
use hedera_actions_ledger::{
  EntityId, LedgerClient, LedgerError, Operator, PrivateKey, Status, Transaction, TransactionId,
  TransactionReceipt, TransactionRecord, TransactionResponse,
};
use hedera_actions_mirror::{MirrorClient, MirrorError};
use hedera_actions_operations::{
  ActionError, Context, OperationResult, ParameterSource, Registry,
};
use serde_json::Value;

pub const PAYER: &str = "0.0.1001";

/// In-memory ledger that accepts every transaction and answers with scripted
/// receipts (successful ones by default).
pub struct MockLedger {
  network: Network,
  operator: Operator,
  submitted: Mutex<Vec<Transaction>>,
  receipts: Mutex<VecDeque<TransactionReceipt>>,
}

impl MockLedger {
  pub fn new() -> Self {
    Self::on(Network::Testnet)
  }

  pub fn on(network: Network) -> Self {
    Self {
      network,
      operator: Operator::new(EntityId::new(0, 0, 1001), PrivateKey::generate_ed25519()),
      submitted: Mutex::new(Vec::new()),
      receipts: Mutex::new(VecDeque::new()),
    }
  }

  /// Queue the receipt for the next transaction.
  pub fn respond_with(&self, receipt: TransactionReceipt) {
    self.receipts.lock().unwrap().push_back(receipt);
  }

  pub fn submitted(&self) -> Vec<Transaction> {
    self.submitted.lock().unwrap().clone()
  }
}

#[async_trait]
impl LedgerClient for MockLedger {
  fn network(&self) -> Network {
    self.network
  }

  fn operator(&self) -> &Operator {
    &self.operator
  }

  async fn execute(&self, transaction: Transaction) -> Result<TransactionResponse, LedgerError> {
    let mut submitted = self.submitted.lock().unwrap();
    submitted.push(transaction);
    Ok(TransactionResponse {
      transaction_id: TransactionId(format!("{}@1700000000.{:09}", PAYER, submitted.len())),
    })
  }

  async fn get_receipt(
    &self,
    _transaction_id: &TransactionId,
  ) -> Result<TransactionReceipt, LedgerError> {
    Ok(
      self
        .receipts
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| TransactionReceipt::with_status(Status::success())),
    )
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

/// Mirror double answering from a table of path → responses. The last
/// response queued for a path keeps being returned; unknown paths are 404.
pub struct FakeMirror {
  responses: Mutex<HashMap<String, VecDeque<Value>>>,
  calls: Mutex<Vec<String>>,
}

impl FakeMirror {
  pub fn new() -> Self {
    Self {
      responses: Mutex::new(HashMap::new()),
      calls: Mutex::new(Vec::new()),
    }
  }

  pub fn respond(&self, path: &str, body: Value) {
    self
      .responses
      .lock()
      .unwrap()
      .entry(path.to_string())
      .or_default()
      .push_back(body);
  }

  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().unwrap().clone()
  }
}

#[async_trait]
impl MirrorClient for FakeMirror {
  fn base_url(&self) -> &str {
    "http://mirror.test"
  }

  async fn get_json(&self, path: &str) -> Result<Value, MirrorError> {
    self.calls.lock().unwrap().push(path.to_string());
    let mut responses = self.responses.lock().unwrap();
    match responses.get_mut(path) {
      Some(queue) if queue.len() > 1 => Ok(queue.pop_front().unwrap()),
      Some(queue) if !queue.is_empty() => Ok(queue[0].clone()),
      _ => Err(MirrorError::Status {
        status: 404,
        url: format!("http://mirror.test{}", path),
        body: r#"{"_status":{"messages":[{"message":"Not found"}]}}"#.to_string(),
      }),
    }
  }
}

pub struct Harness {
  pub registry: Registry,
  pub ledger: Arc<MockLedger>,
  pub mirror: Arc<FakeMirror>,
  pub ctx: Context,
}

impl Harness {
  pub fn new() -> Self {
    Self::with_watch(WatchSettings::default())
  }

  pub fn with_watch(watch: WatchSettings) -> Self {
    let ledger = Arc::new(MockLedger::new());
    let mirror = Arc::new(FakeMirror::new());
    let ctx = Context::from_parts(ledger.clone(), mirror.clone()).with_watch(watch);
    Self {
      registry: Registry::new(),
      ledger,
      mirror,
      ctx,
    }
  }

  /// Extract and execute one operation for item 0.
  pub async fn run(
    &self,
    resource: &str,
    operation: &str,
    source: &dyn ParameterSource,
  ) -> Result<OperationResult, ActionError> {
    let service = self.registry.get_service(resource)?;
    let params = service.extract_parameters(operation, source, 0, self.ctx.payer())?;
    service.execute(operation, &params, &self.ctx).await
  }
}
