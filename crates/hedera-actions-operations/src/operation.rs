use async_trait::async_trait;
use hedera_actions_ledger::{Transaction, TransactionId, TransactionReceipt, TransactionRecord};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::context::Context;
use crate::error::ActionError;
use crate::params::ParameterBag;

/// The normalized result of one operation on one item.
pub type OperationResult = Map<String, Value>;

/// One stateless ledger action.
#[async_trait]
pub trait Operation: Send + Sync {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError>;
}

/// Submit `transaction` and wait for its receipt. Any status but `SUCCESS`
/// fails the operation.
pub(crate) async fn submit(
  ctx: &Context,
  operation: &str,
  transaction: Transaction,
) -> Result<(TransactionId, TransactionReceipt), ActionError> {
  let kind = transaction.body().kind();
  let response = ctx
    .ledger()
    .execute(transaction)
    .await
    .map_err(|e| ActionError::ledger(operation, e))?;

  let receipt = ctx
    .ledger()
    .get_receipt(&response.transaction_id)
    .await
    .map_err(|e| ActionError::ledger(operation, e))?;

  if !receipt.status.is_success() {
    warn!(
      operation,
      kind,
      transaction_id = %response.transaction_id,
      status = %receipt.status,
      "transaction_rejected"
    );
    return Err(ActionError::operation(
      operation,
      format!("transaction finished with status {}", receipt.status),
    ));
  }

  debug!(operation, kind, transaction_id = %response.transaction_id, "transaction_succeeded");
  Ok((response.transaction_id, receipt))
}

/// Fetch the consensus record of an already successful transaction.
pub(crate) async fn record(
  ctx: &Context,
  operation: &str,
  transaction_id: &TransactionId,
) -> Result<TransactionRecord, ActionError> {
  ctx
    .ledger()
    .get_record(transaction_id)
    .await
    .map_err(|e| ActionError::ledger(operation, e))
}

/// Turn a `json!` object into an [`OperationResult`].
pub(crate) fn into_result(value: Value) -> OperationResult {
  match value {
    Value::Object(map) => map,
    other => {
      let mut map = Map::new();
      map.insert("value".to_string(), other);
      map
    }
  }
}
