use async_trait::async_trait;
use hedera_actions_ledger::{Transaction, TransactionBody};
use serde_json::json;

use super::MAX_MESSAGE_BYTES;
use crate::context::Context;
use crate::error::ActionError;
use crate::operation::{Operation, OperationResult, into_result, record, submit};
use crate::params::ParameterBag;

const NAME: &str = "submitMessage";

/// Submit one message to a topic.
///
/// When `submitKey` is given the transaction is signed with it in addition to
/// the operator key.
pub(crate) struct SubmitMessage;

#[async_trait]
impl Operation for SubmitMessage {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    let topic_id = params.entity_id("topicId")?;
    let message = match params.verbatim("message") {
      Some(serde_json::Value::String(s)) => s.clone(),
      Some(other) => other.to_string(),
      None => return Err(ActionError::validation("message", "is required")),
    };

    let size = message.len();
    if size > MAX_MESSAGE_BYTES {
      return Err(ActionError::validation(
        "message",
        format!(
          "message is {} bytes, the maximum is {} bytes",
          size, MAX_MESSAGE_BYTES
        ),
      ));
    }

    let submit_key = params.optional_private_key("submitKey")?;

    let mut transaction = Transaction::new(TransactionBody::TopicMessageSubmit {
      topic_id,
      message: message.clone(),
    });
    if let Some(key) = submit_key {
      transaction = transaction.sign(key);
    }

    let (transaction_id, receipt) = submit(ctx, NAME, transaction).await?;
    let sequence_number = receipt
      .topic_sequence_number
      .ok_or_else(|| ActionError::operation(NAME, "receipt carries no sequence number"))?;
    let record = record(ctx, NAME, &transaction_id).await?;

    Ok(into_result(json!({
      "status": receipt.status.as_str(),
      "topicId": topic_id.to_string(),
      "message": message,
      "messageSize": size,
      "sequenceNumber": sequence_number,
      "consensusTimestamp": record.consensus_timestamp,
      "transactionId": transaction_id.to_string(),
    })))
  }
}
