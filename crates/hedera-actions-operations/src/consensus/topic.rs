use async_trait::async_trait;
use hedera_actions_ledger::{Transaction, TransactionBody};
use serde_json::json;
use tracing::info;

use super::MAX_MEMO_BYTES;
use crate::context::Context;
use crate::error::ActionError;
use crate::operation::{Operation, OperationResult, into_result, record, submit};
use crate::params::ParameterBag;

const NAME: &str = "createTopic";

/// Create a consensus topic, public unless `enableSubmitKey` is set.
pub(crate) struct CreateTopic;

#[async_trait]
impl Operation for CreateTopic {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    let memo = params.optional_str("topicMemo");
    let memo_size = memo.as_ref().map_or(0, String::len);
    if memo_size > MAX_MEMO_BYTES {
      return Err(ActionError::validation(
        "topicMemo",
        format!(
          "memo is {} bytes, the maximum is {} bytes",
          memo_size, MAX_MEMO_BYTES
        ),
      ));
    }
    let restricted = params.bool_or("enableSubmitKey", false);

    let transaction = Transaction::new(TransactionBody::TopicCreate {
      memo: memo.clone(),
      submit_key: restricted.then(|| ctx.operator().public_key),
    });

    let (transaction_id, receipt) = submit(ctx, NAME, transaction).await?;
    let topic_id = receipt
      .topic_id
      .ok_or_else(|| ActionError::operation(NAME, "receipt carries no topic id"))?;
    let record = record(ctx, NAME, &transaction_id).await?;

    info!(topic_id = %topic_id, public = !restricted, "topic_created");

    Ok(into_result(json!({
      "status": receipt.status.as_str(),
      "topicId": topic_id.to_string(),
      "transactionId": transaction_id.to_string(),
      "consensusTimestamp": record.consensus_timestamp,
      "topicMemo": memo.unwrap_or_default(),
      "isPublic": !restricted,
    })))
  }
}
