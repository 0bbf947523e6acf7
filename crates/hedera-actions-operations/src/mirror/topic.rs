use async_trait::async_trait;
use serde_json::{Map, Value, json};

use super::{DEFAULT_MESSAGE_LIMIT, array, decode_text, expect_object, integer, page_limit, text};
use crate::context::Context;
use crate::error::ActionError;
use crate::operation::{Operation, OperationResult, into_result};
use crate::params::ParameterBag;

/// Map one mirror topic message, decoding its base64 contents.
pub(super) fn topic_message(message: &Map<String, Value>) -> Value {
  json!({
    "sequenceNumber": integer(message.get("sequence_number")),
    "consensusTimestamp": text(message, "consensus_timestamp"),
    "runningHash": text(message, "running_hash"),
    "payerAccountId": text(message, "payer_account_id"),
    "contents": decode_text(&text(message, "message")),
  })
}

/// The `messages` array of a mirror response.
pub(super) fn topic_messages(data: &Map<String, Value>) -> Vec<&Map<String, Value>> {
  array(data, "messages")
    .iter()
    .filter_map(Value::as_object)
    .collect()
}

/// A page of topic messages, oldest first.
pub(crate) struct TopicMessages;

#[async_trait]
impl Operation for TopicMessages {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    let topic_id = params.entity_id("topicId")?;
    let limit = page_limit(params, "limit", DEFAULT_MESSAGE_LIMIT)?;
    let sequence_from = params.optional_u64("sequenceFrom")?.filter(|s| *s > 0);

    let mut path = format!("/api/v1/topics/{}/messages?limit={}", topic_id, limit);
    if let Some(start) = sequence_from {
      path.push_str(&format!("&sequenceNumber=gte:{}", start));
    }
    let data = expect_object(ctx.mirror().get_json(&path).await?, &path)?;

    let messages: Vec<Value> = topic_messages(&data)
      .into_iter()
      .map(topic_message)
      .collect();

    Ok(into_result(json!({
      "topicId": topic_id.to_string(),
      "messageCount": messages.len(),
      "messages": messages,
      "limit": limit,
      "sequenceFrom": sequence_from,
    })))
  }
}
