use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use hedera_actions_ledger::TopicId;
use serde_json::{Value, json};
use tokio::time::Instant;
use tracing::{debug, info};

use super::topic::{topic_message, topic_messages};
use super::{DEFAULT_MESSAGE_LIMIT, expect_object, integer, page_limit};
use crate::context::Context;
use crate::error::ActionError;
use crate::operation::{Operation, OperationResult, into_result};
use crate::params::ParameterBag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
  Limit,
  Timeout,
  Cancelled,
  Failed,
}

impl fmt::Display for StopReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      StopReason::Limit => "limit",
      StopReason::Timeout => "timeout",
      StopReason::Cancelled => "cancelled",
      StopReason::Failed => "failed",
    })
  }
}

/// Polling subscription to a topic, tracking the last delivered sequence
/// number.
struct Subscription {
  topic_id: TopicId,
  last_sequence: u64,
  open: bool,
}

impl Subscription {
  fn open(topic_id: TopicId, last_sequence: u64) -> Self {
    debug!(topic_id = %topic_id, after = last_sequence, "topic_subscribed");
    Self {
      topic_id,
      last_sequence,
      open: true,
    }
  }

  fn next_path(&self, remaining: u64) -> String {
    format!(
      "/api/v1/topics/{}/messages?limit={}&sequenceNumber=gt:{}",
      self.topic_id, remaining, self.last_sequence
    )
  }

  fn unsubscribe(&mut self, reason: StopReason) {
    if self.open {
      self.open = false;
      info!(
        topic_id = %self.topic_id,
        last_sequence = self.last_sequence,
        reason = %reason,
        "topic_unsubscribed"
      );
    }
  }
}

/// Wait for new topic messages until `limit` arrived, the maximum wait
/// elapsed, or the batch is cancelled; whatever arrived is returned.
///
/// Without `sequenceFrom` only messages newer than the latest one at
/// subscription time are collected.
pub(crate) struct WatchTopicMessages;

impl WatchTopicMessages {
  fn max_wait(params: &ParameterBag, ctx: &Context) -> Result<Duration, ActionError> {
    let ceiling = ctx.watch().max_wait_ms;
    let requested = match params.optional_f64("maxWaitSeconds")? {
      Some(secs) if secs <= 0.0 => {
        return Err(ActionError::validation(
          "maxWaitSeconds",
          "must be greater than zero",
        ));
      }
      Some(secs) => ((secs * 1000.0).round() as u64).min(ceiling),
      None => ceiling,
    };
    Ok(Duration::from_millis(requested))
  }

  async fn latest_sequence(ctx: &Context, topic_id: TopicId) -> Result<u64, ActionError> {
    let path = format!("/api/v1/topics/{}/messages?limit=1&order=desc", topic_id);
    let data = expect_object(ctx.mirror().get_json(&path).await?, &path)?;
    Ok(
      topic_messages(&data)
        .first()
        .and_then(|m| integer(m.get("sequence_number")))
        .map_or(0, |s| s.max(0) as u64),
    )
  }

  /// Poll until the limit, the deadline or cancellation. Every mirror call is
  /// raced against the deadline.
  async fn poll(
    ctx: &Context,
    subscription: &mut Subscription,
    limit: u64,
    deadline: Instant,
    poll_interval: Duration,
    collected: &mut Vec<Value>,
  ) -> Result<StopReason, ActionError> {
    loop {
      let remaining = limit - collected.len() as u64;
      let path = subscription.next_path(remaining);

      let page = tokio::select! {
        biased;
        _ = ctx.cancel().cancelled() => return Ok(StopReason::Cancelled),
        _ = tokio::time::sleep_until(deadline) => return Ok(StopReason::Timeout),
        page = ctx.mirror().get_json(&path) => page?,
      };
      let data = expect_object(page, &path)?;

      for message in topic_messages(&data).into_iter().take(remaining as usize) {
        if let Some(sequence) = integer(message.get("sequence_number")) {
          subscription.last_sequence = subscription.last_sequence.max(sequence.max(0) as u64);
        }
        collected.push(topic_message(message));
      }

      if collected.len() as u64 >= limit {
        return Ok(StopReason::Limit);
      }

      let next = (Instant::now() + poll_interval).min(deadline);
      tokio::select! {
        biased;
        _ = ctx.cancel().cancelled() => return Ok(StopReason::Cancelled),
        _ = tokio::time::sleep_until(next) => {}
      }
    }
  }
}

#[async_trait]
impl Operation for WatchTopicMessages {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    let topic_id = params.entity_id("topicId")?;
    let limit = page_limit(params, "limit", DEFAULT_MESSAGE_LIMIT)?;
    let max_wait = Self::max_wait(params, ctx)?;
    let poll_interval = Duration::from_millis(ctx.watch().poll_interval_ms.max(1));

    let started = Instant::now();
    let deadline = started + max_wait;
    let mut collected: Vec<Value> = Vec::new();

    let start = match params.optional_u64("sequenceFrom")?.filter(|s| *s > 0) {
      Some(from) => Ok(from - 1),
      None => tokio::select! {
        biased;
        _ = ctx.cancel().cancelled() => Err(StopReason::Cancelled),
        _ = tokio::time::sleep_until(deadline) => Err(StopReason::Timeout),
        latest = Self::latest_sequence(ctx, topic_id) => Ok(latest?),
      },
    };

    let reason = match start {
      Ok(start) => {
        let mut subscription = Subscription::open(topic_id, start);
        let polled = Self::poll(
          ctx,
          &mut subscription,
          limit,
          deadline,
          poll_interval,
          &mut collected,
        )
        .await;
        match polled {
          Ok(reason) => {
            subscription.unsubscribe(reason);
            reason
          }
          Err(e) => {
            subscription.unsubscribe(StopReason::Failed);
            return Err(e);
          }
        }
      }
      Err(reason) => {
        debug!(topic_id = %topic_id, reason = %reason, "topic_subscribe_abandoned");
        reason
      }
    };

    Ok(into_result(json!({
      "topicId": topic_id.to_string(),
      "messageCount": collected.len(),
      "messages": collected,
      "limit": limit,
      "stopReason": reason.to_string(),
      "waitedMs": started.elapsed().as_millis() as u64,
    })))
  }
}
