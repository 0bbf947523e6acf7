use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{AccountId, TokenId, TopicId};

/// Transaction id as assigned by the submitting client, e.g.
/// `0.0.1234@1700000000.123456789`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Raw receipt status code, e.g. `SUCCESS` or `INVALID_SIGNATURE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(String);

impl Status {
  pub const SUCCESS: &'static str = "SUCCESS";

  pub fn new(code: impl Into<String>) -> Self {
    Self(code.into())
  }

  pub fn success() -> Self {
    Self::new(Self::SUCCESS)
  }

  pub fn is_success(&self) -> bool {
    self.0 == Self::SUCCESS
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Returned as soon as a transaction has been submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
  pub transaction_id: TransactionId,
}

/// Terminal status of a transaction plus the ids it created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
  pub status: Status,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub account_id: Option<AccountId>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub token_id: Option<TokenId>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub topic_id: Option<TopicId>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub topic_sequence_number: Option<u64>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub serials: Vec<u64>,
}

impl TransactionReceipt {
  /// A bare receipt carrying only a status.
  pub fn with_status(status: Status) -> Self {
    Self {
      status,
      account_id: None,
      token_id: None,
      topic_id: None,
      topic_sequence_number: None,
      serials: Vec::new(),
    }
  }
}

/// The consensus record of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub consensus_timestamp: Option<String>,
}
