//! Execution result types.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// One output record, in the position of the input item it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputItem {
  pub json: Value,
}

impl OutputItem {
  pub fn success(result: serde_json::Map<String, Value>) -> Self {
    Self {
      json: Value::Object(result),
    }
  }

  /// A recovered failure, recorded in place of the item's result.
  pub fn failure(message: impl Into<String>) -> Self {
    Self {
      json: json!({ "error": message.into() }),
    }
  }

  pub fn is_failure(&self) -> bool {
    self.json.get("error").is_some()
  }
}

/// Result of a complete batch.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResult {
  /// Unique execution ID.
  pub execution_id: String,
  /// One entry per input item, in input order.
  pub items: Vec<OutputItem>,
}

impl BatchResult {
  pub fn failed_count(&self) -> usize {
    self.items.iter().filter(|i| i.is_failure()).count()
  }
}
