use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::input::InputValue;

/// An action definition as a workflow host would hand it over: one set of node
/// parameters, evaluated once per input item.
///
/// ```json
/// {
///   "parameters": {
///     "resource": "consensus",
///     "consensusOperation": "submitMessage",
///     "topicId": "0.0.5005",
///     "message": "{{ reading | tojson }}"
///   },
///   "items": [{ "reading": { "t": 21.5 } }, { "reading": { "t": 22.0 } }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDef {
  pub parameters: HashMap<String, InputValue>,

  /// Input items. A definition without items runs once against `{}`.
  #[serde(default = "default_items")]
  pub items: Vec<serde_json::Value>,

  /// Overrides the settings file when present.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub continue_on_fail: Option<bool>,
}

fn default_items() -> Vec<serde_json::Value> {
  vec![serde_json::json!({})]
}
