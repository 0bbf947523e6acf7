//! Parameter schema as presented to the host's UI layer.

use serde::Serialize;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
  String,
  Number,
  Boolean,
  Options,
  Json,
}

/// One entry of an `options` property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionDef {
  pub name: String,
  pub value: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

impl OptionDef {
  pub fn new(name: &str, value: &str) -> Self {
    Self {
      name: name.to_string(),
      value: value.to_string(),
      description: None,
    }
  }

  pub fn describe(mut self, description: &str) -> Self {
    self.description = Some(description.to_string());
    self
  }
}

/// A single parameter declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDef {
  pub display_name: String,
  pub name: String,
  #[serde(rename = "type")]
  pub kind: PropertyKind,
  pub default: Value,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub required: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub placeholder: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub options: Vec<OptionDef>,
  /// Conditions under which the host shows this property, e.g.
  /// `{ "resource": ["token"], "tokenOperation": ["mintNFT"] }`.
  #[serde(skip_serializing_if = "Map::is_empty")]
  pub show: Map<String, Value>,
}

impl PropertyDef {
  fn new(kind: PropertyKind, name: &str, display_name: &str, default: Value) -> Self {
    Self {
      display_name: display_name.to_string(),
      name: name.to_string(),
      kind,
      default,
      required: false,
      description: None,
      placeholder: None,
      options: Vec::new(),
      show: Map::new(),
    }
  }

  pub fn string(name: &str, display_name: &str) -> Self {
    Self::new(PropertyKind::String, name, display_name, json!(""))
  }

  pub fn number(name: &str, display_name: &str, default: impl Into<Value>) -> Self {
    Self::new(PropertyKind::Number, name, display_name, default.into())
  }

  pub fn boolean(name: &str, display_name: &str, default: bool) -> Self {
    Self::new(PropertyKind::Boolean, name, display_name, json!(default))
  }

  pub fn options(name: &str, display_name: &str, options: Vec<OptionDef>, default: &str) -> Self {
    let mut def = Self::new(PropertyKind::Options, name, display_name, json!(default));
    def.options = options;
    def
  }

  pub fn json(name: &str, display_name: &str) -> Self {
    Self::new(PropertyKind::Json, name, display_name, json!({}))
  }

  pub fn required(mut self) -> Self {
    self.required = true;
    self
  }

  pub fn describe(mut self, description: &str) -> Self {
    self.description = Some(description.to_string());
    self
  }

  pub fn placeholder(mut self, placeholder: &str) -> Self {
    self.placeholder = Some(placeholder.to_string());
    self
  }

  /// Show only for `resource` and, when non-empty, only for `operations`.
  pub fn show_for(self, resource: &str, operations: &[&str]) -> Self {
    let shown = self.show_when("resource", &[resource]);
    if operations.is_empty() {
      shown
    } else {
      shown.show_when(&format!("{}Operation", resource), operations)
    }
  }

  /// Additionally require parameter `name` to hold one of `values`.
  pub fn show_when(mut self, name: &str, values: &[&str]) -> Self {
    self.show.insert(name.to_string(), json!(values));
    self
  }

  /// Whether this property is shown for `operation` of its resource.
  pub fn applies_to(&self, operation: &str) -> bool {
    self
      .show
      .iter()
      .find(|(key, _)| key.ends_with("Operation"))
      .and_then(|(_, values)| values.as_array())
      .is_none_or(|values| values.iter().any(|v| v == operation))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_property_serializes_like_host_schema() {
    let prop = PropertyDef::number("maxSupply", "Max Supply", 1)
      .required()
      .show_for("token", &["createNFT"])
      .show_when("supplyType", &["FINITE"]);

    let value = serde_json::to_value(&prop).unwrap();
    assert_eq!(value["type"], "number");
    assert_eq!(value["displayName"], "Max Supply");
    assert_eq!(value["default"], 1);
    assert_eq!(value["required"], true);
    assert_eq!(value["show"]["tokenOperation"], json!(["createNFT"]));
    assert_eq!(value["show"]["supplyType"], json!(["FINITE"]));
    assert!(value.get("options").is_none());
  }

  #[test]
  fn test_applies_to() {
    let prop = PropertyDef::string("topicId", "Topic ID").show_for("mirror", &["topicMessages"]);
    assert!(prop.applies_to("topicMessages"));
    assert!(!prop.applies_to("tokenInfo"));

    let selector = PropertyDef::string("x", "X").show_for("mirror", &[]);
    assert!(selector.applies_to("anything"));
  }
}
