//! Parameter resolution using minijinja templates.
//!
//! Every action parameter is a template string rendered against the JSON of
//! the item being processed, then coerced to the kind the property schema
//! declares for it.
//!
//! # Flow
//! 1. Selector resolution: `resource` and `{resource}Operation` are rendered
//!    first; they decide which schema entry applies to every other parameter.
//! 2. Template resolution: the requested parameter is rendered to a string.
//! 3. Schema coercion: the string is parsed as a number, boolean or JSON
//!    value according to the property kind.
//!
//! A parameter the action does not set, or whose template renders blank,
//! falls back to the schema default.
//!
//! ```json
//! { "topicId": "{{ topic }}", "message": "{{ reading | tojson }}", "messageLimit": "25" }
//! ```

use std::collections::HashMap;

use hedera_actions_config::{ActionDef, InputValue};
use hedera_actions_operations::{ActionError, ParameterSource, PropertyKind, Registry};
use minijinja::{Environment, Value};

const RESOURCE_PARAMETER: &str = "resource";

/// A [`ParameterSource`] rendering an action's parameter templates per item.
pub struct TemplateParameterSource<'a> {
  registry: &'a Registry,
  env: Environment<'static>,
  parameters: HashMap<String, InputValue>,
  items: Vec<serde_json::Value>,
}

impl<'a> TemplateParameterSource<'a> {
  pub fn new(
    registry: &'a Registry,
    parameters: HashMap<String, InputValue>,
    items: Vec<serde_json::Value>,
  ) -> Self {
    Self {
      registry,
      env: Environment::new(),
      parameters,
      items,
    }
  }

  pub fn from_action(registry: &'a Registry, action: &ActionDef) -> Self {
    Self::new(registry, action.parameters.clone(), action.items.clone())
  }

  pub fn item_count(&self) -> usize {
    self.items.len()
  }

  /// Render the template for `name` against item `item_index`; `None` when
  /// the parameter is not set or renders empty.
  fn render(&self, name: &str, item_index: usize) -> Result<Option<String>, ActionError> {
    let Some(template) = self.parameters.get(name) else {
      return Ok(None);
    };

    let context = self
      .items
      .get(item_index)
      .map(Value::from_serialize)
      .unwrap_or_else(|| Value::from_serialize(serde_json::Map::new()));

    let rendered = self
      .env
      .render_str(template, context)
      .map_err(|e| ActionError::validation(name, format!("failed to resolve template: {}", e)))?;

    Ok(Some(rendered).filter(|s| !s.is_empty()))
  }

  /// The resource and operation selected for item `item_index`.
  fn selectors(&self, item_index: usize) -> Result<(String, String), ActionError> {
    let resource = match rendered_trimmed(self.render(RESOURCE_PARAMETER, item_index)?) {
      Some(resource) => resource,
      None => as_text(&self.registry.resource_property().default),
    };

    let selector = format!("{}Operation", resource);
    let operation = match rendered_trimmed(self.render(&selector, item_index)?) {
      Some(operation) => operation,
      None => self
        .registry
        .default_for(&resource, "", &selector)
        .map(as_text)
        .unwrap_or_default(),
    };

    Ok((resource, operation))
  }
}

impl ParameterSource for TemplateParameterSource<'_> {
  fn get_parameter(
    &self,
    name: &str,
    item_index: usize,
  ) -> Result<Option<serde_json::Value>, ActionError> {
    let (resource, operation) = self.selectors(item_index)?;
    if name == RESOURCE_PARAMETER {
      return Ok(Some(serde_json::Value::String(resource)));
    }
    if name == format!("{}Operation", resource) {
      return Ok(Some(serde_json::Value::String(operation)).filter(|v| !is_blank(v)));
    }

    let property = self.registry.property(&resource, &operation, name);
    let kind = property.map_or(PropertyKind::String, |p| p.kind);
    // Whitespace is a value for free text only.
    let rendered = self
      .render(name, item_index)?
      .filter(|raw| kind == PropertyKind::String || !raw.trim().is_empty());
    match rendered {
      Some(raw) => coerce_value(name, &raw, kind).map(Some),
      None => Ok(property.map(|p| p.default.clone()).filter(|v| !is_blank(v))),
    }
  }
}

/// Coerce a rendered template to the JSON type of its property.
pub fn coerce_value(
  name: &str,
  value: &str,
  kind: PropertyKind,
) -> Result<serde_json::Value, ActionError> {
  let trimmed = value.trim();
  match kind {
    PropertyKind::String => Ok(serde_json::Value::String(value.to_string())),

    PropertyKind::Options => Ok(serde_json::Value::String(trimmed.to_string())),

    PropertyKind::Number => {
      if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(serde_json::Value::Number(n.into()));
      }
      trimmed
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
        .ok_or_else(|| ActionError::validation(name, format!("expected number, got '{}'", value)))
    }

    PropertyKind::Boolean => match trimmed.to_lowercase().as_str() {
      "true" => Ok(serde_json::Value::Bool(true)),
      "false" => Ok(serde_json::Value::Bool(false)),
      _ => Err(ActionError::validation(
        name,
        format!("expected boolean, got '{}'", value),
      )),
    },

    PropertyKind::Json => serde_json::from_str(trimmed)
      .map_err(|e| ActionError::validation(name, format!("expected JSON: {}", e))),
  }
}

fn rendered_trimmed(rendered: Option<String>) -> Option<String> {
  rendered
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
}

fn as_text(value: &serde_json::Value) -> String {
  match value {
    serde_json::Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

fn is_blank(value: &serde_json::Value) -> bool {
  match value {
    serde_json::Value::Null => true,
    serde_json::Value::String(s) => s.trim().is_empty(),
    serde_json::Value::Object(map) => map.is_empty(),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn source<'a>(
    registry: &'a Registry,
    parameters: serde_json::Value,
    items: Vec<serde_json::Value>,
  ) -> TemplateParameterSource<'a> {
    let parameters = serde_json::from_value(parameters).unwrap();
    TemplateParameterSource::new(registry, parameters, items)
  }

  #[test]
  fn test_render_against_item() {
    let registry = Registry::new();
    let source = source(
      &registry,
      json!({
        "resource": "consensus",
        "consensusOperation": "submitMessage",
        "topicId": "{{ topic }}",
        "message": "reading {{ reading.t }} from {{ name | upper }}"
      }),
      vec![
        json!({ "topic": "0.0.5", "reading": { "t": 21.5 }, "name": "north" }),
        json!({ "topic": "0.0.6", "reading": { "t": 22 }, "name": "south" }),
      ],
    );

    assert_eq!(source.get_parameter("topicId", 0).unwrap(), Some(json!("0.0.5")));
    assert_eq!(
      source.get_parameter("message", 1).unwrap(),
      Some(json!("reading 22 from SOUTH"))
    );
    assert_eq!(
      source.get_parameter("consensusOperation", 1).unwrap(),
      Some(json!("submitMessage"))
    );
  }

  #[test]
  fn test_coerce_by_property_kind() {
    let registry = Registry::new();
    let source = source(
      &registry,
      json!({
        "resource": "token",
        "tokenOperation": "createFungibleToken",
        "tokenName": "{{ n }}",
        "tokenDecimals": "{{ d }}",
        "initialSupply": "1000",
        "enableSupplyKey": "TRUE"
      }),
      vec![json!({ "n": 42, "d": 2 })],
    );

    assert_eq!(source.get_parameter("tokenName", 0).unwrap(), Some(json!("42")));
    assert_eq!(source.get_parameter("tokenDecimals", 0).unwrap(), Some(json!(2)));
    assert_eq!(source.get_parameter("initialSupply", 0).unwrap(), Some(json!(1000)));
    assert_eq!(source.get_parameter("enableSupplyKey", 0).unwrap(), Some(json!(true)));
  }

  #[test]
  fn test_defaults_for_missing_and_blank() {
    let registry = Registry::new();
    let source = source(
      &registry,
      json!({
        "resource": "mirror",
        "mirrorOperation": "topicMessages",
        "topicId": "0.0.5",
        "sequenceFrom": "{{ missing }}"
      }),
      vec![json!({})],
    );

    assert_eq!(source.get_parameter("messageLimit", 0).unwrap(), Some(json!(10)));
    assert_eq!(source.get_parameter("sequenceFrom", 0).unwrap(), Some(json!(0)));
    assert_eq!(source.get_parameter("tokenBalanceAccountId", 0).unwrap(), None);
    assert_eq!(source.get_parameter("unknown", 0).unwrap(), None);
  }

  #[test]
  fn test_selector_defaults() {
    let registry = Registry::new();
    let source = source(&registry, json!({}), vec![json!({})]);

    assert_eq!(source.get_parameter("resource", 0).unwrap(), Some(json!("account")));
    assert_eq!(
      source.get_parameter("accountOperation", 0).unwrap(),
      Some(json!("create"))
    );
    assert_eq!(source.get_parameter("initialBalance", 0).unwrap(), Some(json!(0)));
  }

  #[test]
  fn test_whitespace_kept_for_free_text() {
    let registry = Registry::new();
    let source = source(
      &registry,
      json!({
        "resource": " consensus ",
        "consensusOperation": "submitMessage",
        "message": "{{ pad }}"
      }),
      vec![json!({ "pad": "   " })],
    );

    assert_eq!(source.get_parameter("resource", 0).unwrap(), Some(json!("consensus")));
    assert_eq!(source.get_parameter("message", 0).unwrap(), Some(json!("   ")));
  }

  #[test]
  fn test_json_property() {
    let registry = Registry::new();
    let source = source(
      &registry,
      json!({
        "resource": "token",
        "tokenOperation": "mintNFT",
        "metadataType": "onchain",
        "metadataJson": "{{ meta | tojson }}"
      }),
      vec![json!({ "meta": { "name": "one" } }), json!({})],
    );

    assert_eq!(
      source.get_parameter("metadataJson", 0).unwrap(),
      Some(json!({ "name": "one" }))
    );
    // An empty object default does not count as a value.
    assert_eq!(source.get_parameter("metadataJson", 1).unwrap(), None);
  }

  #[test]
  fn test_invalid_values() {
    let registry = Registry::new();
    let source = source(
      &registry,
      json!({
        "resource": "account",
        "accountOperation": "transferHbar",
        "hbarAmount": "{{ amount }}",
        "recipientAccountId": "{{ oops"
      }),
      vec![json!({ "amount": "lots" })],
    );

    let err = source.get_parameter("hbarAmount", 0).unwrap_err();
    assert!(matches!(err, ActionError::Validation { ref field, .. } if field == "hbarAmount"));

    let err = source.get_parameter("recipientAccountId", 0).unwrap_err();
    assert!(err.to_string().contains("failed to resolve template"));
  }

  #[test]
  fn test_coerce_value() {
    assert_eq!(coerce_value("n", " 1.5 ", PropertyKind::Number).unwrap(), json!(1.5));
    assert_eq!(coerce_value("n", "-3", PropertyKind::Number).unwrap(), json!(-3));
    assert_eq!(coerce_value("s", " padded ", PropertyKind::String).unwrap(), json!(" padded "));
    assert_eq!(coerce_value("o", " FINITE ", PropertyKind::Options).unwrap(), json!("FINITE"));
    assert!(coerce_value("b", "yes", PropertyKind::Boolean).is_err());
    assert!(coerce_value("j", "{", PropertyKind::Json).is_err());
  }
}
