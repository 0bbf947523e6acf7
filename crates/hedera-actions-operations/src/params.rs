//! Parameter extraction.
//!
//! A host hands parameters over through a [`ParameterSource`]. Each operation
//! has an extractor that pulls only the fields it needs into a
//! [`ParameterBag`], which the operation then reads with typed getters.

use hedera_actions_ledger::{AccountId, EntityId, PrivateKey};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ActionError;

/// Supplies named parameter values per work item.
pub trait ParameterSource: Send + Sync {
  /// The value of `name` for item `item_index`, or `None` when the host has
  /// no value for it.
  fn get_parameter(&self, name: &str, item_index: usize) -> Result<Option<Value>, ActionError>;
}

/// A parameter source backed by plain JSON objects.
///
/// Per-item values win over shared ones.
#[derive(Debug, Clone, Default)]
pub struct StaticParameters {
  shared: Map<String, Value>,
  items: Vec<Map<String, Value>>,
}

impl StaticParameters {
  /// The same parameters for every item.
  pub fn new(shared: Value) -> Self {
    Self {
      shared: into_map(shared),
      items: Vec::new(),
    }
  }

  /// Shared parameters plus per-item overrides.
  pub fn with_items(shared: Value, items: Vec<Value>) -> Self {
    Self {
      shared: into_map(shared),
      items: items.into_iter().map(into_map).collect(),
    }
  }
}

impl ParameterSource for StaticParameters {
  fn get_parameter(&self, name: &str, item_index: usize) -> Result<Option<Value>, ActionError> {
    let value = self
      .items
      .get(item_index)
      .and_then(|item| item.get(name))
      .or_else(|| self.shared.get(name));
    Ok(value.cloned())
  }
}

fn into_map(value: Value) -> Map<String, Value> {
  match value {
    Value::Object(map) => map,
    _ => Map::new(),
  }
}

/// Parameters extracted for one operation on one item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterBag(Map<String, Value>);

impl ParameterBag {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
    self.0.insert(key.into(), value.into());
  }

  pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.insert(key, value);
    self
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key).filter(|v| !is_blank(v))
  }

  /// The value of `key` with surrounding whitespace significant; only a
  /// missing value or an empty string count as absent.
  pub fn verbatim(&self, key: &str) -> Option<&Value> {
    self.0.get(key).filter(|v| !is_empty(v))
  }

  pub fn contains(&self, key: &str) -> bool {
    self.get(key).is_some()
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  /// A required, non-blank string. Numbers are accepted and stringified.
  pub fn str(&self, key: &str) -> Result<String, ActionError> {
    self
      .optional_str(key)
      .ok_or_else(|| ActionError::validation(key, "is required"))
  }

  /// A trimmed string, `None` when missing or blank.
  pub fn optional_str(&self, key: &str) -> Option<String> {
    match self.get(key)? {
      Value::String(s) => Some(s.trim().to_string()),
      Value::Number(n) => Some(n.to_string()),
      Value::Bool(b) => Some(b.to_string()),
      _ => None,
    }
  }

  /// A required number. Numeric strings are accepted.
  pub fn f64(&self, key: &str) -> Result<f64, ActionError> {
    self
      .optional_f64(key)?
      .ok_or_else(|| ActionError::validation(key, "is required"))
  }

  pub fn optional_f64(&self, key: &str) -> Result<Option<f64>, ActionError> {
    let Some(value) = self.get(key) else {
      return Ok(None);
    };
    let number = match value {
      Value::Number(n) => n.as_f64(),
      Value::String(s) => s.trim().parse::<f64>().ok(),
      _ => None,
    };
    match number {
      Some(n) if n.is_finite() => Ok(Some(n)),
      _ => Err(ActionError::validation(
        key,
        format!("expected a number, got {}", value),
      )),
    }
  }

  /// A required non-negative whole number.
  pub fn u64(&self, key: &str) -> Result<u64, ActionError> {
    self
      .optional_u64(key)?
      .ok_or_else(|| ActionError::validation(key, "is required"))
  }

  pub fn optional_u64(&self, key: &str) -> Result<Option<u64>, ActionError> {
    let Some(n) = self.optional_f64(key)? else {
      return Ok(None);
    };
    if n < 0.0 || n.fract() != 0.0 || n > u64::MAX as f64 {
      return Err(ActionError::validation(
        key,
        format!("expected a non-negative whole number, got {}", n),
      ));
    }
    Ok(Some(n as u64))
  }

  /// A boolean; `"true"`/`"false"` strings are accepted.
  pub fn bool_or(&self, key: &str, default: bool) -> bool {
    match self.get(key) {
      Some(Value::Bool(b)) => *b,
      Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
      _ => default,
    }
  }

  /// A required `shard.realm.num` entity id.
  pub fn entity_id(&self, key: &str) -> Result<EntityId, ActionError> {
    let raw = self.str(key)?;
    raw.parse().map_err(|_| {
      ActionError::validation(key, format!("'{}' is not of the form shard.realm.num", raw))
    })
  }

  /// An account id; alias of [`ParameterBag::entity_id`] for readability.
  pub fn account_id(&self, key: &str) -> Result<AccountId, ActionError> {
    self.entity_id(key)
  }

  /// An optional private key; blank counts as absent.
  pub fn optional_private_key(&self, key: &str) -> Result<Option<PrivateKey>, ActionError> {
    self
      .optional_str(key)
      .map(|raw| {
        raw
          .parse::<PrivateKey>()
          .map_err(|e| ActionError::validation(key, e.to_string()))
      })
      .transpose()
  }
}

impl From<Map<String, Value>> for ParameterBag {
  fn from(map: Map<String, Value>) -> Self {
    Self(map)
  }
}

fn is_blank(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::String(s) => s.trim().is_empty(),
    _ => false,
  }
}

fn is_empty(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::String(s) => s.is_empty(),
    _ => false,
  }
}

/// Builds a [`ParameterBag`] for one operation on one item.
pub struct Extractor<'a> {
  source: &'a dyn ParameterSource,
  item_index: usize,
  payer: &'a AccountId,
  bag: ParameterBag,
}

impl<'a> Extractor<'a> {
  pub fn new(source: &'a dyn ParameterSource, item_index: usize, payer: &'a AccountId) -> Self {
    Self {
      source,
      item_index,
      payer,
      bag: ParameterBag::new(),
    }
  }

  /// Read host parameter `param` without storing it.
  pub fn peek(&self, param: &str) -> Result<Option<Value>, ActionError> {
    Ok(
      self
        .source
        .get_parameter(param, self.item_index)?
        .filter(|v| !is_blank(v)),
    )
  }

  /// Copy host parameter `param` into the bag as `key`; fail when unresolved.
  pub fn required(&mut self, param: &str, key: &str) -> Result<(), ActionError> {
    let value = self
      .peek(param)?
      .ok_or_else(|| ActionError::validation(param, "is required"))?;
    self.bag.insert(key, value);
    Ok(())
  }

  /// Like [`Extractor::required`], but a whitespace-only value is kept.
  pub fn required_verbatim(&mut self, param: &str, key: &str) -> Result<(), ActionError> {
    let value = self
      .source
      .get_parameter(param, self.item_index)?
      .filter(|v| !is_empty(v))
      .ok_or_else(|| ActionError::validation(param, "is required"))?;
    self.bag.insert(key, value);
    Ok(())
  }

  /// Copy host parameter `param` into the bag as `key` when it has a value.
  pub fn optional(&mut self, param: &str, key: &str) -> Result<(), ActionError> {
    if let Some(value) = self.peek(param)? {
      self.bag.insert(key, value);
    }
    Ok(())
  }

  /// Inject the authenticated account as `key`.
  pub fn payer_as(&mut self, key: &str) {
    self.bag.insert(key, self.payer.to_string());
  }

  pub fn finish(self) -> ParameterBag {
    self.bag
  }
}
