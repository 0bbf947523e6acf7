use serde_json::Value;

use crate::error::ActionError;
use crate::schema::{OptionDef, PropertyDef};
use crate::service::Service;
use crate::{account, consensus, mirror, token};

/// Resource name to service.
///
/// Services are listed in schema order: account, token, mirror, consensus.
pub struct Registry {
  services: Vec<Service>,
}

impl Registry {
  pub fn new() -> Self {
    Self {
      services: vec![
        account::service(),
        token::service(),
        mirror::service(),
        consensus::service(),
      ],
    }
  }

  pub fn get_service(&self, resource: &str) -> Result<&Service, ActionError> {
    self
      .services
      .iter()
      .find(|s| s.resource() == resource)
      .ok_or_else(|| ActionError::UnsupportedResource {
        resource: resource.to_string(),
      })
  }

  pub fn resources(&self) -> impl Iterator<Item = &str> {
    self.services.iter().map(Service::resource)
  }

  /// The top-level `resource` selector.
  pub fn resource_property(&self) -> PropertyDef {
    let options = self
      .resources()
      .map(|r| OptionDef::new(&capitalize(r), r))
      .collect();
    PropertyDef::options("resource", "Resource", options, "account").required()
  }

  /// Every service's schema, concatenated in registry order.
  pub fn all_properties(&self) -> Vec<PropertyDef> {
    self
      .services
      .iter()
      .flat_map(|s| s.properties().iter().cloned())
      .collect()
  }

  /// Find the schema entry for `name` within `resource`, preferring one that
  /// is shown for `operation`.
  pub fn property(&self, resource: &str, operation: &str, name: &str) -> Option<&PropertyDef> {
    let service = self.get_service(resource).ok()?;
    let mut candidates = service.properties().iter().filter(|p| p.name == name);
    let first = candidates.next()?;
    if first.applies_to(operation) {
      return Some(first);
    }
    candidates
      .find(|p| p.applies_to(operation))
      .or(Some(first))
  }

  /// Default value the schema declares for `name`.
  pub fn default_for(&self, resource: &str, operation: &str, name: &str) -> Option<&Value> {
    self.property(resource, operation, name).map(|p| &p.default)
  }
}

impl Default for Registry {
  fn default() -> Self {
    Self::new()
  }
}

fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}
