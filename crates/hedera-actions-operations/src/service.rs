use std::collections::HashMap;
use std::sync::Arc;

use hedera_actions_ledger::AccountId;
use tracing::{debug, instrument};

use crate::context::Context;
use crate::error::ActionError;
use crate::operation::{Operation, OperationResult};
use crate::params::{Extractor, ParameterBag, ParameterSource};
use crate::schema::PropertyDef;

/// Reads the parameters one operation needs.
pub type ExtractFn = fn(&mut Extractor<'_>) -> Result<(), ActionError>;

struct Entry {
  extract: ExtractFn,
  operation: Arc<dyn Operation>,
}

/// All operations of one resource.
///
/// The dispatch table is fixed when the service is built; nothing is kept
/// between items.
pub struct Service {
  resource: &'static str,
  properties: Vec<PropertyDef>,
  operations: HashMap<&'static str, Entry>,
  order: Vec<&'static str>,
}

impl Service {
  pub(crate) fn new(resource: &'static str) -> Self {
    Self {
      resource,
      properties: Vec::new(),
      operations: HashMap::new(),
      order: Vec::new(),
    }
  }

  pub(crate) fn property(mut self, property: PropertyDef) -> Self {
    self.properties.push(property);
    self
  }

  pub(crate) fn operation(
    mut self,
    name: &'static str,
    extract: ExtractFn,
    operation: impl Operation + 'static,
  ) -> Self {
    self.order.push(name);
    self.operations.insert(
      name,
      Entry {
        extract,
        operation: Arc::new(operation),
      },
    );
    self
  }

  pub fn resource(&self) -> &str {
    self.resource
  }

  /// Name of the host parameter selecting this service's operation, e.g.
  /// `tokenOperation`.
  pub fn operation_parameter(&self) -> String {
    format!("{}Operation", self.resource)
  }

  /// Operation names in declaration order.
  pub fn operation_names(&self) -> &[&'static str] {
    &self.order
  }

  pub fn properties(&self) -> &[PropertyDef] {
    &self.properties
  }

  fn entry(&self, operation: &str) -> Result<&Entry, ActionError> {
    self
      .operations
      .get(operation)
      .ok_or_else(|| ActionError::UnsupportedOperation {
        resource: self.resource.to_string(),
        operation: operation.to_string(),
      })
  }

  /// Read the parameters for `operation` on item `item_index`, injecting
  /// `payer` wherever the operation acts on behalf of the authenticated
  /// account.
  pub fn extract_parameters(
    &self,
    operation: &str,
    source: &dyn ParameterSource,
    item_index: usize,
    payer: &AccountId,
  ) -> Result<ParameterBag, ActionError> {
    let entry = self.entry(operation)?;
    let mut extractor = Extractor::new(source, item_index, payer);
    (entry.extract)(&mut extractor)?;
    let params = extractor.finish();

    let keys: Vec<&str> = params.keys().collect();
    debug!(
      resource = self.resource,
      operation,
      item_index,
      params = ?keys,
      "parameters_extracted"
    );
    Ok(params)
  }

  #[instrument(name = "service_execute", skip(self, params, ctx), fields(resource = self.resource))]
  pub async fn execute(
    &self,
    operation: &str,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    let entry = self.entry(operation)?;
    entry.operation.execute(params, ctx).await
  }
}
