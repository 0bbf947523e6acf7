//! Item executor.
//!
//! The [`ItemExecutor`] runs one action over a batch of input items. For each
//! item it resolves the resource and operation, extracts the operation's
//! parameters and executes it against the shared [`Context`], collecting one
//! [`OutputItem`] per input item in input order.

use std::pin::pin;
use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use hedera_actions_config::ActionDef;
use hedera_actions_operations::{ActionError, Context, OperationResult, ParameterSource, Registry};
use tracing::{error, info, instrument, warn};

use crate::error::BatchError;
use crate::input::TemplateParameterSource;
use crate::result::{BatchResult, OutputItem};

const RESOURCE_PARAMETER: &str = "resource";

/// Runs batches of items through the operation registry.
///
/// With `concurrency > 1` up to that many items are in flight at once; their
/// results are still collected in input order. A fatal failure stops pulling
/// new items, but items already in flight may have started.
pub struct ItemExecutor {
  registry: Arc<Registry>,
  ctx: Context,
  continue_on_fail: bool,
  concurrency: usize,
}

impl ItemExecutor {
  pub fn new(registry: Arc<Registry>, ctx: Context) -> Self {
    Self {
      registry,
      ctx,
      continue_on_fail: false,
      concurrency: 1,
    }
  }

  /// Record failed items as `{ "error": ... }` instead of failing the batch.
  pub fn continue_on_fail(mut self, continue_on_fail: bool) -> Self {
    self.continue_on_fail = continue_on_fail;
    self
  }

  pub fn concurrency(mut self, concurrency: usize) -> Self {
    self.concurrency = concurrency.max(1);
    self
  }

  pub fn registry(&self) -> &Registry {
    &self.registry
  }

  /// Run an action definition, rendering its parameters per item.
  pub async fn run_action(&self, action: &ActionDef) -> Result<BatchResult, BatchError> {
    let source = TemplateParameterSource::from_action(&self.registry, action);
    self.run(&source, source.item_count()).await
  }

  /// Run `item_count` items whose parameters come from `source`.
  #[instrument(
    name = "executor_run",
    skip(self, source),
    fields(continue_on_fail = self.continue_on_fail, concurrency = self.concurrency)
  )]
  pub async fn run(
    &self,
    source: &dyn ParameterSource,
    item_count: usize,
  ) -> Result<BatchResult, BatchError> {
    let execution_id = uuid::Uuid::new_v4().to_string();
    info!(execution_id = %execution_id, item_count, "batch_started");

    let id = execution_id.as_str();
    let mut results = pin!(
      stream::iter(0..item_count)
        .map(move |index| self.run_item(source, index, id))
        .buffered(self.concurrency)
    );

    let cancel = self.ctx.cancel();
    let mut items = Vec::with_capacity(item_count);

    loop {
      let next = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
          warn!(execution_id = %execution_id, completed = items.len(), "batch_cancelled");
          return Err(BatchError::Cancelled);
        }
        next = results.next() => next,
      };
      let Some((index, outcome)) = next else {
        break;
      };

      match outcome {
        Ok(result) => items.push(OutputItem::success(result)),
        Err(e) if self.continue_on_fail => items.push(OutputItem::failure(e.to_string())),
        Err(e) => {
          error!(execution_id = %execution_id, item_index = index, error = %e, "batch_failed");
          return Err(BatchError::Item {
            index,
            source: e,
          });
        }
      }
    }

    let result = BatchResult {
      execution_id: execution_id.clone(),
      items,
    };
    info!(
      execution_id = %result.execution_id,
      items = result.items.len(),
      failed = result.failed_count(),
      "batch_completed"
    );
    Ok(result)
  }

  #[instrument(name = "executor_item", skip(self, source, execution_id), fields(execution_id = %execution_id))]
  async fn run_item(
    &self,
    source: &dyn ParameterSource,
    item_index: usize,
    execution_id: &str,
  ) -> (usize, Result<OperationResult, ActionError>) {
    let outcome = self.execute_item(source, item_index).await;
    match &outcome {
      Ok(_) => info!("item_completed"),
      Err(e) => warn!(error = %e, "item_failed"),
    }
    (item_index, outcome)
  }

  async fn execute_item(
    &self,
    source: &dyn ParameterSource,
    item_index: usize,
  ) -> Result<OperationResult, ActionError> {
    let resource = selector(source, RESOURCE_PARAMETER, item_index)?;
    let service = self.registry.get_service(&resource)?;
    let operation = selector(source, &service.operation_parameter(), item_index)?;

    info!(resource = %resource, operation = %operation, "item_started");

    let params = service.extract_parameters(&operation, source, item_index, self.ctx.payer())?;
    service.execute(&operation, &params, &self.ctx).await
  }
}

fn selector(
  source: &dyn ParameterSource,
  name: &str,
  item_index: usize,
) -> Result<String, ActionError> {
  source
    .get_parameter(name, item_index)?
    .as_ref()
    .and_then(serde_json::Value::as_str)
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .ok_or_else(|| ActionError::validation(name, "is required"))
}
