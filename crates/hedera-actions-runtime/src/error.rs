//! Runtime error types.

use hedera_actions_operations::ActionError;

/// Errors that end a batch.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
  /// The batch was cancelled before every item finished.
  #[error("execution cancelled")]
  Cancelled,

  /// An item failed and the batch does not continue on failure.
  #[error("item {index} failed: {source}")]
  Item {
    index: usize,
    #[source]
    source: ActionError,
  },
}

impl BatchError {
  /// Index of the failed item, if an item caused the failure.
  pub fn item_index(&self) -> Option<usize> {
    match self {
      BatchError::Item { index, .. } => Some(*index),
      BatchError::Cancelled => None,
    }
  }
}
