use hedera_actions_ledger::LedgerError;
use hedera_actions_mirror::MirrorError;
use thiserror::Error;

/// Errors raised while extracting parameters for or executing an operation.
#[derive(Debug, Error)]
pub enum ActionError {
  /// Credentials or client setup are unusable. Raised before any item runs.
  #[error("configuration error: {message}")]
  Configuration { message: String },

  /// A parameter is missing or malformed.
  #[error("invalid parameter '{field}': {message}")]
  Validation { field: String, message: String },

  #[error("unsupported resource: {resource}")]
  UnsupportedResource { resource: String },

  #[error("unsupported {resource} operation: {operation}")]
  UnsupportedOperation { resource: String, operation: String },

  /// The ledger rejected or failed the transaction.
  #[error("{operation} failed: {message}")]
  Operation { operation: String, message: String },

  /// The mirror node failed or answered with something unusable.
  #[error("mirror node error: {message}")]
  Upstream {
    status: Option<u16>,
    url: Option<String>,
    body: Option<String>,
    message: String,
  },
}

impl ActionError {
  pub fn configuration(message: impl Into<String>) -> Self {
    Self::Configuration {
      message: message.into(),
    }
  }

  pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self::Validation {
      field: field.into(),
      message: message.into(),
    }
  }

  pub fn operation(operation: impl Into<String>, message: impl Into<String>) -> Self {
    Self::Operation {
      operation: operation.into(),
      message: message.into(),
    }
  }

  pub fn upstream(message: impl Into<String>) -> Self {
    Self::Upstream {
      status: None,
      url: None,
      body: None,
      message: message.into(),
    }
  }

  /// Map a ledger failure raised while running `operation`.
  pub fn ledger(operation: &str, err: LedgerError) -> Self {
    match err {
      LedgerError::Configuration { message } => Self::Configuration { message },
      other => Self::operation(operation, other.to_string()),
    }
  }
}

impl From<MirrorError> for ActionError {
  fn from(err: MirrorError) -> Self {
    Self::Upstream {
      status: err.status(),
      url: err.url().map(str::to_string),
      body: err.body().map(str::to_string),
      message: err.to_string(),
    }
  }
}
