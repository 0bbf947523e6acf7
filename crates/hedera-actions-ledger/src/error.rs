use thiserror::Error;

/// Errors raised by the ledger capability.
#[derive(Debug, Error)]
pub enum LedgerError {
  /// Credentials or network selection are unusable.
  #[error("configuration error: {message}")]
  Configuration { message: String },

  /// Entity id is not of the form `shard.realm.num`.
  #[error("invalid entity id '{value}': expected shard.realm.num")]
  InvalidEntityId { value: String },

  /// Private or public key could not be decoded.
  #[error("invalid key: {message}")]
  InvalidKey { message: String },

  /// Amount cannot be represented on the ledger.
  #[error("invalid amount: {message}")]
  InvalidAmount { message: String },

  /// Gateway URL could not be parsed or joined.
  #[error("invalid gateway url '{url}': {message}")]
  InvalidUrl { url: String, message: String },

  /// Transaction could not be encoded for signing.
  #[error("unable to encode transaction: {0}")]
  Encode(#[from] serde_json::Error),

  /// Transport failure talking to the gateway.
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// Gateway answered with a non-success status.
  #[error("gateway returned {status}: {body}")]
  Gateway { status: u16, body: String },

  /// Gateway answered with a body that is not a receipt/record/response.
  #[error("invalid gateway response: {message}")]
  InvalidResponse { message: String },
}

impl LedgerError {
  pub fn configuration(message: impl Into<String>) -> Self {
    Self::Configuration {
      message: message.into(),
    }
  }

  pub fn invalid_key(message: impl Into<String>) -> Self {
    Self::InvalidKey {
      message: message.into(),
    }
  }

  pub fn invalid_amount(message: impl Into<String>) -> Self {
    Self::InvalidAmount {
      message: message.into(),
    }
  }
}
