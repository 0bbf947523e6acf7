use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Operator credentials for a Hedera account.
///
/// `network` is kept as the raw string the host supplied; it is only parsed
/// when a client is built, so an unrecognized value surfaces as a
/// configuration error at that point.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
  /// Operator account, e.g. "0.0.123456"
  pub account_id: String,
  /// ED25519 or ECDSA private key, DER or raw hex encoded
  pub private_key: String,
  #[serde(default = "default_network")]
  pub network: String,
}

fn default_network() -> String {
  "testnet".to_string()
}

impl Credentials {
  pub const ENV_ACCOUNT_ID: &'static str = "HEDERA_ACCOUNT_ID";
  pub const ENV_PRIVATE_KEY: &'static str = "HEDERA_PRIVATE_KEY";
  pub const ENV_NETWORK: &'static str = "HEDERA_NETWORK";

  /// Read credentials from `HEDERA_ACCOUNT_ID`, `HEDERA_PRIVATE_KEY` and
  /// (optionally) `HEDERA_NETWORK`.
  pub fn from_env() -> Result<Self, ConfigError> {
    let var = |name: &str| {
      std::env::var(name).map_err(|_| ConfigError::MissingEnv(name.to_string()))
    };

    Ok(Self {
      account_id: var(Self::ENV_ACCOUNT_ID)?,
      private_key: var(Self::ENV_PRIVATE_KEY)?,
      network: std::env::var(Self::ENV_NETWORK).unwrap_or_else(|_| default_network()),
    })
  }
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("account_id", &self.account_id)
      .field("private_key", &"<redacted>")
      .field("network", &self.network)
      .finish()
  }
}
