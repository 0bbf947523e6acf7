use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;
use crate::error::ConfigError;

/// Settings file for the hedera-actions runner.
///
/// ```json
/// {
///   "credentials": { "accountId": "0.0.1234", "privateKey": "302e...", "network": "testnet" },
///   "gatewayUrl": "http://127.0.0.1:7878",
///   "continueOnFail": true,
///   "concurrency": 4,
///   "watch": { "maxWaitMs": 30000, "pollIntervalMs": 2000 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
  /// Operator credentials. Falls back to the environment when absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub credentials: Option<Credentials>,

  /// Base URL of the transaction signing gateway.
  #[serde(default = "default_gateway_url")]
  pub gateway_url: String,

  /// Record per-item failures as `{ "error": ... }` instead of failing the batch.
  #[serde(default)]
  pub continue_on_fail: bool,

  /// Maximum number of items processed at once.
  #[serde(default = "default_concurrency")]
  pub concurrency: usize,

  #[serde(default)]
  pub watch: WatchSettings,
}

/// Limits for subscription style operations that wait for new topic messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchSettings {
  /// Hard upper bound on how long a subscription may wait.
  #[serde(default = "default_max_wait_ms")]
  pub max_wait_ms: u64,
  /// Delay between two mirror polls.
  #[serde(default = "default_poll_interval_ms")]
  pub poll_interval_ms: u64,
}

fn default_gateway_url() -> String {
  "http://127.0.0.1:7878".to_string()
}

fn default_concurrency() -> usize {
  1
}

fn default_max_wait_ms() -> u64 {
  30_000
}

fn default_poll_interval_ms() -> u64 {
  2_000
}

impl Default for WatchSettings {
  fn default() -> Self {
    Self {
      max_wait_ms: default_max_wait_ms(),
      poll_interval_ms: default_poll_interval_ms(),
    }
  }
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      credentials: None,
      gateway_url: default_gateway_url(),
      continue_on_fail: false,
      concurrency: default_concurrency(),
      watch: WatchSettings::default(),
    }
  }
}

impl Settings {
  /// Load settings from a JSON file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Load settings if the file exists, otherwise use defaults.
  pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
    if path.exists() {
      Self::load(path)
    } else {
      Ok(Self::default())
    }
  }

  /// Credentials from the settings file, or from the environment.
  pub fn resolve_credentials(&self) -> Result<Credentials, ConfigError> {
    match &self.credentials {
      Some(credentials) => Ok(credentials.clone()),
      None => Credentials::from_env(),
    }
  }
}
