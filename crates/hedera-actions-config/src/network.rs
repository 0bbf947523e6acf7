use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A Hedera network.
///
/// Both the ledger selector used by the transactional client and the mirror
/// REST base URL are derived from this value, so the two backends always talk
/// to the same logical network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
  Mainnet,
  Testnet,
  Previewnet,
}

impl Network {
  pub const ALL: [Network; 3] = [Network::Mainnet, Network::Testnet, Network::Previewnet];

  /// Ledger network selector.
  pub fn as_str(&self) -> &'static str {
    match self {
      Network::Mainnet => "mainnet",
      Network::Testnet => "testnet",
      Network::Previewnet => "previewnet",
    }
  }

  /// Base URL of the public mirror node REST API for this network.
  pub fn mirror_base_url(&self) -> &'static str {
    match self {
      Network::Mainnet => "https://mainnet-public.mirrornode.hedera.com",
      Network::Testnet => "https://testnet.mirrornode.hedera.com",
      Network::Previewnet => "https://previewnet.mirrornode.hedera.com",
    }
  }
}

impl fmt::Display for Network {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Network {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "mainnet" => Ok(Network::Mainnet),
      "testnet" => Ok(Network::Testnet),
      "previewnet" => Ok(Network::Previewnet),
      other => Err(ConfigError::UnsupportedNetwork(other.to_string())),
    }
  }
}
