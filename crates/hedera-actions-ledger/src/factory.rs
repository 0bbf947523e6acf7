use hedera_actions_config::{Credentials, Network};
use tracing::debug;

use crate::client::Operator;
use crate::entity::AccountId;
use crate::error::LedgerError;
use crate::gateway::GatewayClient;
use crate::keys::PrivateKey;

/// Validates credentials and builds clients from them.
pub struct ClientFactory;

impl ClientFactory {
  /// Fail unless both the account id and the private key are present.
  pub fn validate_credentials(credentials: &Credentials) -> Result<(), LedgerError> {
    if credentials.account_id.trim().is_empty() || credentials.private_key.trim().is_empty() {
      return Err(LedgerError::configuration(
        "Hedera credentials are not set up correctly: accountId and privateKey are required",
      ));
    }
    Ok(())
  }

  /// Resolve the network and operator identity described by `credentials`.
  pub fn resolve(credentials: &Credentials) -> Result<(Network, Operator), LedgerError> {
    Self::validate_credentials(credentials)?;

    let network: Network = credentials
      .network
      .parse()
      .map_err(|_| LedgerError::configuration(format!("unsupported network: {}", credentials.network)))?;

    let account_id: AccountId = credentials.account_id.parse().map_err(|_| {
      LedgerError::configuration(format!(
        "operator account id '{}' is not of the form shard.realm.num",
        credentials.account_id
      ))
    })?;

    let private_key: PrivateKey = credentials
      .private_key
      .parse()
      .map_err(|e| LedgerError::configuration(format!("operator private key: {}", e)))?;

    Ok((network, Operator::new(account_id, private_key)))
  }

  /// Build a gateway-backed client. No network I/O happens here; the operator
  /// is only exercised by the first transaction.
  pub fn create_client(
    credentials: &Credentials,
    gateway_url: &str,
  ) -> Result<GatewayClient, LedgerError> {
    let (network, operator) = Self::resolve(credentials)?;

    debug!(
      network = %network,
      operator = %operator.account_id,
      gateway_url = %gateway_url,
      "ledger_client_created"
    );

    GatewayClient::new(gateway_url, network, operator)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::client::LedgerClient;

  fn credentials(network: &str) -> Credentials {
    Credentials {
      account_id: "0.0.1001".to_string(),
      private_key: PrivateKey::generate_ed25519().to_string(),
      network: network.to_string(),
    }
  }

  #[test]
  fn test_validate_rejects_empty_fields() {
    let mut creds = credentials("testnet");
    creds.account_id = String::new();
    assert!(matches!(
      ClientFactory::validate_credentials(&creds),
      Err(LedgerError::Configuration { .. })
    ));

    let mut creds = credentials("testnet");
    creds.private_key = "  ".to_string();
    assert!(matches!(
      ClientFactory::validate_credentials(&creds),
      Err(LedgerError::Configuration { .. })
    ));
  }

  #[test]
  fn test_create_client_per_network() {
    for network in Network::ALL {
      let client =
        ClientFactory::create_client(&credentials(network.as_str()), "http://127.0.0.1:7878")
          .unwrap();
      assert_eq!(client.network(), network);
      assert_eq!(client.operator().account_id.to_string(), "0.0.1001");
    }
  }

  #[test]
  fn test_create_client_unknown_network() {
    let err = ClientFactory::create_client(&credentials("devnet"), "http://127.0.0.1:7878")
      .unwrap_err();
    assert!(matches!(err, LedgerError::Configuration { ref message } if message.contains("devnet")));
  }

  #[test]
  fn test_create_client_bad_operator() {
    let mut creds = credentials("testnet");
    creds.account_id = "alice".to_string();
    assert!(matches!(
      ClientFactory::create_client(&creds, "http://127.0.0.1:7878"),
      Err(LedgerError::Configuration { .. })
    ));

    let mut creds = credentials("testnet");
    creds.private_key = "xyz".to_string();
    assert!(matches!(
      ClientFactory::create_client(&creds, "http://127.0.0.1:7878"),
      Err(LedgerError::Configuration { .. })
    ));
  }
}
