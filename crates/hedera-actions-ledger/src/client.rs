use async_trait::async_trait;

use crate::entity::AccountId;
use crate::error::LedgerError;
use crate::keys::{PrivateKey, PublicKey};
use crate::receipt::{TransactionId, TransactionReceipt, TransactionRecord, TransactionResponse};
use crate::transaction::Transaction;
use hedera_actions_config::Network;

/// The account paying for and implicitly signing every transaction.
#[derive(Debug, Clone)]
pub struct Operator {
  pub account_id: AccountId,
  pub private_key: PrivateKey,
  pub public_key: PublicKey,
}

impl Operator {
  pub fn new(account_id: AccountId, private_key: PrivateKey) -> Self {
    let public_key = private_key.public_key();
    Self {
      account_id,
      private_key,
      public_key,
    }
  }
}

/// Capability to submit transactions to a Hedera network.
///
/// Implementations are bound to one network and one operator for their whole
/// lifetime and are shared read-only between concurrently running items.
#[async_trait]
pub trait LedgerClient: Send + Sync {
  /// The network this client submits to.
  fn network(&self) -> Network;

  /// The operator identity.
  fn operator(&self) -> &Operator;

  /// Submit a transaction signed by the operator and any extra signers.
  async fn execute(&self, transaction: Transaction) -> Result<TransactionResponse, LedgerError>;

  /// Wait for the receipt of a submitted transaction.
  async fn get_receipt(
    &self,
    transaction_id: &TransactionId,
  ) -> Result<TransactionReceipt, LedgerError>;

  /// Fetch the consensus record of a submitted transaction.
  async fn get_record(&self, transaction_id: &TransactionId)
  -> Result<TransactionRecord, LedgerError>;
}
