use async_trait::async_trait;
use hedera_actions_ledger::units::{format_tinybars, hbar_to_tinybars};
use hedera_actions_ledger::{PrivateKey, Transaction, TransactionBody};
use serde_json::json;
use tracing::info;

use crate::context::Context;
use crate::error::ActionError;
use crate::operation::{Operation, OperationResult, into_result, submit};
use crate::params::ParameterBag;

const NAME: &str = "create";

/// Create an account keyed by a freshly generated ECDSA key.
///
/// The key doubles as the account's EVM alias and the account accepts
/// unlimited automatic token associations. The private key is returned once
/// and never stored.
pub(crate) struct CreateAccount;

#[async_trait]
impl Operation for CreateAccount {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    let initial_balance = params.optional_f64("initialBalance")?.unwrap_or(0.0);
    if initial_balance < 0.0 {
      return Err(ActionError::validation(
        "initialBalance",
        "must not be negative",
      ));
    }
    let tinybars = hbar_to_tinybars(initial_balance)
      .map_err(|e| ActionError::validation("initialBalance", e.to_string()))?;

    let private_key = PrivateKey::generate_ecdsa();
    let public_key = private_key.public_key();

    let transaction = Transaction::new(TransactionBody::AccountCreate {
      key: public_key,
      alias_from_key: true,
      initial_balance_tinybars: tinybars,
      max_automatic_token_associations: -1,
    });

    let (transaction_id, receipt) = submit(ctx, NAME, transaction).await?;
    let account_id = receipt
      .account_id
      .ok_or_else(|| ActionError::operation(NAME, "receipt carries no account id"))?;

    info!(account_id = %account_id, "account_created");

    Ok(into_result(json!({
      "status": receipt.status.as_str(),
      "newAccountId": account_id.to_string(),
      "newAccountPublicKey": public_key.to_string(),
      "newAccountPrivateKey": private_key.to_string(),
      "privateKeyGenerated": true,
      "initialBalance": format_tinybars(tinybars),
      "transactionId": transaction_id.to_string(),
    })))
  }
}
