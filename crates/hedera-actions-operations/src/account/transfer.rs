use async_trait::async_trait;
use hedera_actions_ledger::units::{format_tinybars, hbar_to_tinybars};
use hedera_actions_ledger::{HbarTransfer, Transaction, TransactionBody};
use serde_json::json;

use crate::context::Context;
use crate::error::ActionError;
use crate::operation::{Operation, OperationResult, into_result, submit};
use crate::params::ParameterBag;

const NAME: &str = "transferHbar";

/// Move HBAR from the authenticated account to another account.
pub(crate) struct TransferHbar;

#[async_trait]
impl Operation for TransferHbar {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    let sender = params.account_id("senderAccountId")?;
    let recipient = params.account_id("recipientAccountId")?;
    if sender == recipient {
      return Err(ActionError::validation(
        "recipientAccountId",
        "must differ from the sending account",
      ));
    }

    let amount = params.f64("amount")?;
    if amount <= 0.0 {
      return Err(ActionError::validation("amount", "must be greater than zero"));
    }
    let tinybars =
      hbar_to_tinybars(amount).map_err(|e| ActionError::validation("amount", e.to_string()))?;
    if tinybars == 0 {
      return Err(ActionError::validation("amount", "is smaller than one tinybar"));
    }

    let transaction = Transaction::new(TransactionBody::CryptoTransfer {
      hbar_transfers: vec![
        HbarTransfer {
          account_id: sender,
          tinybars: -tinybars,
        },
        HbarTransfer {
          account_id: recipient,
          tinybars,
        },
      ],
      nft_transfers: Vec::new(),
    });

    let (transaction_id, receipt) = submit(ctx, NAME, transaction).await?;

    Ok(into_result(json!({
      "status": receipt.status.as_str(),
      "senderAccountId": sender.to_string(),
      "recipientAccountId": recipient.to_string(),
      "amount": format_tinybars(tinybars),
      "amountTinybars": tinybars,
      "transactionId": transaction_id.to_string(),
    })))
  }
}
