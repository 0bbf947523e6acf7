use async_trait::async_trait;
use hedera_actions_ledger::units::to_smallest_unit;
use hedera_actions_ledger::{TokenTransfer, Transaction, TransactionBody};
use serde_json::json;

use super::lookup_decimals;
use crate::context::Context;
use crate::error::ActionError;
use crate::mirror::TokenInfo;
use crate::operation::{Operation, OperationResult, into_result, submit};
use crate::params::ParameterBag;

const NAME: &str = "airdrop";

/// Airdrop a whole-token amount from the authenticated account.
pub(crate) struct Airdrop {
  token_info: TokenInfo,
}

impl Airdrop {
  pub(crate) fn new() -> Self {
    Self {
      token_info: TokenInfo,
    }
  }
}

#[async_trait]
impl Operation for Airdrop {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    let token_id = params.entity_id("tokenId")?;
    let sender = params.account_id("senderAccountId")?;
    let recipient = params.account_id("recipientAccountId")?;
    let amount = params.f64("airdropAmount")?;
    if amount <= 0.0 {
      return Err(ActionError::validation(
        "airdropAmount",
        "must be greater than zero",
      ));
    }

    let decimals = lookup_decimals(&self.token_info, ctx, NAME, token_id).await?;
    let units = to_smallest_unit(amount, decimals)
      .map_err(|e| ActionError::validation("airdropAmount", e.to_string()))?;
    let units = i64::try_from(units)
      .ok()
      .filter(|u| *u > 0)
      .ok_or_else(|| {
        ActionError::validation(
          "airdropAmount",
          format!("{} is not a transferable amount with {} decimals", amount, decimals),
        )
      })?;

    let transaction = Transaction::new(TransactionBody::TokenAirdrop {
      token_transfers: vec![
        TokenTransfer {
          token_id,
          account_id: sender,
          amount: -units,
        },
        TokenTransfer {
          token_id,
          account_id: recipient,
          amount: units,
        },
      ],
    });
    let (transaction_id, receipt) = submit(ctx, NAME, transaction).await?;

    Ok(into_result(json!({
      "status": receipt.status.as_str(),
      "tokenId": token_id.to_string(),
      "senderAccountId": sender.to_string(),
      "recipientAccountId": recipient.to_string(),
      "amount": amount,
      "decimals": decimals,
      "amountInSmallestUnit": units,
      "transactionId": transaction_id.to_string(),
    })))
  }
}
