use async_trait::async_trait;
use hedera_actions_ledger::{NftId, NftTransfer, Transaction, TransactionBody};
use serde_json::json;

use crate::context::Context;
use crate::error::ActionError;
use crate::operation::{Operation, OperationResult, into_result, submit};
use crate::params::ParameterBag;

const NAME: &str = "transferNFT";

/// Move one NFT between two accounts.
pub(crate) struct TransferNft;

#[async_trait]
impl Operation for TransferNft {
  async fn execute(
    &self,
    params: &ParameterBag,
    ctx: &Context,
  ) -> Result<OperationResult, ActionError> {
    let token_id = params.entity_id("tokenId")?;
    let serial = params.u64("serialNumber")?;
    if serial == 0 {
      return Err(ActionError::validation("serialNumber", "must be at least 1"));
    }
    let sender = params.account_id("fromAccountId")?;
    let receiver = params.account_id("toAccountId")?;
    if sender == receiver {
      return Err(ActionError::validation(
        "toAccountId",
        "must differ from fromAccountId",
      ));
    }

    let transaction = Transaction::new(TransactionBody::CryptoTransfer {
      hbar_transfers: Vec::new(),
      nft_transfers: vec![NftTransfer {
        nft_id: NftId {
          token_id,
          serial,
        },
        sender,
        receiver,
      }],
    });
    let (transaction_id, receipt) = submit(ctx, NAME, transaction).await?;

    Ok(into_result(json!({
      "status": receipt.status.as_str(),
      "tokenId": token_id.to_string(),
      "serialNumber": serial,
      "fromAccountId": sender.to_string(),
      "toAccountId": receiver.to_string(),
      "transactionId": transaction_id.to_string(),
    })))
  }
}
